//! Graph adapter traits and the compressed sparse row adjacency list.

use crate::{Error, Result};

/// A graph view that returns **borrowed** neighbor slices.
///
/// Nodes are dense indices `0..node_count()`. A neighbor slice may contain the same
/// target more than once; each copy is a distinct edge.
pub trait GraphRef {
    fn node_count(&self) -> usize;
    fn neighbors_ref(&self, node: usize) -> &[usize];
    fn out_degree(&self, node: usize) -> usize {
        self.neighbors_ref(node).len()
    }
    fn edge_count(&self) -> usize {
        (0..self.node_count()).map(|u| self.out_degree(u)).sum()
    }
}

/// A row-stochastic transition operator, as consumed by power iteration.
///
/// Dead ends have no row: `propagate` skips them and the caller redistributes their
/// mass explicitly.
pub trait Transition {
    /// Number of states (nodes).
    fn dimension(&self) -> usize;
    fn is_dead_end(&self, node: usize) -> bool;
    /// Adds `scale * scores[u] * P(u -> v)` into `out[v]` for every non-dead-end `u`.
    fn propagate(&self, scores: &[f64], scale: f64, out: &mut [f64]);
}

/// Directed multigraph in CSR form: `targets[offsets[u]..offsets[u + 1]]` are `u`'s out-edges.
///
/// Per-node edge order is insertion order. Duplicate edges and self-loops are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyList {
    offsets: Vec<usize>,
    targets: Vec<usize>,
}

impl AdjacencyList {
    /// Build from `u -> v` edges over nodes `0..node_count`.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut degree = vec![0usize; node_count];
        for &(u, v) in edges {
            if u >= node_count || v >= node_count {
                return Err(Error::InvalidParameter(format!(
                    "edge ({u}, {v}) out of range for node_count={node_count}"
                )));
            }
            degree[u] += 1;
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        offsets.push(0);
        let mut acc = 0usize;
        for &d in &degree {
            acc += d;
            offsets.push(acc);
        }

        // Counting sort keeps the per-source insertion order stable.
        let mut cursor: Vec<usize> = offsets[..node_count].to_vec();
        let mut targets = vec![0usize; edges.len()];
        for &(u, v) in edges {
            targets[cursor[u]] = v;
            cursor[u] += 1;
        }

        Ok(Self { offsets, targets })
    }

    /// Build from per-node neighbor lists (`adj[u]` lists `u`'s targets).
    pub fn from_neighbors(adj: Vec<Vec<usize>>) -> Result<Self> {
        let n = adj.len();
        let edges: Vec<(usize, usize)> = adj
            .iter()
            .enumerate()
            .flat_map(|(u, nbrs)| nbrs.iter().map(move |&v| (u, v)))
            .collect();
        Self::from_edges(n, &edges)
    }

    /// Nodes with out-degree zero.
    pub fn dead_ends(&self) -> Vec<usize> {
        (0..GraphRef::node_count(self))
            .filter(|&u| GraphRef::out_degree(self, u) == 0)
            .collect()
    }

    fn propagate_serial(&self, scores: &[f64], scale: f64, out: &mut [f64]) {
        for u in 0..GraphRef::node_count(self) {
            let nbrs = self.neighbors_ref(u);
            if nbrs.is_empty() {
                continue;
            }
            let share = scale * scores[u] / nbrs.len() as f64;
            for &v in nbrs {
                out[v] += share;
            }
        }
    }

    /// Map over source nodes into per-worker partial vectors, then reduce by target.
    #[cfg(feature = "parallel")]
    fn propagate_parallel(&self, scores: &[f64], scale: f64, out: &mut [f64]) {
        use rayon::prelude::*;

        let n = GraphRef::node_count(self);
        let partial = (0..n)
            .into_par_iter()
            .with_min_len(PARALLEL_MIN_SOURCES_PER_TASK)
            .fold(
                || vec![0.0_f64; n],
                |mut acc, u| {
                    let nbrs = self.neighbors_ref(u);
                    if !nbrs.is_empty() {
                        let share = scale * scores[u] / nbrs.len() as f64;
                        for &v in nbrs {
                            acc[v] += share;
                        }
                    }
                    acc
                },
            )
            .reduce(
                || vec![0.0_f64; n],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                },
            );
        for (o, p) in out.iter_mut().zip(partial) {
            *o += p;
        }
    }
}

#[cfg(feature = "parallel")]
const PARALLEL_MIN_NODES: usize = 4096;
#[cfg(feature = "parallel")]
const PARALLEL_MIN_SOURCES_PER_TASK: usize = 1024;

impl GraphRef for AdjacencyList {
    fn node_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    fn neighbors_ref(&self, node: usize) -> &[usize] {
        match (self.offsets.get(node), self.offsets.get(node + 1)) {
            (Some(&start), Some(&end)) => &self.targets[start..end],
            _ => &[],
        }
    }

    fn edge_count(&self) -> usize {
        self.targets.len()
    }
}

impl Transition for AdjacencyList {
    fn dimension(&self) -> usize {
        GraphRef::node_count(self)
    }

    fn is_dead_end(&self, node: usize) -> bool {
        GraphRef::out_degree(self, node) == 0
    }

    fn propagate(&self, scores: &[f64], scale: f64, out: &mut [f64]) {
        #[cfg(feature = "parallel")]
        {
            if GraphRef::node_count(self) >= PARALLEL_MIN_NODES {
                self.propagate_parallel(scores, scale, out);
                return;
            }
        }
        self.propagate_serial(scores, scale, out);
    }
}
