//! Dense transition matrix.
//!
//! Row `u` holds \(P(u \to v) = \mathrm{mult}(u, v) / \deg(u)\); dead-end rows are all zero
//! and flagged separately. Memory is \(O(n^2)\), so this is only worth it when the graph is
//! dense enough that the row-major sweep beats chasing CSR offsets.

use crate::graph::{GraphRef, Transition};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    n: usize,
    data: Vec<f64>,
    dead_end: Vec<bool>,
}

impl TransitionMatrix {
    /// Largest node count accepted (128 MiB of `f64`s).
    pub const MAX_NODES: usize = 4096;

    pub fn from_graph<G: GraphRef + ?Sized>(graph: &G) -> Result<Self> {
        let n = graph.node_count();
        if n > Self::MAX_NODES {
            return Err(Error::InvalidParameter(format!(
                "dense transition matrix limited to {} nodes (node_count={n})",
                Self::MAX_NODES
            )));
        }
        let mut data = vec![0.0_f64; n * n];
        let mut dead_end = vec![false; n];
        for u in 0..n {
            let nbrs = graph.neighbors_ref(u);
            if nbrs.is_empty() {
                dead_end[u] = true;
                continue;
            }
            let p = 1.0 / nbrs.len() as f64;
            let row = &mut data[u * n..(u + 1) * n];
            for &v in nbrs {
                // parallel edges accumulate
                row[v] += p;
            }
        }
        Ok(Self { n, data, dead_end })
    }

    pub fn node_count(&self) -> usize {
        self.n
    }

    pub fn row(&self, u: usize) -> &[f64] {
        &self.data[u * self.n..(u + 1) * self.n]
    }

    pub fn get(&self, u: usize, v: usize) -> f64 {
        self.data[u * self.n + v]
    }
}

impl Transition for TransitionMatrix {
    fn dimension(&self) -> usize {
        self.n
    }

    fn is_dead_end(&self, node: usize) -> bool {
        self.dead_end[node]
    }

    fn propagate(&self, scores: &[f64], scale: f64, out: &mut [f64]) {
        for u in 0..self.n {
            if self.dead_end[u] {
                continue;
            }
            let s = scale * scores[u];
            if s == 0.0 {
                continue;
            }
            for (o, &p) in out.iter_mut().zip(self.row(u)) {
                *o += s * p;
            }
        }
    }
}
