//! Labelled link graph.
//!
//! [`LinkGraph`] interns arbitrary node labels to dense indices (first-seen order) and stores
//! the edges as an [`AdjacencyList`]. The estimators run on the index view and map results
//! back to labels.

use crate::graph::{AdjacencyList, GraphRef};
use crate::parse::parse_edge_line;
use crate::Result;
use std::collections::HashMap;
use std::hash::Hash;
use std::io::BufRead;

/// Node and edge counts, as printed before a ranking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub dead_ends: usize,
}

#[derive(Debug, Clone)]
pub struct LinkGraph<N> {
    labels: Vec<N>,
    index: HashMap<N, usize>,
    adjacency: AdjacencyList,
}

/// Accumulates nodes and edges; [`LinkGraphBuilder::build`] freezes them into a [`LinkGraph`].
#[derive(Debug, Clone)]
pub struct LinkGraphBuilder<N> {
    labels: Vec<N>,
    index: HashMap<N, usize>,
    edges: Vec<(usize, usize)>,
}

impl<N: Hash + Eq + Clone> Default for LinkGraphBuilder<N> {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
        }
    }
}

impl<N: Hash + Eq + Clone> LinkGraphBuilder<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node (a no-op if it already exists) and return its index.
    pub fn add_node(&mut self, node: N) -> usize {
        if let Some(&i) = self.index.get(&node) {
            return i;
        }
        let i = self.labels.len();
        self.labels.push(node.clone());
        self.index.insert(node, i);
        i
    }

    /// Add a `source -> target` edge, creating either endpoint if needed.
    ///
    /// Repeated calls with the same pair add parallel edges.
    pub fn add_edge(&mut self, source: N, target: N) -> &mut Self {
        let u = self.add_node(source);
        let v = self.add_node(target);
        self.edges.push((u, v));
        self
    }

    pub fn build(self) -> Result<LinkGraph<N>> {
        let adjacency = AdjacencyList::from_edges(self.labels.len(), &self.edges)?;
        Ok(LinkGraph {
            labels: self.labels,
            index: self.index,
            adjacency,
        })
    }
}

impl<N: Hash + Eq + Clone> LinkGraph<N> {
    pub fn builder() -> LinkGraphBuilder<N> {
        LinkGraphBuilder::new()
    }

    pub fn from_edges<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut b = LinkGraphBuilder::new();
        for (source, target) in edges {
            b.add_edge(source, target);
        }
        b.build()
    }

    pub fn index_of(&self, node: &N) -> Option<usize> {
        self.index.get(node).copied()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    /// Out-edge targets of `node`; empty for sinks and for unknown nodes.
    pub fn out_neighbors<'a>(&'a self, node: &N) -> impl Iterator<Item = &'a N> + 'a {
        let nbrs = match self.index.get(node) {
            Some(&u) => self.adjacency.neighbors_ref(u),
            None => &[],
        };
        nbrs.iter().map(move |&v| &self.labels[v])
    }

    pub fn out_degree(&self, node: &N) -> usize {
        self.index
            .get(node)
            .map_or(0, |&u| GraphRef::out_degree(&self.adjacency, u))
    }
}

impl<N> LinkGraph<N> {
    /// Every node, sources and sink-only targets alike, in index order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.labels.iter()
    }

    pub fn labels(&self) -> &[N] {
        &self.labels
    }

    pub fn label(&self, index: usize) -> Option<&N> {
        self.labels.get(index)
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        GraphRef::edge_count(&self.adjacency)
    }

    pub fn adjacency(&self) -> &AdjacencyList {
        &self.adjacency
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.node_count(),
            edges: self.edge_count(),
            dead_ends: self.adjacency.dead_ends().len(),
        }
    }
}

impl LinkGraph<String> {
    /// Parse an edge list, one `<source> <target>` pair per line.
    ///
    /// Fails on the first malformed line; no partial graph is returned.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut b = LinkGraphBuilder::new();
        for (i, line) in lines.into_iter().enumerate() {
            if let Some((source, target)) = parse_edge_line(i + 1, line.as_ref())? {
                b.add_edge(source.to_string(), target.to_string());
            }
        }
        b.build()
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut b = LinkGraphBuilder::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if let Some((source, target)) = parse_edge_line(i + 1, &line)? {
                b.add_edge(source.to_string(), target.to_string());
            }
        }
        b.build()
    }
}

#[cfg(feature = "petgraph")]
impl<Ix: petgraph::graph::IndexType> LinkGraph<petgraph::graph::NodeIndex<Ix>> {
    /// Key nodes by their `NodeIndex`. Isolated nodes and parallel edges are kept.
    pub fn from_petgraph<W, E>(
        graph: &petgraph::Graph<W, E, petgraph::Directed, Ix>,
    ) -> Result<Self> {
        use petgraph::visit::EdgeRef;

        let mut b = LinkGraphBuilder::new();
        for n in graph.node_indices() {
            b.add_node(n);
        }
        for e in graph.edge_references() {
            b.add_edge(e.source(), e.target());
        }
        b.build()
    }
}

impl<N> GraphRef for LinkGraph<N> {
    fn node_count(&self) -> usize {
        self.labels.len()
    }

    fn neighbors_ref(&self, node: usize) -> &[usize] {
        self.adjacency.neighbors_ref(node)
    }

    fn edge_count(&self) -> usize {
        GraphRef::edge_count(&self.adjacency)
    }
}
