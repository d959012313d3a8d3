//! `linkrank`: rank estimation over directed link graphs.
//!
//! Two estimators share one graph model:
//! - [`stochastic`]: Monte-Carlo random walks that count visits (hit counts).
//! - [`distribution`]: fixed-step power iteration over the transition model.
//!
//! Public invariants (must not drift):
//! - **Node set**: every estimator scores exactly the graph's node set, including
//!   sink-only nodes and dead ends. A [`Ranking`]'s key set equals the graph's node set.
//! - **Multigraph**: repeated edges are kept; a duplicate edge doubles that transition's weight.
//! - **Dead ends**: a node with out-degree zero is handled by an explicit branch
//!   (teleport for walks, uniform redistribution for power iteration), never by a division.
//! - **Determinism**: the stochastic estimator only draws from the RNG it is handed;
//!   there is no internal seeding. Power iteration is deterministic.
//! - **No silent normalization**: a [`Ranking`] carries its [`ScoreKind`].
//!
//! Swappable (allowed to change without breaking the contract):
//! - backing store for power iteration (sparse CSR vs dense matrix, see [`Representation`])
//! - serial vs parallel execution (`parallel` feature)

pub mod distribution;
pub mod graph;
pub mod link_graph;
pub mod matrix;
pub mod parse;
pub mod ranking;
pub mod stochastic;

pub use distribution::{
    distribution_rank, power_iteration, power_iteration_run, DistributionConfig,
    PowerIterationRun, Representation,
};
pub use graph::{AdjacencyList, GraphRef, Transition};
pub use link_graph::{GraphStats, LinkGraph, LinkGraphBuilder};
pub use matrix::TransitionMatrix;
pub use parse::parse_edge_line;
pub use ranking::{normalize, Ranking, ScoreKind};
pub use stochastic::{stochastic_rank, walk_hits, StochasticConfig};

#[cfg(feature = "parallel")]
pub use stochastic::{stochastic_rank_parallel, walk_hits_parallel};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed input on line {line}: {content:?}")]
    MalformedInput { line: usize, content: String },
    #[error("graph has no nodes")]
    EmptyGraph,
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
