//! Rank estimation by power iteration.
//!
//! Starting from the uniform prior \(1/n\), each step computes
//! \[
//!   x'_v = \frac{1-d}{n} + \frac{d}{n}\sum_{u \in \mathrm{dead}} x_u
//!        + d \sum_{u \to v} \frac{x_u}{\deg(u)}
//! \]
//! i.e. a dead end behaves as if it linked to every node, and the damping factor \(d\)
//! mixes in uniform teleportation. Total mass is conserved. `d = 1` disables damping.
//!
//! The iteration count is fixed: there is no convergence test and no early exit.

use crate::graph::{GraphRef, Transition};
use crate::link_graph::LinkGraph;
use crate::matrix::TransitionMatrix;
use crate::ranking::{Ranking, ScoreKind};
use crate::{Error, Result};
use std::hash::Hash;
use tracing::debug;

/// Backing store for the transition operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Representation {
    /// CSR adjacency; \(O(\text{edges})\) per step.
    Sparse,
    /// Dense row-stochastic matrix; \(O(n^2)\) per step and memory.
    Dense,
    /// Dense for small graphs with at least \(n^2/4\) edges, sparse otherwise.
    #[default]
    Auto,
}

impl Representation {
    /// `Auto` never picks the dense form above this many nodes.
    pub const DENSE_AUTO_MAX_NODES: usize = 2048;

    /// Resolve `Auto` for a graph of the given size. Never returns `Auto`.
    pub fn resolve(self, node_count: usize, edge_count: usize) -> Representation {
        match self {
            Representation::Auto => {
                let dense_enough =
                    edge_count.saturating_mul(4) >= node_count.saturating_mul(node_count);
                if node_count <= Self::DENSE_AUTO_MAX_NODES && dense_enough {
                    Representation::Dense
                } else {
                    Representation::Sparse
                }
            }
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistributionConfig {
    /// Number of iterations; `0` returns the uniform prior.
    pub steps: usize,
    /// Fraction of mass that follows links each step, in `[0, 1]`.
    pub damping: f64,
    pub representation: Representation,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            steps: 100,
            damping: 0.85,
            representation: Representation::Auto,
        }
    }
}

impl DistributionConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.damping.is_finite() {
            return Err(Error::InvalidParameter("damping must be finite".to_string()));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(Error::InvalidParameter(
                "damping must be in [0,1]".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerIterationRun {
    pub scores: Vec<f64>,
    /// Always equals the configured `steps`.
    pub iterations: usize,
    /// \(L_1\) distance between the last two iterates; `0.0` when no step ran.
    pub last_delta: f64,
}

pub fn power_iteration<T: Transition + ?Sized>(
    op: &T,
    config: DistributionConfig,
) -> Result<Vec<f64>> {
    Ok(power_iteration_run(op, config)?.scores)
}

/// Power iteration with a report of the final step's movement.
///
/// `config.representation` is ignored here: `op` already is the representation.
pub fn power_iteration_run<T: Transition + ?Sized>(
    op: &T,
    config: DistributionConfig,
) -> Result<PowerIterationRun> {
    config.validate()?;
    let n = op.dimension();
    if n == 0 {
        return Err(Error::EmptyGraph);
    }
    let n_f64 = n as f64;
    let d = config.damping;
    let dead_ends: Vec<usize> = (0..n).filter(|&u| op.is_dead_end(u)).collect();

    let mut scores = vec![1.0 / n_f64; n];
    let mut next = vec![0.0; n];
    let mut last_delta = 0.0;

    for _ in 0..config.steps {
        let dead_mass: f64 = dead_ends.iter().map(|&u| scores[u]).sum();
        let teleport = (1.0 - d) / n_f64;
        next.fill(teleport + d * dead_mass / n_f64);
        op.propagate(&scores, d, &mut next);

        last_delta = scores
            .iter()
            .zip(next.iter())
            .map(|(old, new)| (old - new).abs())
            .sum();
        std::mem::swap(&mut scores, &mut next);
    }

    debug!(
        nodes = n,
        dead_ends = dead_ends.len(),
        steps = config.steps,
        damping = d,
        last_delta,
        "power iteration finished"
    );
    Ok(PowerIterationRun {
        scores,
        iterations: config.steps,
        last_delta,
    })
}

/// Power-iteration ranking of a labelled graph ([`ScoreKind::Probability`]).
pub fn distribution_rank<N>(
    graph: &LinkGraph<N>,
    config: DistributionConfig,
) -> Result<Ranking<N>>
where
    N: Hash + Eq + Clone,
{
    config.validate()?;
    if graph.node_count() == 0 {
        return Err(Error::EmptyGraph);
    }
    let adjacency = graph.adjacency();
    let repr = config
        .representation
        .resolve(graph.node_count(), GraphRef::edge_count(adjacency));
    debug!(?repr, "power iteration representation");
    let scores = match repr {
        Representation::Dense => {
            power_iteration(&TransitionMatrix::from_graph(adjacency)?, config)?
        }
        _ => power_iteration(adjacency, config)?,
    };
    Ok(Ranking::from_scores(graph.labels(), scores, ScoreKind::Probability))
}
