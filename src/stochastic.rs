//! Monte-Carlo rank estimation by random walks.
//!
//! Each trial starts at a uniformly random node and takes `steps` transitions. Before every
//! transition the current node's hit count is incremented, so a run records exactly
//! `repeats * steps` hits. From a node with out-edges the next node is drawn uniformly from
//! its neighbor slice (parallel edges raise the odds proportionally); from a dead end the
//! walker teleports to a uniformly random node.

use crate::graph::GraphRef;
use crate::link_graph::LinkGraph;
use crate::ranking::{Ranking, ScoreKind};
use crate::{Error, Result};
use rand::Rng;
use std::hash::Hash;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StochasticConfig {
    /// Number of independent walks.
    pub repeats: usize,
    /// Transitions (and recorded hits) per walk.
    pub steps: usize,
}

impl Default for StochasticConfig {
    fn default() -> Self {
        Self {
            repeats: 10_000,
            steps: 100,
        }
    }
}

impl StochasticConfig {
    pub fn validate(&self) -> Result<()> {
        if self.repeats == 0 {
            return Err(Error::InvalidParameter("repeats must be > 0".to_string()));
        }
        if self.steps == 0 {
            return Err(Error::InvalidParameter("steps must be > 0".to_string()));
        }
        self.total_hits().map(|_| ())
    }

    /// `repeats * steps`, the exact sum of the hit counts a run produces.
    pub fn total_hits(&self) -> Result<u64> {
        (self.repeats as u64)
            .checked_mul(self.steps as u64)
            .ok_or_else(|| Error::InvalidParameter("repeats * steps overflows u64".to_string()))
    }
}

/// Hit count per node index.
///
/// Draws only from `rng`; seed it for reproducible counts.
pub fn walk_hits<G, R>(graph: &G, config: StochasticConfig, rng: &mut R) -> Result<Vec<u64>>
where
    G: GraphRef + ?Sized,
    R: Rng,
{
    config.validate()?;
    let n = graph.node_count();
    if n == 0 {
        return Err(Error::EmptyGraph);
    }
    debug!(
        nodes = n,
        repeats = config.repeats,
        steps = config.steps,
        "random walk estimation"
    );

    let mut hits = vec![0u64; n];
    run_trials(graph, config.repeats, config.steps, rng, &mut hits);
    Ok(hits)
}

fn run_trials<G, R>(graph: &G, trials: usize, steps: usize, rng: &mut R, hits: &mut [u64])
where
    G: GraphRef + ?Sized,
    R: Rng,
{
    let n = hits.len();
    for _ in 0..trials {
        let mut current = rng.random_range(0..n);
        for _ in 0..steps {
            hits[current] += 1;
            current = next_node(graph, n, current, rng);
        }
    }
}

#[inline]
fn next_node<G, R>(graph: &G, n: usize, current: usize, rng: &mut R) -> usize
where
    G: GraphRef + ?Sized,
    R: Rng,
{
    let nbrs = graph.neighbors_ref(current);
    if nbrs.is_empty() {
        // dead end: teleport
        rng.random_range(0..n)
    } else {
        nbrs[rng.random_range(0..nbrs.len())]
    }
}

/// Random-walk ranking of a labelled graph, as raw hit counts
/// ([`ScoreKind::HitCount`]); see [`Ranking::into_frequencies`].
pub fn stochastic_rank<N, R>(
    graph: &LinkGraph<N>,
    config: StochasticConfig,
    rng: &mut R,
) -> Result<Ranking<N>>
where
    N: Hash + Eq + Clone,
    R: Rng,
{
    let total = config.total_hits()?;
    let hits = walk_hits(graph, config, rng)?;
    Ok(hits_to_ranking(graph, hits, total))
}

fn hits_to_ranking<N: Hash + Eq + Clone>(
    graph: &LinkGraph<N>,
    hits: Vec<u64>,
    total: u64,
) -> Ranking<N> {
    let scores = hits.into_iter().map(|h| h as f64).collect();
    Ranking::from_scores(graph.labels(), scores, ScoreKind::HitCount { total })
}

#[cfg(feature = "parallel")]
const TRIALS_PER_CHUNK: usize = 4096;

/// Parallel [`walk_hits`].
///
/// Trials are split into fixed-size chunks; chunk `i` walks on its own ChaCha stream
/// (`seed`, stream `i`) into a local counter vector, and the vectors are summed at the end.
///
/// Invariant: output is stable for a fixed `seed`, independent of Rayon thread count.
#[cfg(feature = "parallel")]
pub fn walk_hits_parallel<G>(graph: &G, config: StochasticConfig, seed: u64) -> Result<Vec<u64>>
where
    G: GraphRef + Sync + ?Sized,
{
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rayon::prelude::*;
    use tracing::trace;

    config.validate()?;
    let n = graph.node_count();
    if n == 0 {
        return Err(Error::EmptyGraph);
    }
    let chunks = config.repeats.div_ceil(TRIALS_PER_CHUNK);
    debug!(
        nodes = n,
        repeats = config.repeats,
        steps = config.steps,
        chunks,
        "parallel random walk estimation"
    );

    let hits = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(chunk as u64);
            let done = chunk * TRIALS_PER_CHUNK;
            let trials = TRIALS_PER_CHUNK.min(config.repeats - done);
            let mut local = vec![0u64; n];
            run_trials(graph, trials, config.steps, &mut rng, &mut local);
            trace!(chunk, trials, "walk chunk finished");
            local
        })
        .reduce(
            || vec![0u64; n],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x += y;
                }
                a
            },
        );
    Ok(hits)
}

#[cfg(feature = "parallel")]
pub fn stochastic_rank_parallel<N>(
    graph: &LinkGraph<N>,
    config: StochasticConfig,
    seed: u64,
) -> Result<Ranking<N>>
where
    N: Hash + Eq + Clone + Sync,
{
    let total = config.total_hits()?;
    let hits = walk_hits_parallel(graph, config, seed)?;
    Ok(hits_to_ranking(graph, hits, total))
}
