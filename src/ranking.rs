//! Ranking results.

use ordered_float::NotNan;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

/// What a [`Ranking`]'s scores mean.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScoreKind {
    /// Raw random-walk hit counts; they sum exactly to `total` (`repeats * steps`).
    HitCount { total: u64 },
    /// Hit counts divided by their total.
    Frequency,
    /// Stationary probability mass; sums to 1 within floating-point tolerance.
    Probability,
}

/// Node -> score mapping over exactly a graph's node set.
///
/// Entries keep the graph's node index order.
#[derive(Debug, Clone)]
pub struct Ranking<N> {
    labels: Vec<N>,
    scores: Vec<f64>,
    lookup: HashMap<N, usize>,
    kind: ScoreKind,
}

impl<N: Hash + Eq + Clone> Ranking<N> {
    /// `labels[i]` is scored by `scores[i]`.
    ///
    /// # Panics
    /// If the two slices differ in length.
    pub fn from_scores(labels: &[N], scores: Vec<f64>, kind: ScoreKind) -> Self {
        assert_eq!(labels.len(), scores.len(), "one score per node");
        let lookup = labels
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Self {
            labels: labels.to_vec(),
            scores,
            lookup,
            kind,
        }
    }

    pub fn get(&self, node: &N) -> Option<f64> {
        self.lookup.get(node).map(|&i| self.scores[i])
    }

    pub fn into_map(self) -> HashMap<N, f64> {
        self.labels.into_iter().zip(self.scores).collect()
    }
}

impl<N> Ranking<N> {
    pub fn kind(&self) -> ScoreKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&N, f64)> + '_ {
        self.labels.iter().zip(self.scores.iter().copied())
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Sum of all scores.
    pub fn total(&self) -> f64 {
        self.scores.iter().sum()
    }

    /// Convert hit counts to visit frequencies. Other kinds are returned unchanged.
    pub fn into_frequencies(mut self) -> Self {
        if let ScoreKind::HitCount { total } = self.kind {
            // Hit counts sum exactly to `total`, so normalizing divides by it.
            if total > 0 {
                normalize(&mut self.scores);
            }
            self.kind = ScoreKind::Frequency;
        }
        self
    }

    /// The `k` best entries, score descending; ties go to the lower node index.
    ///
    /// Non-finite scores are skipped.
    pub fn top_k(&self, k: usize) -> Vec<(&N, f64)> {
        if k == 0 || self.scores.is_empty() {
            return Vec::new();
        }
        let mut heap = BinaryHeap::with_capacity(k + 1);
        for (i, &score) in self.scores.iter().enumerate() {
            if !score.is_finite() {
                continue;
            }
            let Ok(s) = NotNan::new(score) else { continue };
            let key = (s, Reverse(i));
            if heap.len() < k {
                heap.push(Reverse(key));
            } else if let Some(Reverse(min_key)) = heap.peek() {
                if key > *min_key {
                    heap.pop();
                    heap.push(Reverse(key));
                }
            }
        }
        let mut keys: Vec<(NotNan<f64>, Reverse<usize>)> =
            heap.into_iter().map(|Reverse(key)| key).collect();
        keys.sort_unstable_by(|a, b| b.cmp(a));
        keys.into_iter()
            .map(|(s, Reverse(i))| (&self.labels[i], s.into_inner()))
            .collect()
    }
}

/// Scale `scores` in place so they sum to 1. A no-op when the sum is not positive.
pub fn normalize(scores: &mut [f64]) {
    let sum: f64 = scores.iter().sum();
    if sum > 0.0 {
        for s in scores {
            *s /= sum;
        }
    }
}
