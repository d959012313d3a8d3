use linkrank::{
    distribution_rank, power_iteration, stochastic_rank, walk_hits, AdjacencyList,
    DistributionConfig, GraphRef, LinkGraph, Representation, ScoreKind, StochasticConfig,
    TransitionMatrix,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A caller-side adjacency store, to check the estimators only rely on `GraphRef`.
#[derive(Debug, Clone)]
struct AdjListGraph {
    adj: Vec<Vec<usize>>,
}

impl GraphRef for AdjListGraph {
    fn node_count(&self) -> usize {
        self.adj.len()
    }

    fn neighbors_ref(&self, node: usize) -> &[usize] {
        self.adj.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn undamped(steps: usize) -> DistributionConfig {
    DistributionConfig {
        steps,
        damping: 1.0,
        representation: Representation::Sparse,
    }
}

fn assert_prob_like(xs: impl IntoIterator<Item = f64>) {
    let mut s = 0.0;
    let mut len = 0usize;
    for x in xs {
        assert!(x.is_finite(), "non-finite score: {x}");
        assert!(x >= 0.0, "negative score: {x}");
        s += x;
        len += 1;
    }
    assert!(len > 0);
    assert!((s - 1.0).abs() <= 1e-9 * len as f64, "sum={s} not ~1");
}

#[test]
fn cycle_without_damping_is_uniform() {
    // A -> B -> C -> A
    let g = LinkGraph::from_lines(["A B", "B C", "C A"]).unwrap();
    let r = distribution_rank(&g, undamped(50)).unwrap();
    assert_eq!(r.kind(), ScoreKind::Probability);
    assert_eq!(r.len(), 3);
    for node in ["A", "B", "C"] {
        let x = r.get(&node.to_string()).unwrap();
        assert!((x - 1.0 / 3.0).abs() < 1e-4, "{node}={x}");
    }
    assert_prob_like(r.iter().map(|(_, x)| x));
}

#[test]
fn fan_out_sinks_share_hits_and_root_is_only_a_start() {
    // A -> B, A -> C; B and C are dead ends, nothing links to A.
    let g = LinkGraph::from_lines(["A B", "A C"]).unwrap();
    let cfg = StochasticConfig {
        repeats: 30_000,
        steps: 1,
    };
    let r = stochastic_rank(&g, cfg, &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();
    assert_eq!(r.kind(), ScoreKind::HitCount { total: 30_000 });
    assert_eq!(r.total(), 30_000.0);

    let f = r.into_frequencies();
    let a = f.get(&"A".to_string()).unwrap();
    let b = f.get(&"B".to_string()).unwrap();
    let c = f.get(&"C".to_string()).unwrap();
    // one step per walk: every hit is a uniformly drawn start node
    assert!((a - 1.0 / 3.0).abs() < 0.02, "a={a}");
    assert!((b - c).abs() < 0.03, "b={b} c={c}");
}

#[test]
fn fan_out_longer_walks_favour_sinks_equally() {
    let g = LinkGraph::from_lines(["A B", "A C"]).unwrap();
    let cfg = StochasticConfig {
        repeats: 5_000,
        steps: 20,
    };
    let f = stochastic_rank(&g, cfg, &mut ChaCha8Rng::seed_from_u64(11))
        .unwrap()
        .into_frequencies();
    let a = f.get(&"A".to_string()).unwrap();
    let b = f.get(&"B".to_string()).unwrap();
    let c = f.get(&"C".to_string()).unwrap();
    // A is reached only by teleport, so it trails B and C, which split evenly.
    assert!(a < b && a < c, "a={a} b={b} c={c}");
    assert!((b - c).abs() < 0.03, "b={b} c={c}");
    assert_prob_like([a, b, c]);
}

#[test]
fn stochastic_tracks_distribution_on_undamped_graph() {
    // Teleport-on-dead-end walks and undamped power iteration model the same chain.
    let g = LinkGraph::from_lines(["a b", "b c", "c a", "c b", "b d"]).unwrap();
    let exact = distribution_rank(&g, undamped(200)).unwrap();
    let est = stochastic_rank(
        &g,
        StochasticConfig {
            repeats: 2_000,
            steps: 100,
        },
        &mut ChaCha8Rng::seed_from_u64(3),
    )
    .unwrap()
    .into_frequencies();
    for (node, p) in exact.iter() {
        let q = est.get(node).unwrap();
        assert!((p - q).abs() < 0.02, "{node}: exact={p} estimate={q}");
    }
}

#[test]
fn seeded_stochastic_rank_is_reproducible() {
    let g = LinkGraph::from_lines(["a b", "b a", "b c", "c c", "d a"]).unwrap();
    let cfg = StochasticConfig {
        repeats: 500,
        steps: 30,
    };
    let r1 = stochastic_rank(&g, cfg, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
    let r2 = stochastic_rank(&g, cfg, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
    assert_eq!(r1.scores(), r2.scores());
}

#[test]
fn sparse_and_dense_agree() {
    let g = LinkGraph::from_lines(["a b", "a b", "a c", "b c", "c a", "d a", "e e"]).unwrap();
    let sparse = distribution_rank(
        &g,
        DistributionConfig {
            representation: Representation::Sparse,
            ..DistributionConfig::default()
        },
    )
    .unwrap();
    let dense = distribution_rank(
        &g,
        DistributionConfig {
            representation: Representation::Dense,
            ..DistributionConfig::default()
        },
    )
    .unwrap();
    for ((n1, x), (n2, y)) in sparse.iter().zip(dense.iter()) {
        assert_eq!(n1, n2);
        assert!((x - y).abs() < 1e-12, "{n1}: sparse={x} dense={y}");
    }
    assert_prob_like(sparse.iter().map(|(_, x)| x));
}

#[test]
fn caller_graph_adapter_works_with_both_estimators() {
    // 0 <-> 1, and 2 is dangling
    let g = AdjListGraph {
        adj: vec![vec![1], vec![0], vec![]],
    };
    let sparse = AdjacencyList::from_neighbors(g.adj.clone()).unwrap();
    let pr = power_iteration(&sparse, DistributionConfig::default()).unwrap();
    assert_prob_like(pr.iter().copied());
    assert!((pr[0] - pr[1]).abs() < 1e-9);

    let matrix = TransitionMatrix::from_graph(&g).unwrap();
    let dense = power_iteration(&matrix, DistributionConfig::default()).unwrap();
    for (a, b) in pr.iter().zip(&dense) {
        assert!((a - b).abs() < 1e-12);
    }

    let hits = walk_hits(
        &g,
        StochasticConfig {
            repeats: 100,
            steps: 10,
        },
        &mut ChaCha8Rng::seed_from_u64(0),
    )
    .unwrap();
    assert_eq!(hits.iter().sum::<u64>(), 1_000);
}

#[test]
fn empty_graph_is_an_error() {
    let g = LinkGraph::<String>::from_lines(Vec::<&str>::new()).unwrap();
    assert!(matches!(
        distribution_rank(&g, DistributionConfig::default()),
        Err(linkrank::Error::EmptyGraph)
    ));
    assert!(matches!(
        stochastic_rank(&g, StochasticConfig::default(), &mut ChaCha8Rng::seed_from_u64(0)),
        Err(linkrank::Error::EmptyGraph)
    ));
}

proptest! {
    // Property: both estimators score exactly the graph's node set.
    #[test]
    fn prop_ranking_keys_equal_node_set(
        edges in prop::collection::vec((0u8..10, 0u8..10), 1..30),
        seed in any::<u64>(),
    ) {
        let g = LinkGraph::from_edges(edges).unwrap();
        let d = distribution_rank(&g, DistributionConfig::default()).unwrap();
        let config = StochasticConfig { repeats: 20, steps: 5 };
        let s = stochastic_rank(&g, config, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();

        prop_assert_eq!(d.len(), g.node_count());
        prop_assert_eq!(s.len(), g.node_count());
        for node in g.nodes() {
            prop_assert!(d.get(node).is_some());
            prop_assert!(s.get(node).is_some());
        }
        prop_assert_eq!(s.total(), 100.0);
        prop_assert!(d.iter().all(|(_, x)| x >= 0.0));
    }
}
