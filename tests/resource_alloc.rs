use linkrank::{walk_hits, AdjacencyList, StochasticConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use stats_alloc::{Region, StatsAlloc, INSTRUMENTED_SYSTEM};
use std::alloc::System;

#[global_allocator]
static GLOBAL: &StatsAlloc<System> = &INSTRUMENTED_SYSTEM;

fn chain(n: usize) -> AdjacencyList {
    // i -> i+1 and i -> i-1; node 0 only links forward, last node is a dead end.
    let mut adj = vec![Vec::new(); n];
    for i in 0..n - 1 {
        adj[i].push(i + 1);
        if i > 0 {
            adj[i].push(i - 1);
        }
    }
    AdjacencyList::from_neighbors(adj).unwrap()
}

#[test]
fn estimators_do_not_allocate_per_walk_or_per_step() {
    // This is a “resource consumption” test: both estimators should allocate only their
    // working vectors, so the allocation count must not grow with repeats / steps.
    // We count allocations, not RSS (portable across OSes/CI).
    let g = chain(1_000);

    let small = StochasticConfig { repeats: 10, steps: 20 };
    let large = StochasticConfig { repeats: 10_000, steps: 20 };

    let r_small = Region::new(&GLOBAL);
    let hits = walk_hits(&g, small, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
    let s_small = r_small.change();
    assert_eq!(hits.iter().sum::<u64>(), 200);

    let r_large = Region::new(&GLOBAL);
    let hits = walk_hits(&g, large, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
    let s_large = r_large.change();
    assert_eq!(hits.iter().sum::<u64>(), 200_000);

    // Coarse on purpose: exact counts vary by allocator/platform.
    assert!(
        s_large.allocations <= s_small.allocations + 2,
        "walk allocations grew with repeats (small={}, large={})",
        s_small.allocations,
        s_large.allocations
    );

    // The parallel sparse kernel allocates per-worker partials each step; this only holds serially.
    #[cfg(not(feature = "parallel"))]
    {
        use linkrank::{power_iteration, DistributionConfig, Representation};

        let cfg = |steps| DistributionConfig {
            steps,
            damping: 0.85,
            representation: Representation::Sparse,
        };

        let r_few = Region::new(&GLOBAL);
        let pr = power_iteration(&g, cfg(2)).unwrap();
        let s_few = r_few.change();
        assert_eq!(pr.len(), 1_000);

        let r_many = Region::new(&GLOBAL);
        let pr = power_iteration(&g, cfg(500)).unwrap();
        let s_many = r_many.change();
        assert_eq!(pr.len(), 1_000);

        assert!(
            s_many.allocations <= s_few.allocations + 2,
            "power iteration allocations grew with steps (few={}, many={})",
            s_few.allocations,
            s_many.allocations
        );
    }
}
