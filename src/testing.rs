//! Seeded synthetic ranking data for tests and benchmarks.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::GroupedDataset;

/// Generate a dataset with `n_queries` queries of `instances_per_query` rows
/// each, qids `1..=n_queries`.
///
/// Feature values are uniform in `[0.1, 1.0]` (never zero, so serialization
/// keeps every pair and round-trips are exact) and labels are uniform
/// relevance grades in `0..=4`. Deterministic for a fixed seed.
pub fn synthetic_ranking(
    n_queries: usize,
    instances_per_query: usize,
    n_features: usize,
    seed: u64,
) -> GroupedDataset {
    let sizes = vec![instances_per_query; n_queries];
    synthetic_ranking_with_sizes(&sizes, n_features, seed)
}

/// Like [`synthetic_ranking`] but with an explicit instance count per query.
pub fn synthetic_ranking_with_sizes(
    query_sizes: &[usize],
    n_features: usize,
    seed: u64,
) -> GroupedDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let n_instances: usize = query_sizes.iter().sum();

    let features = Array2::from_shape_fn((n_instances, n_features), |_| {
        rng.gen_range(0.1..=1.0f32)
    });
    let labels = Array1::from_shape_fn(n_instances, |_| rng.gen_range(0..=4) as f32);

    let mut qids = Vec::with_capacity(n_instances);
    for (q, &size) in query_sizes.iter().enumerate() {
        qids.extend(std::iter::repeat(q as u64 + 1).take(size));
    }

    GroupedDataset::from_instance_qids(features, labels, &qids)
        .expect("synthetic query grouping is contiguous by construction")
}
