//! Randomized query-granular partitioning.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use super::dataset::GroupedDataset;
use super::error::DatasetError;

/// Tolerance for fraction sums: `0.7 + 0.3` must be accepted even when the
/// binary sum lands a hair above 1.
const RATIO_SLACK: f64 = 1e-9;

impl GroupedDataset {
    /// Split into train/validation/test partitions at query granularity.
    ///
    /// A query's instances are never divided across partitions. The distinct
    /// query ids are shuffled with the caller-supplied generator, then taken
    /// as three contiguous blocks: `round(train_fraction * n_queries)` ids
    /// for train, `round(validation_fraction * n_queries)` for validation,
    /// and the remainder for test. Rounding slack always lands in the test
    /// partition. Within each partition, queries keep the source's relative
    /// order and rows are copied verbatim.
    ///
    /// `validation_fraction == 0.0` yields `None` for the middle element;
    /// callers must check for absence before use.
    ///
    /// Randomness is explicit: pass a seeded generator (for example
    /// `StdRng::seed_from_u64`) for reproducible splits.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidRatio`] if either fraction lies outside
    /// `[0, 1]` or their sum exceeds 1. Checked before anything else.
    ///
    /// # Example
    ///
    /// ```
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    ///
    /// let ds = rankset::testing::synthetic_ranking(10, 4, 3, 7);
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let (train, validation, test) = ds.split(0.6, 0.2, &mut rng).unwrap();
    ///
    /// assert_eq!(train.n_queries(), 6);
    /// assert_eq!(validation.unwrap().n_queries(), 2);
    /// assert_eq!(test.n_queries(), 2);
    /// ```
    #[allow(clippy::type_complexity)]
    pub fn split<R: Rng + ?Sized>(
        &self,
        train_fraction: f64,
        validation_fraction: f64,
        rng: &mut R,
    ) -> Result<(GroupedDataset, Option<GroupedDataset>, GroupedDataset), DatasetError> {
        let in_unit = |f: f64| (0.0..=1.0).contains(&f);
        if !in_unit(train_fraction)
            || !in_unit(validation_fraction)
            || train_fraction + validation_fraction > 1.0 + RATIO_SLACK
        {
            return Err(DatasetError::InvalidRatio {
                train: train_fraction,
                validation: validation_fraction,
            });
        }

        let n_queries = self.n_queries();
        let mut shuffled = self.query_ids.clone();
        shuffled.shuffle(rng);

        let n_train = ((train_fraction * n_queries as f64).round() as usize).min(n_queries);
        let n_valid = ((validation_fraction * n_queries as f64).round() as usize)
            .min(n_queries - n_train);

        let train_ids: HashSet<u64> = shuffled[..n_train].iter().copied().collect();
        let valid_ids: HashSet<u64> =
            shuffled[n_train..n_train + n_valid].iter().copied().collect();
        let test_ids: HashSet<u64> = shuffled[n_train + n_valid..].iter().copied().collect();

        let part_name = |suffix: &str| self.name.as_ref().map(|n| format!("{n}.{suffix}"));

        let train = self.subset_by_qid_set(&train_ids, part_name("train"));
        let validation = if validation_fraction == 0.0 {
            None
        } else {
            Some(self.subset_by_qid_set(&valid_ids, part_name("validation")))
        };
        let test = self.subset_by_qid_set(&test_ids, part_name("test"));

        Ok((train, validation, test))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::synthetic_ranking;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn partitions_cover_queries_exactly_once() {
        let ds = synthetic_ranking(20, 5, 8, 1);
        let mut rng = StdRng::seed_from_u64(99);
        let (train, validation, test) = ds.split(0.5, 0.25, &mut rng).unwrap();
        let validation = validation.unwrap();

        assert_eq!(train.n_queries(), 10);
        assert_eq!(validation.n_queries(), 5);
        assert_eq!(test.n_queries(), 5);

        let mut all: Vec<u64> = train
            .query_ids()
            .iter()
            .chain(validation.query_ids())
            .chain(test.query_ids())
            .copied()
            .collect();
        all.sort_unstable();
        let mut expected = ds.query_ids().to_vec();
        expected.sort_unstable();
        assert_eq!(all, expected);

        assert_eq!(
            train.n_instances() + validation.n_instances() + test.n_instances(),
            ds.n_instances()
        );
    }

    #[test]
    fn zero_validation_fraction_yields_none() {
        let ds = synthetic_ranking(10, 3, 4, 2);
        let mut rng = StdRng::seed_from_u64(7);
        let (train, validation, test) = ds.split(0.8, 0.0, &mut rng).unwrap();
        assert!(validation.is_none());
        assert_eq!(train.n_queries() + test.n_queries(), 10);
    }

    #[test]
    fn seeded_splits_are_reproducible() {
        let ds = synthetic_ranking(15, 4, 6, 3);
        let split_with = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            ds.split(0.6, 0.2, &mut rng).unwrap()
        };
        let (a_train, a_valid, a_test) = split_with(5);
        let (b_train, b_valid, b_test) = split_with(5);
        assert_eq!(a_train, b_train);
        assert_eq!(a_valid, b_valid);
        assert_eq!(a_test, b_test);
    }

    #[test]
    fn partitions_preserve_query_rows() {
        let ds = synthetic_ranking(8, 3, 5, 11);
        let mut rng = StdRng::seed_from_u64(0);
        let (train, _, _) = ds.split(0.5, 0.25, &mut rng).unwrap();

        for span in train.queries() {
            let q = ds
                .query_ids()
                .iter()
                .position(|&qid| qid == span.qid)
                .unwrap();
            assert_eq!(
                train.features().slice(ndarray::s![span.range(), ..]),
                ds.query_features(q)
            );
        }
    }

    #[test]
    fn rounding_slack_goes_to_test() {
        // round(0.5 * 3) = 2 train queries, no validation, 1 test query.
        let ds = synthetic_ranking(3, 2, 4, 13);
        let mut rng = StdRng::seed_from_u64(21);
        let (train, validation, test) = ds.split(0.5, 0.0, &mut rng).unwrap();
        assert!(validation.is_none());
        assert_eq!(train.n_queries(), 2);
        assert_eq!(test.n_queries(), 1);
    }

    #[test]
    fn whole_dataset_to_train() {
        let ds = synthetic_ranking(5, 2, 3, 17);
        let mut rng = StdRng::seed_from_u64(1);
        let (train, validation, test) = ds.split(1.0, 0.0, &mut rng).unwrap();
        assert!(validation.is_none());
        assert_eq!(train.n_instances(), ds.n_instances());
        assert_eq!(test.n_queries(), 0);
        assert_eq!(test.n_instances(), 0);
    }

    #[test]
    fn invalid_fractions_rejected() {
        let ds = synthetic_ranking(4, 2, 3, 19);
        let mut rng = StdRng::seed_from_u64(2);
        assert!(matches!(
            ds.split(0.8, 0.4, &mut rng),
            Err(DatasetError::InvalidRatio { .. })
        ));
        assert!(matches!(
            ds.split(-0.1, 0.0, &mut rng),
            Err(DatasetError::InvalidRatio { .. })
        ));
        assert!(matches!(
            ds.split(0.5, 1.2, &mut rng),
            Err(DatasetError::InvalidRatio { .. })
        ));
        // Exact complement is fine despite float addition.
        assert!(ds.split(0.7, 0.3, &mut rng).is_ok());
    }

    #[test]
    fn split_names_derive_from_source() {
        let ds = synthetic_ranking(6, 2, 3, 23).with_name("web10k");
        let mut rng = StdRng::seed_from_u64(3);
        let (train, validation, test) = ds.split(0.5, 0.2, &mut rng).unwrap();
        assert_eq!(train.name(), Some("web10k.train"));
        assert_eq!(validation.unwrap().name(), Some("web10k.validation"));
        assert_eq!(test.name(), Some("web10k.test"));
    }
}
