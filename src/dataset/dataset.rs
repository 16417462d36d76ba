//! Dataset container: storage, validated construction, derived indices.

use std::collections::HashSet;

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

use super::error::DatasetError;

/// An immutable Learning-to-Rank dataset: a dense feature matrix whose rows
/// are grouped by query.
///
/// # Storage Layout
///
/// - `features`: `[n_instances, n_features]`, instance-major. Row *i* is the
///   feature vector of instance *i*.
/// - `labels`: length `n_instances`, the relevance judgment per instance.
///   Stored as `f32` to tolerate graded or continuous judgments.
/// - `query_ids`: length `n_queries`, one external id per query in order of
///   first appearance, no duplicates.
/// - `query_offsets`: length `n_queries + 1`, strictly increasing, starting
///   at 0 and ending at `n_instances`. Rows
///   `query_offsets[q]..query_offsets[q + 1]` belong to `query_ids[q]`.
///
/// # Invariants
///
/// [`GroupedDataset::new`] checks every invariant before the dataset is
/// built, and no `&mut` accessor exists, so a constructed dataset is valid
/// for its whole lifetime. The empty dataset (no queries, no instances,
/// offsets `[0]`) is valid; it arises from subsetting with an empty
/// keep-list and from degenerate split fractions.
///
/// # Equality
///
/// `PartialEq` compares features, labels, query ids, and offsets. The
/// optional [`name`](Self::name) is provenance only and does not participate.
///
/// # Example
///
/// ```
/// use rankset::GroupedDataset;
/// use ndarray::{array, Array1};
///
/// let features = array![[1.0, 0.0], [0.5, 0.5], [0.0, 1.0]];
/// let labels = Array1::from_vec(vec![1.0, 0.0, 2.0]);
/// let ds = GroupedDataset::new(features, labels, vec![7, 9], vec![0, 2, 3]).unwrap();
///
/// assert_eq!(ds.n_features(), 2);
/// assert_eq!(ds.query_sizes(), vec![2, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct GroupedDataset {
    /// Feature data: `[n_instances, n_features]` (instance-major).
    pub(super) features: Array2<f32>,

    /// Relevance labels: length = n_instances.
    pub(super) labels: Array1<f32>,

    /// External query identifiers, one per query, in stored order.
    pub(super) query_ids: Vec<u64>,

    /// Row offsets delimiting each query, with trailing sentinel.
    pub(super) query_offsets: Vec<usize>,

    /// Provenance label. Display only, never affects semantics.
    pub(super) name: Option<String>,
}

impl GroupedDataset {
    /// Create a dataset from its four components, validating every invariant.
    ///
    /// Checks run cheapest-first and before the struct is built: shape
    /// agreement, offset endpoints, strict monotonicity, duplicate query ids.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if:
    /// - `labels` length differs from the feature row count
    /// - `query_offsets` length is not `query_ids.len() + 1`
    /// - offsets do not start at 0, end at `n_instances`, or are not
    ///   strictly increasing (every query needs at least one instance)
    /// - `query_ids` contains a duplicate
    pub fn new(
        features: Array2<f32>,
        labels: Array1<f32>,
        query_ids: Vec<u64>,
        query_offsets: Vec<usize>,
    ) -> Result<Self, DatasetError> {
        let n_instances = features.nrows();

        if labels.len() != n_instances {
            return Err(DatasetError::ShapeMismatch {
                expected: n_instances,
                got: labels.len(),
                field: "labels",
            });
        }
        if query_offsets.len() != query_ids.len() + 1 {
            return Err(DatasetError::ShapeMismatch {
                expected: query_ids.len() + 1,
                got: query_offsets.len(),
                field: "query_offsets",
            });
        }
        // Length check above guarantees at least one offset.
        if query_offsets[0] != 0 {
            return Err(DatasetError::OffsetsBadStart {
                got: query_offsets[0],
            });
        }
        let last = query_offsets[query_ids.len()];
        if last != n_instances {
            return Err(DatasetError::OffsetsBadEnd { last, n_instances });
        }
        for (i, pair) in query_offsets.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(DatasetError::NonIncreasingOffsets { index: i + 1 });
            }
        }
        let mut seen = HashSet::with_capacity(query_ids.len());
        for &qid in &query_ids {
            if !seen.insert(qid) {
                return Err(DatasetError::DuplicateQueryId { qid });
            }
        }

        Ok(Self {
            features,
            labels,
            query_ids,
            query_offsets,
            name: None,
        })
    }

    /// Create a dataset from a flat per-instance query-id vector.
    ///
    /// Builds `query_ids` and `query_offsets` by run-length grouping `qids`.
    /// This is the inverse of [`instance_qids`](Self::instance_qids) and the
    /// constructor the text codec uses.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NonContiguousQuery`] if a query id reappears
    /// after a different id (the grouping assumes instances of one query are
    /// already adjacent), and the shape errors of [`GroupedDataset::new`].
    ///
    /// # Example
    ///
    /// ```
    /// use rankset::GroupedDataset;
    /// use ndarray::{Array1, Array2};
    ///
    /// let features = Array2::zeros((5, 3));
    /// let labels = Array1::zeros(5);
    /// let ds = GroupedDataset::from_instance_qids(features, labels, &[1, 1, 1, 2, 2]).unwrap();
    ///
    /// assert_eq!(ds.query_offsets(), &[0, 3, 5]);
    /// ```
    pub fn from_instance_qids(
        features: Array2<f32>,
        labels: Array1<f32>,
        qids: &[u64],
    ) -> Result<Self, DatasetError> {
        if qids.len() != features.nrows() {
            return Err(DatasetError::ShapeMismatch {
                expected: features.nrows(),
                got: qids.len(),
                field: "qids",
            });
        }

        let mut query_ids: Vec<u64> = Vec::new();
        let mut query_offsets: Vec<usize> = Vec::new();
        let mut seen = HashSet::new();
        for (row, &qid) in qids.iter().enumerate() {
            if query_ids.last() == Some(&qid) {
                continue;
            }
            if !seen.insert(qid) {
                return Err(DatasetError::NonContiguousQuery { qid });
            }
            query_ids.push(qid);
            query_offsets.push(row);
        }
        query_offsets.push(qids.len());

        Self::new(features, labels, query_ids, query_offsets)
    }

    /// Attach a provenance name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of instances (feature matrix rows).
    #[inline]
    pub fn n_instances(&self) -> usize {
        self.features.nrows()
    }

    /// Number of queries.
    #[inline]
    pub fn n_queries(&self) -> usize {
        self.query_ids.len()
    }

    /// Number of features (feature matrix columns).
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Read-only view of the feature matrix, shape `[n_instances, n_features]`.
    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    /// Read-only view of the label vector, length `n_instances`.
    pub fn labels(&self) -> ArrayView1<'_, f32> {
        self.labels.view()
    }

    /// External query identifiers, one per query, in stored order.
    pub fn query_ids(&self) -> &[u64] {
        &self.query_ids
    }

    /// Row offsets delimiting each query (length `n_queries + 1`).
    pub fn query_offsets(&self) -> &[usize] {
        &self.query_offsets
    }

    /// Provenance name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Feature rows of the query at position `q`, shape
    /// `[query_sizes()[q], n_features]`.
    ///
    /// # Panics
    ///
    /// Panics if `q >= n_queries()`.
    pub fn query_features(&self, q: usize) -> ArrayView2<'_, f32> {
        self.features
            .slice(s![self.query_offsets[q]..self.query_offsets[q + 1], ..])
    }

    /// Labels of the query at position `q`.
    ///
    /// # Panics
    ///
    /// Panics if `q >= n_queries()`.
    pub fn query_labels(&self, q: usize) -> ArrayView1<'_, f32> {
        self.labels
            .slice(s![self.query_offsets[q]..self.query_offsets[q + 1]])
    }

    // =========================================================================
    // Derived index utilities
    // =========================================================================

    /// Instance count per query: adjacent offset differences.
    pub fn query_sizes(&self) -> Vec<usize> {
        self.query_offsets
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect()
    }

    /// Per-instance query ids: `query_ids[q]` repeated once per owned row,
    /// in row order. Length `n_instances`.
    ///
    /// This is the flat form external tools expect in place of the compact
    /// offset index.
    pub fn instance_qids(&self) -> Vec<u64> {
        let mut out = Vec::with_capacity(self.n_instances());
        for (qid, size) in self.query_ids.iter().zip(self.query_sizes()) {
            out.extend(std::iter::repeat(*qid).take(size));
        }
        out
    }
}

/// Structural equality over features, labels, query ids, and offsets.
/// `name` is provenance only and excluded.
impl PartialEq for GroupedDataset {
    fn eq(&self, other: &Self) -> bool {
        self.features == other.features
            && self.labels == other.labels
            && self.query_ids == other.query_ids
            && self.query_offsets == other.query_offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn small() -> GroupedDataset {
        // qid 1: rows 0..3, qid 2: rows 3..5
        let features = array![
            [0.1, 0.2, 0.3, 0.4],
            [0.5, 0.6, 0.7, 0.8],
            [0.9, 1.0, 1.1, 1.2],
            [1.3, 1.4, 1.5, 1.6],
            [1.7, 1.8, 1.9, 2.0],
        ];
        let labels = Array1::from_vec(vec![2.0, 1.0, 0.0, 1.0, 0.0]);
        GroupedDataset::new(features, labels, vec![1, 2], vec![0, 3, 5]).unwrap()
    }

    #[test]
    fn construction_and_scalars() {
        let ds = small();
        assert_eq!(ds.n_instances(), 5);
        assert_eq!(ds.n_queries(), 2);
        assert_eq!(ds.n_features(), 4);
        assert_eq!(ds.query_offsets(), &[0, 3, 5]);
    }

    #[test]
    fn derived_utilities() {
        let ds = small();
        assert_eq!(ds.query_sizes(), vec![3, 2]);
        assert_eq!(ds.instance_qids(), vec![1, 1, 1, 2, 2]);
        assert_eq!(
            ds.query_sizes().iter().sum::<usize>(),
            ds.n_instances()
        );
    }

    #[test]
    fn per_query_slices() {
        let ds = small();
        assert_eq!(ds.query_features(1).nrows(), 2);
        assert_eq!(ds.query_features(1).row(0)[0], 1.3);
        assert_eq!(ds.query_labels(0).to_vec(), vec![2.0, 1.0, 0.0]);
    }

    #[test]
    fn from_instance_qids_round_trips() {
        let ds = small();
        let rebuilt = GroupedDataset::from_instance_qids(
            ds.features.clone(),
            ds.labels.clone(),
            &ds.instance_qids(),
        )
        .unwrap();
        assert_eq!(rebuilt, ds);
    }

    #[test]
    fn from_instance_qids_rejects_interleaving() {
        let features = Array2::zeros((4, 2));
        let labels = Array1::zeros(4);
        let err =
            GroupedDataset::from_instance_qids(features, labels, &[1, 2, 1, 2]).unwrap_err();
        assert_eq!(err, DatasetError::NonContiguousQuery { qid: 1 });
    }

    #[test]
    fn empty_dataset_is_valid() {
        let ds =
            GroupedDataset::new(Array2::zeros((0, 3)), Array1::zeros(0), vec![], vec![0])
                .unwrap();
        assert_eq!(ds.n_instances(), 0);
        assert_eq!(ds.n_queries(), 0);
        assert_eq!(ds.n_features(), 3);
        assert!(ds.query_sizes().is_empty());
        assert!(ds.queries().next().is_none());
    }

    #[test]
    fn label_length_mismatch() {
        let err = GroupedDataset::new(
            Array2::zeros((3, 2)),
            Array1::zeros(2),
            vec![1],
            vec![0, 3],
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::ShapeMismatch { field: "labels", .. }));
    }

    #[test]
    fn offsets_must_cover_all_instances() {
        let err = GroupedDataset::new(
            Array2::zeros((3, 2)),
            Array1::zeros(3),
            vec![1],
            vec![0, 2],
        )
        .unwrap_err();
        assert_eq!(err, DatasetError::OffsetsBadEnd { last: 2, n_instances: 3 });
    }

    #[test]
    fn offsets_must_be_strictly_increasing() {
        let err = GroupedDataset::new(
            Array2::zeros((3, 2)),
            Array1::zeros(3),
            vec![1, 2],
            vec![0, 0, 3],
        )
        .unwrap_err();
        assert_eq!(err, DatasetError::NonIncreasingOffsets { index: 1 });
    }

    #[test]
    fn duplicate_query_ids_rejected() {
        let err = GroupedDataset::new(
            Array2::zeros((4, 2)),
            Array1::zeros(4),
            vec![5, 5],
            vec![0, 2, 4],
        )
        .unwrap_err();
        assert_eq!(err, DatasetError::DuplicateQueryId { qid: 5 });
    }

    #[test]
    fn name_does_not_affect_equality() {
        let a = small();
        let b = small().with_name("validation-fold");
        assert_eq!(a, b);
        assert_eq!(b.name(), Some("validation-fold"));
    }

    // Verify Send + Sync
    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn dataset_is_send_sync() {
        assert_send_sync::<GroupedDataset>();
    }
}
