//! Lazy per-query iteration over the offset index.

use std::iter::FusedIterator;
use std::ops::Range;

use super::dataset::GroupedDataset;

/// One query's contiguous row range: `[start, end)` into the feature matrix
/// and label vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySpan {
    /// External query identifier.
    pub qid: u64,
    /// First owned row.
    pub start: usize,
    /// One past the last owned row.
    pub end: usize,
}

impl QuerySpan {
    /// Number of instances in the query. Always at least 1.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Never true for a span produced by [`GroupedDataset::queries`], since
    /// every query owns at least one instance.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The row range, for indexing into `features()`/`labels()`.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Iterator over a dataset's queries in stored order.
///
/// Created by [`GroupedDataset::queries`]. Each call creates a fresh iterator
/// starting at the first query; independent iterators over the same dataset
/// do not interfere. The iterator borrows the dataset immutably, so the
/// underlying arrays cannot change while it is alive.
#[derive(Debug, Clone)]
pub struct QueryIter<'a> {
    dataset: &'a GroupedDataset,
    query: usize,
}

impl Iterator for QueryIter<'_> {
    type Item = QuerySpan;

    fn next(&mut self) -> Option<QuerySpan> {
        if self.query >= self.dataset.n_queries() {
            return None;
        }
        let offsets = self.dataset.query_offsets();
        let span = QuerySpan {
            qid: self.dataset.query_ids()[self.query],
            start: offsets[self.query],
            end: offsets[self.query + 1],
        };
        self.query += 1;
        Some(span)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dataset.n_queries() - self.query;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for QueryIter<'_> {}
impl FusedIterator for QueryIter<'_> {}

impl GroupedDataset {
    /// Iterate over queries as `(qid, start, end)` spans in stored order.
    ///
    /// # Example
    ///
    /// ```
    /// use rankset::GroupedDataset;
    /// use ndarray::{Array1, Array2};
    ///
    /// let ds = GroupedDataset::from_instance_qids(
    ///     Array2::zeros((5, 2)),
    ///     Array1::zeros(5),
    ///     &[1, 1, 1, 2, 2],
    /// )
    /// .unwrap();
    ///
    /// let spans: Vec<_> = ds.queries().map(|s| (s.qid, s.start, s.end)).collect();
    /// assert_eq!(spans, vec![(1, 0, 3), (2, 3, 5)]);
    /// ```
    pub fn queries(&self) -> QueryIter<'_> {
        QueryIter {
            dataset: self,
            query: 0,
        }
    }
}
