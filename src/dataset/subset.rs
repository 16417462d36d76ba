//! Derived datasets: feature-column and query-row subsetting.
//!
//! Both operations validate their arguments before allocating, copy the
//! selected data into fresh backing storage, and leave the source untouched.

use std::collections::HashSet;

use ndarray::Axis;

use super::dataset::GroupedDataset;
use super::error::DatasetError;

impl GroupedDataset {
    /// Keep a selection of feature columns.
    ///
    /// Column *j* of the result is source column `indices[j]`. Indices may
    /// repeat and appear in any order. Rows, labels, query ids, and offsets
    /// are copied unchanged; only the column dimension changes.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::FeatureIndexOutOfBounds`] if any index is not
    /// in `[0, n_features)`. Checked before any allocation.
    ///
    /// # Example
    ///
    /// ```
    /// use rankset::GroupedDataset;
    /// use ndarray::{array, Array1};
    ///
    /// let features = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
    /// let ds = GroupedDataset::new(features, Array1::zeros(2), vec![1], vec![0, 2]).unwrap();
    ///
    /// let narrowed = ds.subset_features(&[2, 0]).unwrap();
    /// assert_eq!(narrowed.n_features(), 2);
    /// assert_eq!(narrowed.features().row(0).to_vec(), vec![3.0, 1.0]);
    /// ```
    pub fn subset_features(&self, indices: &[usize]) -> Result<GroupedDataset, DatasetError> {
        for &index in indices {
            if index >= self.n_features() {
                return Err(DatasetError::FeatureIndexOutOfBounds {
                    index,
                    n_features: self.n_features(),
                });
            }
        }

        Ok(GroupedDataset {
            features: self.features.select(Axis(1), indices),
            labels: self.labels.clone(),
            query_ids: self.query_ids.clone(),
            query_offsets: self.query_offsets.clone(),
            name: self.name.clone(),
        })
    }

    /// Keep a selection of queries.
    ///
    /// The result contains exactly the rows of the requested queries. Kept
    /// queries stay in the source's relative order and each keeps its
    /// original row ordering (a stable filter, not a reordering); offsets are
    /// rebuilt for the smaller instance count. Requesting a query twice is
    /// the same as requesting it once.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::UnknownQuery`] if any requested id is absent
    /// from the source. Checked before any allocation; derive ids from
    /// [`query_ids`](Self::query_ids) to stay on the safe side.
    pub fn subset(
        &self,
        query_ids: &[u64],
        name: Option<&str>,
    ) -> Result<GroupedDataset, DatasetError> {
        let present: HashSet<u64> = self.query_ids.iter().copied().collect();
        for &qid in query_ids {
            if !present.contains(&qid) {
                return Err(DatasetError::UnknownQuery { qid });
            }
        }

        let keep: HashSet<u64> = query_ids.iter().copied().collect();
        Ok(self.subset_by_qid_set(&keep, name.map(str::to_owned)))
    }

    /// Row-selection core shared by [`subset`](Self::subset) and
    /// [`split`](Self::split). Every id in `keep` must exist in the source.
    pub(super) fn subset_by_qid_set(
        &self,
        keep: &HashSet<u64>,
        name: Option<String>,
    ) -> GroupedDataset {
        let mut rows: Vec<usize> = Vec::new();
        let mut query_ids: Vec<u64> = Vec::with_capacity(keep.len());
        let mut query_offsets: Vec<usize> = vec![0];
        for span in self.queries() {
            if keep.contains(&span.qid) {
                rows.extend(span.range());
                query_ids.push(span.qid);
                query_offsets.push(rows.len());
            }
        }

        GroupedDataset {
            features: self.features.select(Axis(0), &rows),
            labels: self.labels.select(Axis(0), &rows),
            query_ids,
            query_offsets,
            name,
        }
    }
}
