//! Error type for dataset construction and transformation.

/// Error type for [`GroupedDataset`](super::GroupedDataset) operations.
///
/// Construction errors (`ShapeMismatch` through `NonContiguousQuery`) are
/// detected eagerly, before the dataset is built. Transformation errors
/// (`FeatureIndexOutOfBounds`, `UnknownQuery`, `InvalidRatio`) are detected
/// before any allocation, so a failed transformation leaves nothing behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    #[error("{field} has length {got} but expected {expected}")]
    ShapeMismatch {
        expected: usize,
        got: usize,
        field: &'static str,
    },

    #[error("query offsets must start at 0 (got {got})")]
    OffsetsBadStart { got: usize },

    #[error("query offsets must end at n_instances = {n_instances} (got {last})")]
    OffsetsBadEnd { last: usize, n_instances: usize },

    #[error("query offsets must be strictly increasing (violated at offset {index})")]
    NonIncreasingOffsets { index: usize },

    #[error("duplicate query id {qid}")]
    DuplicateQueryId { qid: u64 },

    #[error("query id {qid} reappears after a different query; instances of one query must be contiguous")]
    NonContiguousQuery { qid: u64 },

    #[error("feature index {index} out of range for dataset with {n_features} features")]
    FeatureIndexOutOfBounds { index: usize, n_features: usize },

    #[error("query id {qid} not present in the dataset")]
    UnknownQuery { qid: u64 },

    #[error(
        "invalid split fractions train={train}, validation={validation}: \
         each must lie in [0, 1] and their sum must not exceed 1"
    )]
    InvalidRatio { train: f64, validation: f64 },
}
