//! Query-grouped dataset container and its transformations.
//!
//! # Key Types
//!
//! - [`GroupedDataset`]: Feature matrix + labels + query grouping
//! - [`QuerySpan`] / [`QueryIter`]: Per-query row ranges
//! - [`DatasetError`]: Validation and transformation errors
//!
//! # Storage Layout
//!
//! Features are stored **instance-major** (row-major): `[n_instances,
//! n_features]`. Each instance's feature vector is contiguous in memory,
//! which is what scorers that walk one document at a time want.
//!
//! The query grouping is a single-level compressed structure: `query_ids`
//! holds one id per query and `query_offsets` (length `n_queries + 1`,
//! trailing sentinel equal to `n_instances`) delimits each query's contiguous
//! row range.
//!
//! # Immutability
//!
//! A [`GroupedDataset`] never changes after construction. Subsetting and
//! splitting allocate fresh backing storage sized to the result, so derived
//! datasets share nothing mutable with their source and may be used from
//! independent threads.

mod dataset;
mod error;
mod query;
mod split;
mod subset;

pub use dataset::GroupedDataset;
pub use error::DatasetError;
pub use query::{QueryIter, QuerySpan};
