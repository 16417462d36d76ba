//! rankset: query-grouped Learning-to-Rank datasets for Rust.
//!
//! A Learning-to-Rank dataset is a dense feature matrix whose rows are grouped
//! by query: every instance (query/document pair) carries a relevance label
//! and belongs to exactly one query, and all instances of a query occupy a
//! contiguous row range. This crate keeps the matrix, the label vector, and
//! the query grouping in lock-step through every transformation.
//!
//! # Key Types
//!
//! - [`GroupedDataset`] - The immutable dataset container
//! - [`QuerySpan`] / [`QueryIter`] - Per-query row ranges
//! - [`io::svmlight`] - SVMLight-style text codec (`load`/`dump`)
//!
//! # Transformations
//!
//! All transformations return a new dataset and never mutate their source:
//!
//! - [`GroupedDataset::subset_features`] - Keep a selection of feature columns
//! - [`GroupedDataset::subset`] - Keep a selection of queries
//! - [`GroupedDataset::split`] - Randomized query-granular
//!   train/validation/test partitioning
//!
//! # Example
//!
//! ```
//! use rankset::GroupedDataset;
//! use ndarray::{array, Array1};
//!
//! // Two queries: qid 1 owns rows 0..3, qid 2 owns rows 3..5.
//! let features = array![
//!     [0.1, 0.2], [0.3, 0.4], [0.5, 0.6],
//!     [0.7, 0.8], [0.9, 1.0],
//! ];
//! let labels = Array1::from_vec(vec![2.0, 1.0, 0.0, 1.0, 0.0]);
//! let ds = GroupedDataset::new(features, labels, vec![1, 2], vec![0, 3, 5]).unwrap();
//!
//! assert_eq!(ds.n_instances(), 5);
//! assert_eq!(ds.n_queries(), 2);
//! assert_eq!(ds.query_sizes(), vec![3, 2]);
//! assert_eq!(ds.instance_qids(), vec![1, 1, 1, 2, 2]);
//! ```

pub mod dataset;
pub mod io;
pub mod testing;

pub use dataset::{DatasetError, GroupedDataset, QueryIter, QuerySpan};
