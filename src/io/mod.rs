//! Reading and writing datasets in persisted formats.

pub mod svmlight;
