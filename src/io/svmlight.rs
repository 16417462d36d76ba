//! SVMLight-style sparse text codec for query-grouped datasets.
//!
//! One line per instance:
//!
//! ```text
//! <label> qid:<integer> <index>:<value> <index>:<value> ...
//! ```
//!
//! Feature indices are 1-based; indices absent from a line are implicitly
//! zero, so each line is a sparse encoding of a dense row. Lines of the same
//! query must be contiguous. Blank lines are skipped and `#` begins a
//! trailing comment.
//!
//! Serialization writes ascending indices and omits zero-valued features, so
//! a load/dump cycle round-trips the structure, not necessarily the bytes:
//! the structure is the contract, the textual layout is not.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::{Array1, Array2};

use crate::dataset::{DatasetError, GroupedDataset};

/// Error type for parsing the SVMLight text format.
///
/// Every format violation identifies the offending 1-based line number.
/// Parsing is all-or-nothing: no partial dataset survives a failure.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: missing label")]
    MissingLabel { line: usize },

    #[error("line {line}: invalid label '{token}'")]
    InvalidLabel { line: usize, token: String },

    #[error("line {line}: missing qid token")]
    MissingQid { line: usize },

    #[error("line {line}: invalid qid token '{token}'")]
    InvalidQid { line: usize, token: String },

    #[error("line {line}: malformed feature pair '{token}'")]
    MalformedPair { line: usize, token: String },

    #[error("line {line}: invalid feature index in '{token}' (indices are 1-based)")]
    InvalidFeatureIndex { line: usize, token: String },

    #[error("line {line}: invalid feature value in '{token}'")]
    InvalidFeatureValue { line: usize, token: String },

    #[error("line {line}: feature index {index} exceeds declared feature count {n_features}")]
    FeatureIndexTooLarge {
        line: usize,
        index: usize,
        n_features: usize,
    },

    #[error("line {line}: query id {qid} reappears after a different query; queries must be contiguous")]
    NonContiguousQuery { line: usize, qid: u64 },

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Parse a dataset from a buffered reader.
///
/// Two passes over the data: first collect each line's label, qid, and
/// sparse `(index, value)` pairs while tracking the maximum feature index,
/// then densify into one zero-filled matrix. When `n_features` is `Some` it
/// is authoritative and an index beyond it is an error; when `None` the
/// width is the maximum index seen across the whole input.
///
/// # Errors
///
/// Any format violation aborts the parse with a line-numbered [`ParseError`];
/// non-contiguous query grouping is rejected the moment a qid reappears.
///
/// # Example
///
/// ```
/// use rankset::io::svmlight;
///
/// let text = "\
/// 2 qid:1 1:0.5 3:0.25
/// 0 qid:1 2:0.125
/// 1 qid:2 1:1.0 # best document for query 2
/// ";
/// let ds = svmlight::read_from(text.as_bytes(), None).unwrap();
///
/// assert_eq!(ds.n_instances(), 3);
/// assert_eq!(ds.n_features(), 3);
/// assert_eq!(ds.query_ids(), &[1, 2]);
/// assert_eq!(ds.features()[[0, 2]], 0.25);
/// assert_eq!(ds.features()[[1, 2]], 0.0); // implicit zero
/// ```
pub fn read_from<R: BufRead>(
    reader: R,
    n_features: Option<usize>,
) -> Result<GroupedDataset, ParseError> {
    let mut rows: Vec<Vec<(usize, f32)>> = Vec::new();
    let mut labels: Vec<f32> = Vec::new();
    let mut qids: Vec<u64> = Vec::new();
    let mut closed_queries: HashSet<u64> = HashSet::new();
    let mut max_index = 0usize;

    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_index + 1;
        let content = match line.split_once('#') {
            Some((head, _comment)) => head,
            None => line.as_str(),
        };
        let content = content.trim();
        if content.is_empty() {
            continue;
        }

        let mut tokens = content.split_whitespace();

        let label_token = tokens
            .next()
            .ok_or(ParseError::MissingLabel { line: line_no })?;
        if label_token.starts_with("qid:") {
            return Err(ParseError::MissingLabel { line: line_no });
        }
        let label: f32 = label_token.parse().map_err(|_| ParseError::InvalidLabel {
            line: line_no,
            token: label_token.to_owned(),
        })?;

        let qid_token = tokens
            .next()
            .ok_or(ParseError::MissingQid { line: line_no })?;
        let qid_digits = qid_token
            .strip_prefix("qid:")
            .ok_or(ParseError::MissingQid { line: line_no })?;
        let qid: u64 = qid_digits.parse().map_err(|_| ParseError::InvalidQid {
            line: line_no,
            token: qid_token.to_owned(),
        })?;

        if qids.last() != Some(&qid) && !closed_queries.insert(qid) {
            return Err(ParseError::NonContiguousQuery { line: line_no, qid });
        }

        let mut pairs: Vec<(usize, f32)> = Vec::new();
        for token in tokens {
            let (index_str, value_str) =
                token.split_once(':').ok_or_else(|| ParseError::MalformedPair {
                    line: line_no,
                    token: token.to_owned(),
                })?;
            let index: usize =
                index_str
                    .parse()
                    .map_err(|_| ParseError::InvalidFeatureIndex {
                        line: line_no,
                        token: token.to_owned(),
                    })?;
            if index == 0 {
                return Err(ParseError::InvalidFeatureIndex {
                    line: line_no,
                    token: token.to_owned(),
                });
            }
            let value: f32 = value_str
                .parse()
                .map_err(|_| ParseError::InvalidFeatureValue {
                    line: line_no,
                    token: token.to_owned(),
                })?;
            if let Some(width) = n_features {
                if index > width {
                    return Err(ParseError::FeatureIndexTooLarge {
                        line: line_no,
                        index,
                        n_features: width,
                    });
                }
            }
            max_index = max_index.max(index);
            pairs.push((index - 1, value));
        }

        labels.push(label);
        qids.push(qid);
        rows.push(pairs);
    }

    let width = n_features.unwrap_or(max_index);
    let mut features = Array2::zeros((rows.len(), width));
    for (row, pairs) in rows.iter().enumerate() {
        for &(col, value) in pairs {
            features[[row, col]] = value;
        }
    }

    Ok(GroupedDataset::from_instance_qids(
        features,
        Array1::from_vec(labels),
        &qids,
    )?)
}

/// Load a dataset from a file path.
///
/// The dataset's width is the maximum feature index in the file, and its
/// name is the path's file stem.
pub fn load<P: AsRef<Path>>(path: P) -> Result<GroupedDataset, ParseError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let dataset = read_from(BufReader::new(file), None)?;
    Ok(match path.file_stem() {
        Some(stem) => dataset.with_name(stem.to_string_lossy()),
        None => dataset,
    })
}

/// Serialize a dataset to a writer.
///
/// One line per instance in memory order, feature pairs in ascending 1-based
/// index order, zero-valued features omitted.
pub fn write_to<W: Write>(dataset: &GroupedDataset, mut writer: W) -> io::Result<()> {
    let features = dataset.features();
    let labels = dataset.labels();
    for span in dataset.queries() {
        for row in span.range() {
            write!(writer, "{} qid:{}", labels[row], span.qid)?;
            for (col, &value) in features.row(row).iter().enumerate() {
                if value != 0.0 {
                    write!(writer, " {}:{}", col + 1, value)?;
                }
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Serialize a dataset to a file path, buffered.
pub fn dump<P: AsRef<Path>>(dataset: &GroupedDataset, path: P) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_to(dataset, &mut writer)?;
    writer.flush()
}
