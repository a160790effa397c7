//! I/O error types for mimic-io.

use std::path::PathBuf;

/// Errors from file I/O, JSON and CSV parsing, and template serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a JSON document does not match the expected layout.
    #[error("JSON parse error in {path} at line {line}, column {column}")]
    JsonParse {
        /// Path to the JSON file.
        path: PathBuf,
        /// One-based line of the error.
        line: usize,
        /// One-based column of the error.
        column: usize,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when a file holds no gestures, no examples or no frames.
    #[error("empty dataset in {path}")]
    EmptyDataset {
        /// Path to the input file.
        path: PathBuf,
    },

    /// Returned when the frame CSV header is not `x,y,z`.
    #[error("invalid header in {path}: expected x,y,z, found \"{found}\"")]
    InvalidHeader {
        /// Path to the CSV file.
        path: PathBuf,
        /// Header as read, comma-joined.
        found: String,
    },

    /// Returned when a data row does not have exactly three columns.
    #[error("inconsistent row length in {path}: row {row_index} has {got} columns, expected 3")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a cell value is NaN, Inf, or otherwise not a finite float.
    #[error("non-finite value in {path}: row {row_index}, column {col_index}, raw value \"{raw}\"")]
    NonFiniteValue {
        /// Path to the input file.
        path: PathBuf,
        /// Zero-based row (or frame) index.
        row_index: usize,
        /// Zero-based column (or axis) index.
        col_index: usize,
        /// The raw value that failed validation.
        raw: String,
    },

    /// Returned when an example's crop range is empty or outside its frames.
    #[error(
        "invalid crop in {path}: gesture \"{gesture}\" sample {sample} crops [{start}, {end}] of {len} frames"
    )]
    InvalidCrop {
        /// Path to the gesture file.
        path: PathBuf,
        /// Name of the gesture holding the sample.
        gesture: String,
        /// Zero-based sample index within the gesture.
        sample: usize,
        /// Inclusive crop start.
        start: usize,
        /// Inclusive crop end.
        end: usize,
        /// Number of recorded frames.
        len: usize,
    },

    /// Returned when the same gesture name appears more than once.
    #[error("duplicate gesture name \"{name}\" in {path}")]
    DuplicateGesture {
        /// Path to the gesture file.
        path: PathBuf,
        /// The duplicated name.
        name: String,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when templates cannot be encoded as JSON.
    #[error("cannot serialize templates")]
    Serialize {
        /// Underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

impl IoError {
    pub(crate) fn json(path: &std::path::Path, source: serde_json::Error) -> Self {
        Self::JsonParse {
            path: path.to_path_buf(),
            line: source.line(),
            column: source.column(),
            source,
        }
    }
}
