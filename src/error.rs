use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PrepError>;

#[derive(Debug, Error)]
pub enum PrepError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("signal file {} has no paired header", .0.display())]
    MissingHeader(PathBuf),

    #[error("malformed header {}: {kind}", .path.display())]
    Header { path: PathBuf, kind: HeaderErrorKind },

    #[error("cannot read {}: {kind}", .path.display())]
    Mat { path: PathBuf, kind: MatErrorKind },

    #[error("sex value {0:?} is not one of Male/male/M/Female/female/F/NaN")]
    UnmappedSex(String),

    #[error("age value {0:?} is neither an integer nor \"NaN\"")]
    InvalidAge(String),

    #[error("mapping table: {0}")]
    Csv(#[from] csv::Error),

    #[error("{} has {found} channels, expected {expected}", .path.display())]
    ChannelMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("index {index} out of range for {len} samples")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{what}: expected {expected} entries, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("cannot split {n_samples} samples into {n_folds} folds")]
    InvalidFoldCount { n_folds: usize, n_samples: usize },

    #[error("class column {column} never takes the value {value}")]
    MissingClassValue { column: usize, value: u8 },

    #[error("no input: {0}")]
    EmptyInput(&'static str),
}

impl PrepError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PrepError::Io {
            path: path.into(),
            source,
        }
    }
}

/// What exactly is wrong with a WFDB header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderErrorKind {
    #[error("expected at least {expected} lines, found {found}")]
    TooFewLines { expected: usize, found: usize },

    #[error("record line {0:?} needs name, channel count, frequency and sample count")]
    MalformedRecordLine(String),

    #[error("line {line} should hold `#{field}:`")]
    MissingField { line: usize, field: &'static str },

    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatErrorKind {
    #[error("MATLAB Level 5 files are not supported")]
    Level5,

    #[error("bad Level 4 type flag {0}")]
    BadTypeFlag(i32),

    #[error("only full numeric matrices are supported (type {0})")]
    NotNumeric(i32),

    #[error("file ends inside variable {0:?}")]
    Truncated(String),

    #[error("no variable named {0:?}")]
    VariableNotFound(String),
}
