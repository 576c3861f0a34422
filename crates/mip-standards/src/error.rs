#![deny(unsafe_code)]

use std::path::PathBuf;

use mip_model::RuleTable;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("missing rule file: {path}")]
    MissingFile { path: PathBuf },

    #[error("required column '{column}' not found in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("invalid bound '{value}' on line {line} of {path}")]
    InvalidBound {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("labels '{first}' and '{second}' in {table} differ only by case")]
    AmbiguousLabel {
        table: RuleTable,
        first: String,
        second: String,
    },

    #[error("rule table {table} is empty")]
    EmptyTable { table: RuleTable },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StandardsError>;
