//! Error types for output assembly.

use std::path::PathBuf;

use mip_ingest::IngestError;
use mip_model::ColumnRole;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A reviewer both fixed and overrode the same unknown label.
    #[error("{role} label {label:?} has both a fix and an override")]
    ConflictingResolution { role: ColumnRole, label: String },

    #[error("input format has no column for {0}")]
    UnassignedColumn(ColumnRole),

    #[error("{path}:{line}: expected 8 fields, found {found}")]
    MalformedTableRow {
        path: PathBuf,
        line: u64,
        found: usize,
    },
}

impl OutputError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, OutputError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path_without_direction() {
        let err = OutputError::io(
            "accepted.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "I/O error on accepted.txt: denied");
    }
}
