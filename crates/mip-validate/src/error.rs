//! Error types for diagnosis.

use std::path::PathBuf;

use mip_ingest::IngestError;
use mip_model::{ColumnRole, RuleTable};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagnosisError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Every role must be assigned before a full pass.
    #[error("input format is incomplete, unassigned roles: {}", join_roles(.missing))]
    IncompleteFormat { missing: Vec<ColumnRole> },

    #[error("{role} is assigned to column {index} but rows have {width} fields")]
    ColumnOutOfRange {
        role: ColumnRole,
        index: usize,
        width: usize,
    },

    /// Closest-match suggestions need at least one canonical label.
    #[error("rule table {0} is empty")]
    EmptyRuleTable(RuleTable),
}

impl DiagnosisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn join_roles(roles: &[ColumnRole]) -> String {
    roles
        .iter()
        .copied()
        .map(ColumnRole::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, DiagnosisError>;
