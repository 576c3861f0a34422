use thiserror::Error;

use crate::role::ColumnRole;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown label '{label}' ({role}) is both fixed and overridden")]
    ConflictingResolution { role: ColumnRole, label: String },
    #[error("unknown column role: {0}")]
    UnknownRole(String),
    #[error("invalid column assignment '{0}' (expected ROLE=INDEX)")]
    InvalidAssignment(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
