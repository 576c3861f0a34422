#![deny(unsafe_code)]

pub mod counts;
pub mod diagnosis;
pub mod error;
pub mod format;
pub mod label;
pub mod role;
pub mod table;

pub use counts::{RowClass, RowCounts};
pub use diagnosis::DiagnosisResult;
pub use error::{ModelError, Result};
pub use format::{ColumnAssignment, ColumnOverride, InputFormat};
pub use label::{BadLabel, Resolution, UnknownLabel};
pub use role::{ColumnRole, RuleTable};
pub use table::{CANONICAL_COLUMNS, OutputRow, SelectionLists};
