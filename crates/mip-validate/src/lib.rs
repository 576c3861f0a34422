//! Row classification and label diagnosis.
//!
//! [`diagnose`] streams a file once, routes every data row to one of four
//! destination files, and reports bad labels, unknown labels, and years that
//! the reference data does not list yet.

mod diagnose;
mod error;
pub mod labels;
mod streams;
pub mod structural;

pub use diagnose::{data_width, diagnose};
pub use error::{DiagnosisError, Result};
pub use labels::{DistinctValues, FieldDiagnoser, LabelReport, Verdict};
pub use streams::{OutputNames, StreamPaths};
pub use structural::{RowOutcome, StructuralValidator};
