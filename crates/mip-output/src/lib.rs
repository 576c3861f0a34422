//! Canonical output assembly.
//!
//! - Phase 1 ([`create`]) projects accepted rows onto the eight canonical
//!   columns, applies fixes, drops rows with pending unknown labels, and writes
//!   a headerless CSV named `output_<YYYYmmdd_HHMMSS>.csv`.
//! - Phase 2 ([`refilter`]) re-validates that table once a reviewer has fixed
//!   or overridden the unknown labels.

mod assemble;
mod error;
mod refilter;
mod resolutions;
mod table;

pub use assemble::{AssembledOutput, create, create_at, project_row, timestamped_name};
pub use error::{OutputError, Result};
pub use refilter::{FilterOutcome, recheck, refilter};
pub use resolutions::Resolutions;
pub use table::{read_table, write_table};
