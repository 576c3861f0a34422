//! Phase 1: build the canonical table from accepted rows.

use std::path::{Path, PathBuf};

use chrono::Local;
use mip_ingest::{open_lines, split_line, strip_quotes};
use mip_model::{ColumnRole, DiagnosisResult, InputFormat, OutputRow, SelectionLists};
use tracing::{debug, info};

use crate::error::{OutputError, Result};
use crate::resolutions::Resolutions;
use crate::table::write_table;

/// Result of Phase 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledOutput {
    pub path: PathBuf,
    pub rows: usize,
    /// Accepted rows excluded for carrying a pending unknown label.
    pub dropped: usize,
    /// Distinct values of the table as written, before re-validation.
    pub selections: SelectionLists,
}

/// `output_<YYYYmmdd_HHMMSS>.csv` for the current local time.
pub fn timestamped_name() -> String {
    format!("output_{}.csv", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Project one accepted raw line onto the canonical columns.
pub fn project_row(format: &InputFormat, line: &str) -> Result<OutputRow> {
    let fields = split_line(line, format.delimiter());
    let mut row = OutputRow {
        model: format.model_name().to_string(),
        ..OutputRow::default()
    };
    for role in ColumnRole::ALL {
        let index = format
            .column(role)
            .ok_or(OutputError::UnassignedColumn(role))?;
        let value = fields.get(index - 1).map_or("", |raw| strip_quotes(raw));
        value.clone_into(row.get_mut(role));
    }
    Ok(row)
}

/// Write the canonical table into `output_dir` under a timestamped name.
pub fn create(
    format: &InputFormat,
    diagnosis: &DiagnosisResult,
    accepted: &Path,
    output_dir: &Path,
) -> Result<AssembledOutput> {
    std::fs::create_dir_all(output_dir).map_err(|e| OutputError::io(output_dir, e))?;
    create_at(format, diagnosis, accepted, &output_dir.join(timestamped_name()))
}

/// Write the canonical table to an explicit path.
pub fn create_at(
    format: &InputFormat,
    diagnosis: &DiagnosisResult,
    accepted: &Path,
    table_path: &Path,
) -> Result<AssembledOutput> {
    let resolutions = Resolutions::from_diagnosis(diagnosis)?;

    let mut rows = Vec::new();
    let mut dropped = 0;
    for line in open_lines(accepted)? {
        let line = line.map_err(|e| OutputError::io(accepted, e))?;
        let mut row = project_row(format, &line)?;
        if resolutions.drops(&row) {
            dropped += 1;
            continue;
        }
        resolutions.apply(&mut row);
        rows.push(row);
    }
    debug!(kept = rows.len(), dropped, "projected accepted rows");

    write_table(table_path, &rows)?;
    let selections = SelectionLists::from_rows(&rows);
    info!(
        path = %table_path.display(),
        rows = rows.len(),
        dropped,
        "wrote output table"
    );
    Ok(AssembledOutput {
        path: table_path.to_path_buf(),
        rows: rows.len(),
        dropped,
        selections,
    })
}
