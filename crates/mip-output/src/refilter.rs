//! Phase 2: re-validate the produced table after review.
//!
//! Every row is checked again with reviewer fixes re-applied. Rows whose
//! labels are neither canonical nor overridden, whose year is not an integer,
//! or whose value falls outside the range of the resolved (variable, unit)
//! pair are moved to the filtered file. The table is rewritten in place with
//! the rows that survive.

use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use mip_ingest::{parse_value, parse_year};
use mip_model::{ColumnRole, DiagnosisResult, OutputRow, SelectionLists};
use mip_standards::RuleRepository;
use tracing::{debug, info};

use crate::error::{OutputError, Result};
use crate::resolutions::Resolutions;
use crate::table::{read_table, write_table};

/// Result of Phase 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub table: PathBuf,
    pub filtered_path: PathBuf,
    pub kept: usize,
    pub filtered: usize,
    /// Distinct values of the rewritten table.
    pub selections: SelectionLists,
}

impl FilterOutcome {
    /// Whether the caller should tell the reviewer that rows were removed.
    pub fn filtered_any(&self) -> bool {
        self.filtered > 0
    }
}

/// Why a row failed re-validation, or `None` when it passes.
pub fn recheck(
    row: &OutputRow,
    resolutions: &Resolutions,
    rules: &RuleRepository,
) -> Option<String> {
    for role in ColumnRole::LABELS {
        let Some(table) = role.rule_table() else {
            continue;
        };
        let label = row.get(role);
        if !rules.is_valid(table, label) && !resolutions.is_overridden(role, label) {
            return Some(format!("unresolved {} label {label:?}", role.as_str()));
        }
    }
    if parse_year(&row.year).is_none() {
        return Some(format!("year {:?} is not an integer", row.year));
    }
    let Some(value) = parse_value(&row.value) else {
        return Some(format!("value {:?} is not numeric", row.value));
    };
    let range = rules.value_range(&row.variable, &row.unit);
    if !range.contains(value) {
        return Some(format!(
            "value {} outside {range} for ({}, {})",
            row.value, row.variable, row.unit
        ));
    }
    None
}

/// Re-validate `table_path`, write failures to `filtered_path`, and rewrite
/// the table with the survivors.
///
/// Each filtered line holds the eight canonical fields followed by the reason.
pub fn refilter(
    table_path: &Path,
    diagnosis: &DiagnosisResult,
    rules: &RuleRepository,
    filtered_path: &Path,
) -> Result<FilterOutcome> {
    let resolutions = Resolutions::unknown_only(diagnosis)?;
    let rows = read_table(table_path)?;

    let mut filtered = WriterBuilder::new()
        .has_headers(false)
        .from_path(filtered_path)
        .map_err(|e| OutputError::csv(filtered_path, e))?;
    let mut kept = Vec::with_capacity(rows.len());
    let mut filtered_count = 0;
    for mut row in rows {
        resolutions.apply(&mut row);
        match recheck(&row, &resolutions, rules) {
            None => kept.push(row),
            Some(reason) => {
                debug!(reason = %reason, "filtered row");
                let fields = row.fields();
                filtered
                    .write_record(fields.iter().copied().chain([reason.as_str()]))
                    .map_err(|e| OutputError::csv(filtered_path, e))?;
                filtered_count += 1;
            }
        }
    }
    filtered
        .flush()
        .map_err(|e| OutputError::io(filtered_path, e))?;
    write_table(table_path, &kept)?;

    info!(
        table = %table_path.display(),
        kept = kept.len(),
        filtered = filtered_count,
        "refiltered output table"
    );
    Ok(FilterOutcome {
        table: table_path.to_path_buf(),
        filtered_path: filtered_path.to_path_buf(),
        kept: kept.len(),
        filtered: filtered_count,
        selections: SelectionLists::from_rows(&kept),
    })
}
