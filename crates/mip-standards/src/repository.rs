//! The read-only rule repository.
//!
//! A rule set is a directory holding one CSV per reference sheet:
//!
//! ```text
//! rules/
//!   ModelTable.csv              Model
//!   ScenarioTable.csv           Scenario
//!   RegionTable.csv             Region
//!   VariableTable.csv           Variable
//!   ItemTable.csv               Item
//!   UnitTable.csv               Unit
//!   YearTable.csv               Year
//!   RegionFixTable.csv          Region, Fix
//!   ValueFixTable.csv           Value, Fix
//!   VariableUnitValueTable.csv  Variable, Unit, Minimum Value, Maximum Value
//! ```
//!
//! Loading happens once at startup. Any schema problem is fatal.

use std::collections::BTreeMap;
use std::path::Path;

use mip_model::RuleTable;
use tracing::{debug, info};

use crate::csv_utils::{CsvSheet, read_csv_sheet};
use crate::error::{Result, StandardsError};
use crate::tables::{FixTable, LabelTable, RangeTable, ValueRange};

pub const REGION_FIX_SHEET: &str = "RegionFixTable";
pub const VALUE_FIX_SHEET: &str = "ValueFixTable";
pub const RANGE_SHEET: &str = "VariableUnitValueTable";

/// Reference data for label reconciliation and value validation.
#[derive(Debug, Clone)]
pub struct RuleRepository {
    labels: BTreeMap<RuleTable, LabelTable>,
    region_fixes: FixTable,
    value_fixes: FixTable,
    ranges: RangeTable,
}

impl RuleRepository {
    pub fn builder() -> RuleRepositoryBuilder {
        RuleRepositoryBuilder::default()
    }

    /// Load a rule set directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut builder = Self::builder();
        for table in RuleTable::ALL {
            let sheet = read_csv_sheet(&sheet_path(dir, table.sheet_name()))?;
            let column = sheet.column(table.column_name())?;
            let labels: Vec<String> = sheet
                .cells(column)
                .map(|(_, cell)| cell.to_string())
                .collect();
            let labels = LabelTable::new(table, labels)?;
            // New data may introduce years the table has never seen; every
            // other role needs at least one candidate for closest-match.
            if labels.is_empty() && table != RuleTable::Year {
                return Err(StandardsError::EmptyTable { table });
            }
            debug!(table = %table, labels = labels.len(), "loaded label table");
            builder.labels.insert(table, labels);
        }

        builder.region_fixes = load_fix_sheet(dir, REGION_FIX_SHEET, "Region")?;
        builder.value_fixes = load_fix_sheet(dir, VALUE_FIX_SHEET, "Value")?;
        builder.ranges = load_range_sheet(dir)?;

        let repository = builder.finish();
        info!(
            rules_dir = %dir.display(),
            region_fixes = repository.region_fixes.len(),
            value_fixes = repository.value_fixes.len(),
            ranges = repository.ranges.len(),
            "loaded rule set"
        );
        Ok(repository)
    }

    pub fn table(&self, table: RuleTable) -> &LabelTable {
        // Every table is present: the builder fills missing ones with empties.
        &self.labels[&table]
    }

    /// Exact, case-sensitive membership.
    pub fn is_valid(&self, table: RuleTable, label: &str) -> bool {
        self.table(table).contains(label)
    }

    /// Case-insensitive match returning the canonical casing.
    pub fn match_exact(&self, table: RuleTable, label: &str) -> Option<&str> {
        self.table(table).match_exact(label)
    }

    /// Closest canonical label. `None` only when the table is empty.
    pub fn match_fuzzy(&self, table: RuleTable, label: &str) -> Option<&str> {
        self.table(table).match_fuzzy(label)
    }

    pub fn fix_value(&self, raw: &str) -> Option<&str> {
        self.value_fixes.get(raw)
    }

    pub fn fix_region(&self, raw: &str) -> Option<&str> {
        self.region_fixes.get(raw)
    }

    /// Allowed range for a pair; unbounded when the pair is not listed.
    pub fn value_range(&self, variable: &str, unit: &str) -> ValueRange {
        self.ranges.get(variable, unit)
    }

    pub fn region_fixes(&self) -> &FixTable {
        &self.region_fixes
    }

    pub fn value_fixes(&self) -> &FixTable {
        &self.value_fixes
    }

    pub fn ranges(&self) -> &RangeTable {
        &self.ranges
    }
}

/// Programmatic construction, mainly for fixtures and embedding.
#[derive(Debug, Default)]
pub struct RuleRepositoryBuilder {
    labels: BTreeMap<RuleTable, LabelTable>,
    region_fixes: FixTable,
    value_fixes: FixTable,
    ranges: RangeTable,
}

impl RuleRepositoryBuilder {
    pub fn labels<I, S>(mut self, table: RuleTable, labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.insert(table, LabelTable::new(table, labels)?);
        Ok(self)
    }

    pub fn region_fix(mut self, raw: &str, fix: &str) -> Self {
        self.region_fixes.insert(raw, fix);
        self
    }

    pub fn value_fix(mut self, raw: &str, fix: &str) -> Self {
        self.value_fixes.insert(raw, fix);
        self
    }

    pub fn range(mut self, variable: &str, unit: &str, min: f64, max: f64) -> Self {
        self.ranges.insert(variable, unit, ValueRange::new(min, max));
        self
    }

    pub fn build(self) -> RuleRepository {
        self.finish()
    }

    fn finish(mut self) -> RuleRepository {
        for table in RuleTable::ALL {
            self.labels
                .entry(table)
                .or_insert_with(|| LabelTable::empty(table));
        }
        RuleRepository {
            labels: self.labels,
            region_fixes: self.region_fixes,
            value_fixes: self.value_fixes,
            ranges: self.ranges,
        }
    }
}

fn sheet_path(dir: &Path, sheet: &str) -> std::path::PathBuf {
    dir.join(format!("{sheet}.csv"))
}

fn load_fix_sheet(dir: &Path, sheet: &str, key_column: &str) -> Result<FixTable> {
    let sheet = read_csv_sheet(&sheet_path(dir, sheet))?;
    let key = sheet.column(key_column)?;
    let fix = sheet.column("Fix")?;
    let mut table = FixTable::new();
    for row in &sheet.rows {
        let raw = row.get(key).map(String::as_str).unwrap_or("");
        let replacement = row.get(fix).map(String::as_str).unwrap_or("");
        if raw.is_empty() {
            continue;
        }
        table.insert(raw, replacement);
    }
    Ok(table)
}

fn load_range_sheet(dir: &Path) -> Result<RangeTable> {
    let sheet = read_csv_sheet(&sheet_path(dir, RANGE_SHEET))?;
    let variable = sheet.column("Variable")?;
    let unit = sheet.column("Unit")?;
    let min = sheet.column("Minimum Value")?;
    let max = sheet.column("Maximum Value")?;
    let mut table = RangeTable::new();
    for (offset, row) in sheet.rows.iter().enumerate() {
        let line = offset + 2;
        let cell = |index: usize| row.get(index).map(String::as_str).unwrap_or("");
        if cell(variable).is_empty() || cell(unit).is_empty() {
            continue;
        }
        let lower = parse_bound(&sheet, line, cell(min), f64::NEG_INFINITY)?;
        let upper = parse_bound(&sheet, line, cell(max), f64::INFINITY)?;
        if lower > upper {
            return Err(StandardsError::InvalidBound {
                path: sheet.path.clone(),
                line,
                value: format!("{} > {}", cell(min), cell(max)),
            });
        }
        table.insert(cell(variable), cell(unit), ValueRange::new(lower, upper));
    }
    Ok(table)
}

fn parse_bound(sheet: &CsvSheet, line: usize, raw: &str, unbounded: f64) -> Result<f64> {
    if raw.is_empty() {
        return Ok(unbounded);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|bound| bound.is_finite())
        .ok_or_else(|| StandardsError::InvalidBound {
            path: sheet.path.clone(),
            line,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_missing_tables() {
        let repository = RuleRepository::builder()
            .labels(RuleTable::Region, ["WLD"])
            .unwrap()
            .build();
        assert!(repository.is_valid(RuleTable::Region, "WLD"));
        assert!(repository.table(RuleTable::Item).is_empty());
        assert_eq!(repository.match_fuzzy(RuleTable::Item, "WHEAT"), None);
    }

    #[test]
    fn fix_lookups_are_case_insensitive() {
        let repository = RuleRepository::builder()
            .region_fix("World", "WLD")
            .value_fix("NA", "0")
            .build();
        assert_eq!(repository.fix_region("WORLD"), Some("WLD"));
        assert_eq!(repository.fix_value("na"), Some("0"));
        assert_eq!(repository.fix_value("151"), None);
    }
}
