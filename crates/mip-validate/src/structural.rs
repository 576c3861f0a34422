//! Per-row structural classification.
//!
//! Rows are classified in a fixed priority order and stop at the first class
//! that applies:
//!
//! 1. structural issue (field count, empty fields, year, value)
//! 2. ignored scenario
//! 3. duplicate of an earlier raw line
//! 4. accepted

use std::collections::{BTreeSet, HashMap, HashSet};

use mip_ingest::{parse_value, parse_year, split_line, strip_quotes};
use mip_model::{BadLabel, ColumnRole, InputFormat, RowClass, RuleTable};
use mip_standards::RuleRepository;

use crate::error::{DiagnosisError, Result};
use crate::labels::DistinctValues;

/// Outcome for one data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    StructuralIssue(String),
    IgnoredScenario(String),
    /// Running occurrence count of the raw line (2 for the first repeat).
    Duplicate(usize),
    Accepted,
}

impl RowOutcome {
    pub fn class(&self) -> RowClass {
        match self {
            RowOutcome::StructuralIssue(_) => RowClass::StructuralIssue,
            RowOutcome::IgnoredScenario(_) => RowClass::IgnoredScenario,
            RowOutcome::Duplicate(_) => RowClass::Duplicate,
            RowOutcome::Accepted => RowClass::Accepted,
        }
    }

    /// Annotation written after the raw line; accepted rows carry none.
    pub fn note(&self) -> Option<String> {
        match self {
            RowOutcome::StructuralIssue(reason) => Some(reason.clone()),
            RowOutcome::IgnoredScenario(scenario) => Some(format!("ignored scenario {scenario}")),
            RowOutcome::Duplicate(occurrence) => Some(format!("occurrence {occurrence}")),
            RowOutcome::Accepted => None,
        }
    }
}

/// Stateful classifier for one pass over one file.
#[derive(Debug)]
pub struct StructuralValidator<'a> {
    format: &'a InputFormat,
    rules: &'a RuleRepository,
    width: usize,
    ignored: HashSet<String>,
    seen: HashMap<String, usize>,
    values: DistinctValues,
    value_fixes: BTreeSet<BadLabel>,
}

impl<'a> StructuralValidator<'a> {
    /// Build a validator for rows of `width` fields.
    ///
    /// Fails when a role is unassigned or points past `width`.
    pub fn new<S: AsRef<str>>(
        format: &'a InputFormat,
        rules: &'a RuleRepository,
        width: usize,
        ignore_scenarios: &[S],
    ) -> Result<Self> {
        check_format(format)?;
        for (role, index) in format.columns().assigned() {
            if index > width {
                return Err(DiagnosisError::ColumnOutOfRange { role, index, width });
            }
        }
        Ok(Self {
            format,
            rules,
            width,
            ignored: ignore_scenarios
                .iter()
                .map(|scenario| strip_quotes(scenario.as_ref()).to_string())
                .collect(),
            seen: HashMap::new(),
            values: DistinctValues::default(),
            value_fixes: BTreeSet::new(),
        })
    }

    pub fn classify(&mut self, line: &str) -> RowOutcome {
        let fields = split_line(line, self.format.delimiter());
        if fields.len() != self.width {
            return RowOutcome::StructuralIssue(format!(
                "expected {} fields, found {}",
                self.width,
                fields.len()
            ));
        }
        let field = |role: ColumnRole| {
            // Columns were range-checked in `new`.
            let index = self.format.column(role).unwrap_or(0);
            fields.get(index.wrapping_sub(1)).map_or("", |raw| strip_quotes(raw))
        };

        for role in ColumnRole::REQUIRED {
            if field(role).is_empty() {
                return RowOutcome::StructuralIssue(format!("empty {} field", role.as_str()));
            }
        }
        let year = field(ColumnRole::Year);
        if parse_year(year).is_none() {
            return RowOutcome::StructuralIssue(format!("year {year:?} is not an integer"));
        }

        let raw_value = field(ColumnRole::Value);
        let fixed_value = self.rules.fix_value(raw_value).filter(|fix| *fix != raw_value);
        let effective = fixed_value.unwrap_or(raw_value);
        let Some(value) = parse_value(effective) else {
            return RowOutcome::StructuralIssue(format!("value {raw_value:?} is not numeric"));
        };
        let variable = field(ColumnRole::Variable);
        let unit = field(ColumnRole::Unit);
        let variable = self
            .rules
            .match_exact(RuleTable::Variable, variable)
            .unwrap_or(variable);
        let unit = self.rules.match_exact(RuleTable::Unit, unit).unwrap_or(unit);
        let range = self.rules.value_range(variable, unit);
        if !range.contains(value) {
            return RowOutcome::StructuralIssue(format!(
                "value {effective} outside {range} for ({variable}, {unit})"
            ));
        }

        let scenario = field(ColumnRole::Scenario);
        if self.ignored.contains(scenario) {
            return RowOutcome::IgnoredScenario(scenario.to_string());
        }

        let occurrence = self.seen.entry(line.to_string()).or_insert(0);
        *occurrence += 1;
        if *occurrence > 1 {
            return RowOutcome::Duplicate(*occurrence);
        }

        for role in ColumnRole::REQUIRED {
            self.values.insert(role, field(role));
        }
        if let Some(fix) = fixed_value {
            self.value_fixes
                .insert(BadLabel::new(ColumnRole::Value, raw_value, fix));
        }
        RowOutcome::Accepted
    }

    /// Distinct quote-stripped values of accepted rows, plus value fixes applied.
    pub fn finish(self) -> (DistinctValues, BTreeSet<BadLabel>) {
        (self.values, self.value_fixes)
    }
}

pub(crate) fn check_format(format: &InputFormat) -> Result<()> {
    let missing = format.columns().missing();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DiagnosisError::IncompleteFormat { missing })
    }
}
