//! In-memory reference tables.
//!
//! Every table is built once and never mutated afterwards, so a loaded
//! [`crate::RuleRepository`] can be shared freely between diagnoses.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use mip_model::RuleTable;

use crate::error::{Result, StandardsError};
use crate::fuzzy;

fn fold(label: &str) -> String {
    label.to_lowercase()
}

/// Canonical labels for one role.
#[derive(Debug, Clone)]
pub struct LabelTable {
    table: RuleTable,
    entries: BTreeSet<String>,
    /// Lower-cased label -> canonical label.
    folded: HashMap<String, String>,
}

impl LabelTable {
    /// Build a table, rejecting labels that collide case-insensitively.
    pub fn new<I, S>(table: RuleTable, labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries = BTreeSet::new();
        let mut folded: HashMap<String, String> = HashMap::new();
        for label in labels {
            let label = label.into();
            if label.is_empty() || entries.contains(&label) {
                continue;
            }
            let key = fold(&label);
            if let Some(existing) = folded.get(&key) {
                return Err(StandardsError::AmbiguousLabel {
                    table,
                    first: existing.clone(),
                    second: label,
                });
            }
            folded.insert(key, label.clone());
            entries.insert(label);
        }
        Ok(Self {
            table,
            entries,
            folded,
        })
    }

    pub fn empty(table: RuleTable) -> Self {
        Self {
            table,
            entries: BTreeSet::new(),
            folded: HashMap::new(),
        }
    }

    pub fn table(&self) -> RuleTable {
        self.table
    }

    /// Exact, case-sensitive membership.
    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains(label)
    }

    /// Case-insensitive match returning the stored canonical casing.
    pub fn match_exact(&self, label: &str) -> Option<&str> {
        self.folded.get(&fold(label)).map(String::as_str)
    }

    /// Closest canonical label by string similarity; linear in table size.
    pub fn match_fuzzy(&self, label: &str) -> Option<&str> {
        fuzzy::closest(label, self.entries.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

/// Known-bad spellings mapped to their replacement, keyed case-insensitively.
///
/// Replacements are kept as text so numeric fixes keep their exact form.
#[derive(Debug, Clone, Default)]
pub struct FixTable {
    fixes: HashMap<String, String>,
}

impl FixTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later entries for the same folded key replace earlier ones.
    pub fn insert(&mut self, raw: &str, fix: impl Into<String>) {
        self.fixes.insert(fold(raw), fix.into());
    }

    pub fn get(&self, raw: &str) -> Option<&str> {
        self.fixes.get(&fold(raw)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }
}

/// Inclusive numeric bounds for a (variable, unit) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const UNBOUNDED: ValueRange = ValueRange {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn is_unbounded(&self) -> bool {
        *self == Self::UNBOUNDED
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// (variable, unit) -> allowed value range.
#[derive(Debug, Clone, Default)]
pub struct RangeTable {
    ranges: HashMap<(String, String), ValueRange>,
}

impl RangeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variable: impl Into<String>, unit: impl Into<String>, range: ValueRange) {
        self.ranges.insert((variable.into(), unit.into()), range);
    }

    /// Range for the pair, unbounded when the pair is not listed.
    pub fn get(&self, variable: &str, unit: &str) -> ValueRange {
        self.ranges
            .get(&(variable.to_string(), unit.to_string()))
            .copied()
            .unwrap_or(ValueRange::UNBOUNDED)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_is_case_insensitive() {
        let table = LabelTable::new(RuleTable::Item, ["WHEAT", "RICE"]).unwrap();
        assert!(table.contains("WHEAT"));
        assert!(!table.contains("wheat"));
        assert_eq!(table.match_exact("wheat"), Some("WHEAT"));
        assert_eq!(table.match_exact("barley"), None);
    }

    #[test]
    fn case_collisions_are_rejected() {
        let err = LabelTable::new(RuleTable::Unit, ["kg", "KG"]).unwrap_err();
        assert!(matches!(err, StandardsError::AmbiguousLabel { .. }));
    }

    #[test]
    fn repeated_labels_are_tolerated() {
        let table = LabelTable::new(RuleTable::Unit, ["kg", "kg", ""]).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn fuzzy_match_on_empty_table_is_none() {
        assert_eq!(LabelTable::empty(RuleTable::Year).match_fuzzy("2030"), None);
    }

    #[test]
    fn fix_table_keeps_text_form() {
        let mut fixes = FixTable::new();
        fixes.insert("NA", "0");
        assert_eq!(fixes.get("na"), Some("0"));
        assert_eq!(fixes.get("n/a"), None);
    }

    #[test]
    fn missing_range_is_unbounded() {
        let mut ranges = RangeTable::new();
        ranges.insert("PROD", "1000 t", ValueRange::new(0.0, 1e6));
        assert!(ranges.get("PROD", "1000 t").contains(10.0));
        assert!(!ranges.get("PROD", "1000 t").contains(-1.0));
        assert!(ranges.get("PROD", "t").is_unbounded());
    }
}
