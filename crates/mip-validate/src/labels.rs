//! Label reconciliation for distinct accepted-row values.

use std::collections::{BTreeMap, BTreeSet};

use mip_model::{BadLabel, ColumnRole, RuleTable, UnknownLabel};
use mip_standards::RuleRepository;
use tracing::debug;

use crate::error::{DiagnosisError, Result};

/// Distinct values seen per role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistinctValues {
    by_role: BTreeMap<ColumnRole, BTreeSet<String>>,
}

impl DistinctValues {
    pub fn insert(&mut self, role: ColumnRole, value: &str) {
        let values = self.by_role.entry(role).or_default();
        if !values.contains(value) {
            values.insert(value.to_string());
        }
    }

    /// Values for `role` in sorted order.
    pub fn get(&self, role: ColumnRole) -> impl Iterator<Item = &str> {
        self.by_role
            .get(&role)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }
}

/// How one distinct label was judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Bad(BadLabel),
    Unknown(UnknownLabel),
    /// A year absent from the year table.
    UnknownYear,
}

/// Sorted, deduplicated label reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelReport {
    pub bad_labels: BTreeSet<BadLabel>,
    pub unknown_labels: BTreeSet<UnknownLabel>,
    pub unknown_years: BTreeSet<String>,
}

/// Classifies labels against a rule repository.
#[derive(Debug, Clone, Copy)]
pub struct FieldDiagnoser<'a> {
    rules: &'a RuleRepository,
}

impl<'a> FieldDiagnoser<'a> {
    pub fn new(rules: &'a RuleRepository) -> Self {
        Self { rules }
    }

    /// Judge a single label. The first matching rule wins:
    /// exact match, case-only mismatch, region fix, then unknown.
    pub fn judge(&self, role: ColumnRole, label: &str) -> Result<Verdict> {
        let Some(table) = role.rule_table() else {
            return Ok(Verdict::Correct);
        };
        let matched = self.rules.match_exact(table, label);
        if table == RuleTable::Year {
            return Ok(match matched {
                Some(_) => Verdict::Correct,
                None => Verdict::UnknownYear,
            });
        }
        if let Some(canonical) = matched {
            return Ok(if canonical == label {
                Verdict::Correct
            } else {
                Verdict::Bad(BadLabel::new(role, label, canonical))
            });
        }
        if role == ColumnRole::Region
            && let Some(fix) = self.rules.fix_region(label)
        {
            return Ok(Verdict::Bad(BadLabel::new(role, label, fix)));
        }
        let closest = self
            .rules
            .match_fuzzy(table, label)
            .ok_or(DiagnosisError::EmptyRuleTable(table))?;
        Ok(Verdict::Unknown(UnknownLabel::new(role, label, closest)))
    }

    /// Judge every distinct value of every label role and the year role.
    pub fn diagnose(&self, values: &DistinctValues) -> Result<LabelReport> {
        let mut report = LabelReport::default();
        for role in ColumnRole::REQUIRED {
            for label in values.get(role) {
                match self.judge(role, label)? {
                    Verdict::Correct => {}
                    Verdict::Bad(bad) => {
                        report.bad_labels.insert(bad);
                    }
                    Verdict::Unknown(unknown) => {
                        report.unknown_labels.insert(unknown);
                    }
                    Verdict::UnknownYear => {
                        report.unknown_years.insert(label.to_string());
                    }
                }
            }
        }
        debug!(
            bad = report.bad_labels.len(),
            unknown = report.unknown_labels.len(),
            unknown_years = report.unknown_years.len(),
            "diagnosed labels"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RuleRepository {
        RuleRepository::builder()
            .labels(RuleTable::Region, ["WLD", "EUR"])
            .unwrap()
            .labels(RuleTable::Item, ["WHEAT", "RICE"])
            .unwrap()
            .labels(RuleTable::Year, ["2030"])
            .unwrap()
            .region_fix("World", "WLD")
            .build()
    }

    #[test]
    fn judges_in_rule_order() {
        let rules = rules();
        let diagnoser = FieldDiagnoser::new(&rules);
        assert_eq!(diagnoser.judge(ColumnRole::Item, "WHEAT").unwrap(), Verdict::Correct);
        assert_eq!(
            diagnoser.judge(ColumnRole::Item, "wheat").unwrap(),
            Verdict::Bad(BadLabel::new(ColumnRole::Item, "wheat", "WHEAT"))
        );
        assert_eq!(
            diagnoser.judge(ColumnRole::Region, "world").unwrap(),
            Verdict::Bad(BadLabel::new(ColumnRole::Region, "world", "WLD"))
        );
        assert_eq!(
            diagnoser.judge(ColumnRole::Item, "WHEATS").unwrap(),
            Verdict::Unknown(UnknownLabel::new(ColumnRole::Item, "WHEATS", "WHEAT"))
        );
        assert_eq!(diagnoser.judge(ColumnRole::Year, "2050").unwrap(), Verdict::UnknownYear);
    }

    #[test]
    fn region_fix_only_applies_to_regions() {
        let rules = rules();
        let diagnoser = FieldDiagnoser::new(&rules);
        assert!(matches!(
            diagnoser.judge(ColumnRole::Item, "World").unwrap(),
            Verdict::Unknown(_)
        ));
    }

    #[test]
    fn empty_table_is_an_error() {
        let rules = rules();
        let diagnoser = FieldDiagnoser::new(&rules);
        let err = diagnoser.judge(ColumnRole::Unit, "kg").unwrap_err();
        assert!(matches!(err, DiagnosisError::EmptyRuleTable(RuleTable::Unit)));
    }

    #[test]
    fn report_is_sorted_and_deduplicated() {
        let rules = rules();
        let mut values = DistinctValues::default();
        for (role, label) in [
            (ColumnRole::Region, "wld"),
            (ColumnRole::Region, "wld"),
            (ColumnRole::Region, "EUR"),
            (ColumnRole::Item, "rice"),
            (ColumnRole::Year, "2030"),
            (ColumnRole::Year, "2100"),
        ] {
            values.insert(role, label);
        }
        let report = FieldDiagnoser::new(&rules).diagnose(&values).unwrap();
        let bad: Vec<_> = report.bad_labels.into_iter().collect();
        assert_eq!(
            bad,
            vec![
                BadLabel::new(ColumnRole::Region, "wld", "WLD"),
                BadLabel::new(ColumnRole::Item, "rice", "RICE"),
            ]
        );
        assert!(report.unknown_labels.is_empty());
        assert_eq!(report.unknown_years.into_iter().collect::<Vec<_>>(), vec!["2100"]);
    }
}
