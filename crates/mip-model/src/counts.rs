use std::fmt;

use serde::{Deserialize, Serialize};

/// Row-level classification, decided in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowClass {
    StructuralIssue,
    IgnoredScenario,
    Duplicate,
    Accepted,
}

impl RowClass {
    pub const ALL: [RowClass; 4] = [
        RowClass::StructuralIssue,
        RowClass::IgnoredScenario,
        RowClass::Duplicate,
        RowClass::Accepted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RowClass::StructuralIssue => "structural issue",
            RowClass::IgnoredScenario => "ignored scenario",
            RowClass::Duplicate => "duplicate",
            RowClass::Accepted => "accepted",
        }
    }
}

impl fmt::Display for RowClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of rows per classification for one diagnosis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    pub structural_issues: usize,
    pub ignored_scenarios: usize,
    pub duplicates: usize,
    pub accepted: usize,
}

impl RowCounts {
    pub fn record(&mut self, class: RowClass) {
        *self.slot_mut(class) += 1;
    }

    pub fn get(&self, class: RowClass) -> usize {
        match class {
            RowClass::StructuralIssue => self.structural_issues,
            RowClass::IgnoredScenario => self.ignored_scenarios,
            RowClass::Duplicate => self.duplicates,
            RowClass::Accepted => self.accepted,
        }
    }

    /// Total classified rows (skipped and header lines excluded).
    pub fn total(&self) -> usize {
        RowClass::ALL.into_iter().map(|class| self.get(class)).sum()
    }

    fn slot_mut(&mut self, class: RowClass) -> &mut usize {
        match class {
            RowClass::StructuralIssue => &mut self.structural_issues,
            RowClass::IgnoredScenario => &mut self.ignored_scenarios,
            RowClass::Duplicate => &mut self.duplicates,
            RowClass::Accepted => &mut self.accepted,
        }
    }
}
