use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::counts::RowCounts;
use crate::error::Result;
use crate::label::{BadLabel, UnknownLabel};
use crate::role::ColumnRole;

/// Outcome of one full diagnosis pass over an uploaded file.
///
/// Immutable after the pass except for the reviewer-owned `fix` and
/// `overridden` fields on [`UnknownLabel`] entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub counts: RowCounts,
    pub bad_labels: Vec<BadLabel>,
    pub unknown_labels: Vec<UnknownLabel>,
    /// Valid years not yet present in the reference year table.
    pub unknown_years: BTreeSet<String>,
}

impl DiagnosisResult {
    pub fn unknown_label(&self, role: ColumnRole, label: &str) -> Option<&UnknownLabel> {
        self.unknown_labels
            .iter()
            .find(|entry| entry.role == role && entry.label == label)
    }

    pub fn unknown_label_mut(&mut self, role: ColumnRole, label: &str) -> Option<&mut UnknownLabel> {
        self.unknown_labels
            .iter_mut()
            .find(|entry| entry.role == role && entry.label == label)
    }

    /// Unknown labels still waiting for a fix or an override.
    pub fn unresolved(&self) -> impl Iterator<Item = &UnknownLabel> {
        self.unknown_labels.iter().filter(|entry| !entry.is_resolved())
    }

    /// Submissions carrying overridden labels need manual review downstream.
    pub fn has_overrides(&self) -> bool {
        self.unknown_labels.iter().any(|entry| entry.overridden)
    }

    /// Check every reviewer edit for the fix/override exclusivity rule.
    pub fn validate_resolutions(&self) -> Result<()> {
        self.unknown_labels.iter().try_for_each(UnknownLabel::validate)
    }
}
