//! Per-role fix maps and drop sets derived from a diagnosis.

use std::collections::{HashMap, HashSet};

use mip_model::{ColumnRole, DiagnosisResult, OutputRow, Resolution};

use crate::error::{OutputError, Result};

/// Label dispositions keyed by `(role, raw label)`.
#[derive(Debug, Clone, Default)]
pub struct Resolutions {
    fixes: HashMap<(ColumnRole, String), String>,
    drops: HashSet<(ColumnRole, String)>,
    overrides: HashSet<(ColumnRole, String)>,
}

impl Resolutions {
    /// Collect fixes from bad labels and fixed unknown labels, and drops from
    /// pending unknown labels. Fails on any fixed-and-overridden entry.
    pub fn from_diagnosis(diagnosis: &DiagnosisResult) -> Result<Self> {
        let mut resolutions = Self::unknown_only(diagnosis)?;
        for bad in &diagnosis.bad_labels {
            resolutions
                .fixes
                .entry((bad.role, bad.label.clone()))
                .or_insert_with(|| bad.fix.clone());
        }
        Ok(resolutions)
    }

    /// Same as [`Resolutions::from_diagnosis`] but ignoring bad labels.
    pub fn unknown_only(diagnosis: &DiagnosisResult) -> Result<Self> {
        let mut resolutions = Self::default();
        for unknown in &diagnosis.unknown_labels {
            let key = (unknown.role, unknown.label.clone());
            let resolution = unknown
                .resolution()
                .map_err(|_| OutputError::ConflictingResolution {
                    role: unknown.role,
                    label: unknown.label.clone(),
                })?;
            match resolution {
                Resolution::Pending => {
                    resolutions.drops.insert(key);
                }
                Resolution::Fixed(fix) => {
                    resolutions.fixes.insert(key, fix.to_string());
                }
                Resolution::Overridden => {
                    resolutions.overrides.insert(key);
                }
            }
        }
        Ok(resolutions)
    }

    /// True when any field of `row` carries a pending unknown label.
    pub fn drops(&self, row: &OutputRow) -> bool {
        ColumnRole::ALL
            .into_iter()
            .any(|role| self.drops.contains(&(role, row.get(role).to_string())))
    }

    /// Replace every fixable field in place.
    pub fn apply(&self, row: &mut OutputRow) {
        for role in ColumnRole::ALL {
            let field = row.get_mut(role);
            if let Some(fix) = self.fixes.get(&(role, field.clone())) {
                field.clone_from(fix);
            }
        }
    }

    pub fn is_overridden(&self, role: ColumnRole, label: &str) -> bool {
        self.overrides.contains(&(role, label.to_string()))
    }
}
