//! Label defect reports produced by field diagnosis.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::role::ColumnRole;

/// A label with a confident automatic repair.
///
/// Compared by value, so the same defect seen in many rows collapses to a
/// single entry when collected into a set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BadLabel {
    pub role: ColumnRole,
    pub label: String,
    pub fix: String,
}

impl BadLabel {
    pub fn new(role: ColumnRole, label: impl Into<String>, fix: impl Into<String>) -> Self {
        Self {
            role,
            label: label.into(),
            fix: fix.into(),
        }
    }
}

/// How a reviewer disposed of an unknown label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Neither fixed nor overridden; rows carrying the label are dropped.
    Pending,
    /// Replace the label with the given canonical text.
    Fixed(&'a str),
    /// Keep the label as-is.
    Overridden,
}

/// A label with no confident automatic repair.
///
/// `fix` and `overridden` are filled in by a reviewer. Setting both is a
/// contract violation and is rejected by [`UnknownLabel::validate`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnknownLabel {
    pub role: ColumnRole,
    pub label: String,
    pub closest_match: String,
    #[serde(default)]
    pub fix: String,
    #[serde(default, rename = "override")]
    pub overridden: bool,
}

impl UnknownLabel {
    pub fn new(
        role: ColumnRole,
        label: impl Into<String>,
        closest_match: impl Into<String>,
    ) -> Self {
        Self {
            role,
            label: label.into(),
            closest_match: closest_match.into(),
            fix: String::new(),
            overridden: false,
        }
    }

    /// Record a fix. Fails if the label is already overridden.
    pub fn set_fix(&mut self, fix: impl Into<String>) -> Result<()> {
        let fix = fix.into();
        if self.overridden && !fix.is_empty() {
            return Err(self.conflict());
        }
        self.fix = fix;
        Ok(())
    }

    /// Accept the closest match as the fix.
    pub fn accept_closest_match(&mut self) -> Result<()> {
        let closest = self.closest_match.clone();
        self.set_fix(closest)
    }

    /// Mark the label as overridden. Fails if a fix is already set.
    pub fn set_override(&mut self, overridden: bool) -> Result<()> {
        if overridden && !self.fix.is_empty() {
            return Err(self.conflict());
        }
        self.overridden = overridden;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.overridden && !self.fix.is_empty() {
            return Err(self.conflict());
        }
        Ok(())
    }

    pub fn resolution(&self) -> Result<Resolution<'_>> {
        self.validate()?;
        Ok(if self.overridden {
            Resolution::Overridden
        } else if self.fix.is_empty() {
            Resolution::Pending
        } else {
            Resolution::Fixed(&self.fix)
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.overridden || !self.fix.is_empty()
    }

    fn conflict(&self) -> ModelError {
        ModelError::ConflictingResolution {
            role: self.role,
            label: self.label.clone(),
        }
    }
}
