//! The input-format descriptor produced by inference and consumed by validation.
//!
//! Column indices are 1-based; `0` means the role has not been assigned yet.
//! Changing the delimiter or the skip count makes every assignment stale, so
//! the setters for those two fields clear the assignment table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::role::ColumnRole;

/// 1-based column index per role (`0` = unassigned).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAssignment {
    pub scenario: usize,
    pub region: usize,
    pub variable: usize,
    pub item: usize,
    pub unit: usize,
    pub year: usize,
    pub value: usize,
}

impl ColumnAssignment {
    fn slot(&self, role: ColumnRole) -> usize {
        match role {
            ColumnRole::Scenario => self.scenario,
            ColumnRole::Region => self.region,
            ColumnRole::Variable => self.variable,
            ColumnRole::Item => self.item,
            ColumnRole::Unit => self.unit,
            ColumnRole::Year => self.year,
            ColumnRole::Value => self.value,
        }
    }

    fn slot_mut(&mut self, role: ColumnRole) -> &mut usize {
        match role {
            ColumnRole::Scenario => &mut self.scenario,
            ColumnRole::Region => &mut self.region,
            ColumnRole::Variable => &mut self.variable,
            ColumnRole::Item => &mut self.item,
            ColumnRole::Unit => &mut self.unit,
            ColumnRole::Year => &mut self.year,
            ColumnRole::Value => &mut self.value,
        }
    }

    /// 1-based column index for `role`, or `None` when unassigned.
    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        match self.slot(role) {
            0 => None,
            index => Some(index),
        }
    }

    /// Assign `role` to a 1-based column. Passing `0` unassigns it.
    pub fn set(&mut self, role: ColumnRole, index: usize) {
        *self.slot_mut(role) = index;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Role assigned to a 1-based column, if any.
    pub fn role_at(&self, index: usize) -> Option<ColumnRole> {
        if index == 0 {
            return None;
        }
        ColumnRole::ALL
            .into_iter()
            .find(|role| self.slot(*role) == index)
    }

    pub fn missing(&self) -> Vec<ColumnRole> {
        ColumnRole::ALL
            .into_iter()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.missing().len() == ColumnRole::ALL.len()
    }

    /// Assigned `(role, index)` pairs in canonical role order.
    pub fn assigned(&self) -> impl Iterator<Item = (ColumnRole, usize)> + '_ {
        ColumnRole::ALL
            .into_iter()
            .filter_map(|role| self.get(role).map(|index| (role, index)))
    }
}

/// A `ROLE=INDEX` pair as written on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnOverride {
    pub role: ColumnRole,
    pub index: usize,
}

impl FromStr for ColumnOverride {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (role, index) = s
            .split_once('=')
            .ok_or_else(|| ModelError::InvalidAssignment(s.to_string()))?;
        let role = role.parse::<ColumnRole>()?;
        let index = index
            .trim()
            .parse::<usize>()
            .map_err(|_| ModelError::InvalidAssignment(s.to_string()))?;
        Ok(Self { role, index })
    }
}

/// Structure of one uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFormat {
    delimiter: String,
    header_included: bool,
    initial_lines_to_skip: usize,
    columns: ColumnAssignment,
    model_name: String,
}

impl InputFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field delimiter; an empty string means lines are not split.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Change the delimiter. Returns true when the value changed, in which
    /// case all column assignments were reset.
    pub fn set_delimiter(&mut self, delimiter: impl Into<String>) -> bool {
        let delimiter = delimiter.into();
        if delimiter == self.delimiter {
            return false;
        }
        self.delimiter = delimiter;
        self.columns.clear();
        true
    }

    pub fn header_included(&self) -> bool {
        self.header_included
    }

    pub fn set_header_included(&mut self, included: bool) {
        self.header_included = included;
    }

    pub fn initial_lines_to_skip(&self) -> usize {
        self.initial_lines_to_skip
    }

    /// Change the skip count. Returns true when the value changed, in which
    /// case all column assignments were reset.
    pub fn set_initial_lines_to_skip(&mut self, lines: usize) -> bool {
        if lines == self.initial_lines_to_skip {
            return false;
        }
        self.initial_lines_to_skip = lines;
        self.columns.clear();
        true
    }

    /// Number of leading lines (skipped lines plus header) that are never classified.
    pub fn data_start(&self) -> usize {
        self.initial_lines_to_skip + usize::from(self.header_included)
    }

    pub fn columns(&self) -> &ColumnAssignment {
        &self.columns
    }

    pub fn column(&self, role: ColumnRole) -> Option<usize> {
        self.columns.get(role)
    }

    pub fn assign_column(&mut self, role: ColumnRole, index: usize) {
        self.columns.set(role, index);
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn set_model_name(&mut self, name: impl Into<String>) {
        self.model_name = name.into();
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "delimiter={:?} header={} skip={} model={:?}",
            self.delimiter, self.header_included, self.initial_lines_to_skip, self.model_name
        )?;
        for (role, index) in self.columns.assigned() {
            write!(f, " {}={}", role.as_str().to_lowercase(), index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assigned_format() -> InputFormat {
        let mut format = InputFormat::new();
        format.set_delimiter(",");
        for (offset, role) in ColumnRole::ALL.into_iter().enumerate() {
            format.assign_column(role, offset + 1);
        }
        format
    }

    #[test]
    fn changing_delimiter_resets_columns() {
        let mut format = assigned_format();
        assert!(format.columns().is_complete());
        assert!(format.set_delimiter(";"));
        assert!(format.columns().is_empty());
    }

    #[test]
    fn setting_same_delimiter_keeps_columns() {
        let mut format = assigned_format();
        assert!(!format.set_delimiter(","));
        assert!(format.columns().is_complete());
    }

    #[test]
    fn changing_skip_resets_columns() {
        let mut format = assigned_format();
        assert!(format.set_initial_lines_to_skip(3));
        assert!(format.columns().is_empty());
        assert_eq!(format.data_start(), 3);
        format.set_header_included(true);
        assert_eq!(format.data_start(), 4);
    }

    #[test]
    fn header_flag_does_not_reset_columns() {
        let mut format = assigned_format();
        format.set_header_included(true);
        assert!(format.columns().is_complete());
    }

    #[test]
    fn role_lookup_by_index() {
        let format = assigned_format();
        assert_eq!(format.columns().role_at(3), Some(ColumnRole::Variable));
        assert_eq!(format.columns().role_at(0), None);
        assert_eq!(format.columns().role_at(9), None);
    }

    #[test]
    fn parses_column_override() {
        let parsed: ColumnOverride = "unit=6".parse().unwrap();
        assert_eq!(parsed.role, ColumnRole::Unit);
        assert_eq!(parsed.index, 6);
        assert!("unit".parse::<ColumnOverride>().is_err());
        assert!("unit=x".parse::<ColumnOverride>().is_err());
    }

    #[test]
    fn unassigned_serializes_as_zero() {
        let format = InputFormat::new();
        let json = serde_json::to_value(&format).unwrap();
        assert_eq!(json["columns"]["scenario"], 0);
    }
}
