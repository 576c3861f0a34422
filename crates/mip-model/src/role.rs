//! Semantic column roles and the reference tables that back them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// One of the seven semantic kinds a raw column can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Scenario,
    Region,
    Variable,
    Item,
    Unit,
    Year,
    Value,
}

impl ColumnRole {
    /// All roles in canonical output order.
    pub const ALL: [ColumnRole; 7] = [
        ColumnRole::Scenario,
        ColumnRole::Region,
        ColumnRole::Variable,
        ColumnRole::Item,
        ColumnRole::Unit,
        ColumnRole::Year,
        ColumnRole::Value,
    ];

    /// Roles whose fields must be non-empty in every row.
    pub const REQUIRED: [ColumnRole; 6] = [
        ColumnRole::Scenario,
        ColumnRole::Region,
        ColumnRole::Variable,
        ColumnRole::Item,
        ColumnRole::Unit,
        ColumnRole::Year,
    ];

    /// Roles whose values are reconciled against a label table.
    pub const LABELS: [ColumnRole; 5] = [
        ColumnRole::Scenario,
        ColumnRole::Region,
        ColumnRole::Variable,
        ColumnRole::Item,
        ColumnRole::Unit,
    ];

    /// Display name, also the literal header text recognized during inference.
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnRole::Scenario => "Scenario",
            ColumnRole::Region => "Region",
            ColumnRole::Variable => "Variable",
            ColumnRole::Item => "Item",
            ColumnRole::Unit => "Unit",
            ColumnRole::Year => "Year",
            ColumnRole::Value => "Value",
        }
    }

    /// The reference table holding valid labels for this role, if any.
    pub fn rule_table(self) -> Option<RuleTable> {
        match self {
            ColumnRole::Scenario => Some(RuleTable::Scenario),
            ColumnRole::Region => Some(RuleTable::Region),
            ColumnRole::Variable => Some(RuleTable::Variable),
            ColumnRole::Item => Some(RuleTable::Item),
            ColumnRole::Unit => Some(RuleTable::Unit),
            ColumnRole::Year => Some(RuleTable::Year),
            ColumnRole::Value => None,
        }
    }

    /// True when `text` is this role's literal header name (case-insensitive).
    pub fn is_header_name(self, text: &str) -> bool {
        text.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnRole {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnRole::ALL
            .into_iter()
            .find(|role| role.is_header_name(s))
            .ok_or_else(|| ModelError::UnknownRole(s.to_string()))
    }
}

/// Reference label tables, one per labelled role plus the model table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleTable {
    Model,
    Scenario,
    Region,
    Variable,
    Item,
    Unit,
    Year,
}

impl RuleTable {
    pub const ALL: [RuleTable; 7] = [
        RuleTable::Model,
        RuleTable::Scenario,
        RuleTable::Region,
        RuleTable::Variable,
        RuleTable::Item,
        RuleTable::Unit,
        RuleTable::Year,
    ];

    /// Sheet name in the reference workbook (and file stem in a rule-set directory).
    pub fn sheet_name(self) -> &'static str {
        match self {
            RuleTable::Model => "ModelTable",
            RuleTable::Scenario => "ScenarioTable",
            RuleTable::Region => "RegionTable",
            RuleTable::Variable => "VariableTable",
            RuleTable::Item => "ItemTable",
            RuleTable::Unit => "UnitTable",
            RuleTable::Year => "YearTable",
        }
    }

    /// Header of the label column inside the sheet.
    pub fn column_name(self) -> &'static str {
        match self {
            RuleTable::Model => "Model",
            RuleTable::Scenario => "Scenario",
            RuleTable::Region => "Region",
            RuleTable::Variable => "Variable",
            RuleTable::Item => "Item",
            RuleTable::Unit => "Unit",
            RuleTable::Year => "Year",
        }
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}
