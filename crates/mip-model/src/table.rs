//! Canonical output rows and the distinct-value lists derived from them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::role::ColumnRole;

/// Column order of the final table.
pub const CANONICAL_COLUMNS: [&str; 8] = [
    "Model", "Scenario", "Region", "Variable", "Item", "Unit", "Year", "Value",
];

/// One row of the final table. Year and value stay textual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub model: String,
    pub scenario: String,
    pub region: String,
    pub variable: String,
    pub item: String,
    pub unit: String,
    pub year: String,
    pub value: String,
}

impl OutputRow {
    /// Build a row from exactly eight fields in canonical order.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Option<Self> {
        let [model, scenario, region, variable, item, unit, year, value] = fields else {
            return None;
        };
        Some(Self {
            model: model.as_ref().to_string(),
            scenario: scenario.as_ref().to_string(),
            region: region.as_ref().to_string(),
            variable: variable.as_ref().to_string(),
            item: item.as_ref().to_string(),
            unit: unit.as_ref().to_string(),
            year: year.as_ref().to_string(),
            value: value.as_ref().to_string(),
        })
    }

    pub fn fields(&self) -> [&str; 8] {
        [
            &self.model,
            &self.scenario,
            &self.region,
            &self.variable,
            &self.item,
            &self.unit,
            &self.year,
            &self.value,
        ]
    }

    pub fn get(&self, role: ColumnRole) -> &str {
        match role {
            ColumnRole::Scenario => &self.scenario,
            ColumnRole::Region => &self.region,
            ColumnRole::Variable => &self.variable,
            ColumnRole::Item => &self.item,
            ColumnRole::Unit => &self.unit,
            ColumnRole::Year => &self.year,
            ColumnRole::Value => &self.value,
        }
    }

    pub fn get_mut(&mut self, role: ColumnRole) -> &mut String {
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
}

/// Sorted distinct values per column, used to populate selection widgets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionLists {
    pub models: Vec<String>,
    pub scenarios: Vec<String>,
    pub regions: Vec<String>,
    pub variables: Vec<String>,
    pub items: Vec<String>,
    pub units: Vec<String>,
    pub years: Vec<String>,
}

impl SelectionLists {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a OutputRow>) -> Self {
        let mut sets: [BTreeSet<&str>; 7] = Default::default();
        for row in rows {
            let fields = row.fields();
            for (set, value) in sets.iter_mut().zip(fields) {
                set.insert(value);
            }
        }
        let [models, scenarios, regions, variables, items, units, years] =
            sets.map(|set| set.into_iter().map(str::to_string).collect::<Vec<_>>());
        Self {
            models,
            scenarios,
            regions,
            variables,
            items,
            units,
            years,
        }
    }

    pub fn for_role(&self, role: ColumnRole) -> &[String] {
        match role {
            ColumnRole::Scenario => &self.scenarios,
            ColumnRole::Region => &self.regions,
            ColumnRole::Variable => &self.variables,
            ColumnRole::Item => &self.items,
            ColumnRole::Unit => &self.units,
            ColumnRole::Year => &self.years,
            ColumnRole::Value => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(scenario: &str, year: &str) -> OutputRow {
        OutputRow::from_fields(&["M", scenario, "WLD", "PROD", "WHT", "1000 t", year, "1"])
            .unwrap()
    }

    #[test]
    fn from_fields_requires_eight() {
        assert!(OutputRow::from_fields(&["a", "b"]).is_none());
        let parsed = row("SSP2", "2030");
        assert_eq!(parsed.get(ColumnRole::Unit), "1000 t");
    }

    #[test]
    fn selection_lists_are_sorted_and_distinct() {
        let rows = vec![row("SSP2", "2050"), row("SSP1", "2030"), row("SSP2", "2030")];
        let lists = SelectionLists::from_rows(&rows);
        assert_eq!(lists.scenarios, vec!["SSP1", "SSP2"]);
        assert_eq!(lists.years, vec!["2030", "2050"]);
        assert_eq!(lists.models, vec!["M"]);
        assert!(lists.for_role(ColumnRole::Value).is_empty());
    }
}
