use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use mip_ingest::InferenceReport;
use mip_model::{ColumnRole, DiagnosisResult, InputFormat, RowClass};

use crate::types::{AssembleResult, DiagnoseResult, InferResult, RulesResult};

pub fn print_infer(result: &InferResult) {
    println!("{}", format_table(&result.format, Some(&result.report)));
    if !result.format.columns().is_complete() {
        let missing: Vec<&str> = result
            .format
            .columns()
            .missing()
            .into_iter()
            .map(ColumnRole::as_str)
            .collect();
        println!("Unassigned roles: {}", missing.join(", "));
    }
}

pub fn print_diagnosis(result: &DiagnoseResult) {
    let session = &result.session;
    println!("Source: {}", session.source.display());
    println!("Session: {}", result.session_path.display());
    println!("{}", format_table(&session.format, None));
    println!("{}", counts_table(&session.diagnosis));
    if !session.diagnosis.bad_labels.is_empty() {
        println!("{}", bad_labels_table(&session.diagnosis));
    }
    if !session.diagnosis.unknown_labels.is_empty() {
        println!("{}", unknown_labels_table(&session.diagnosis));
    }
    if !session.diagnosis.unknown_years.is_empty() {
        let years: Vec<&str> = session
            .diagnosis
            .unknown_years
            .iter()
            .map(String::as_str)
            .collect();
        println!("Years not in the reference data: {}", years.join(", "));
    }
}

pub fn print_assembly(result: &AssembleResult) {
    println!("Output: {}", result.assembled.path.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Step"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Written"),
        Cell::new(result.assembled.rows),
    ]);
    table.add_row(vec![
        Cell::new("Dropped (unresolved labels)"),
        count_cell(result.assembled.dropped, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Filtered on re-check"),
        count_cell(result.filter.filtered, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Kept").add_attribute(Attribute::Bold),
        Cell::new(result.filter.kept).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    if result.filter.filtered_any() {
        println!("Filtered rows: {}", result.filter.filtered_path.display());
    }

    let selections = &result.filter.selections;
    let mut lists = Table::new();
    lists.set_header(vec![header_cell("Column"), header_cell("Distinct values")]);
    apply_table_style(&mut lists);
    align_column(&mut lists, 1, CellAlignment::Right);
    lists.add_row(vec![Cell::new("Model"), Cell::new(selections.models.len())]);
    for role in ColumnRole::ALL {
        if role == ColumnRole::Value {
            continue;
        }
        lists.add_row(vec![
            Cell::new(role.as_str()),
            Cell::new(selections.for_role(role).len()),
        ]);
    }
    println!("{lists}");
    if result.has_overrides {
        println!("Overridden labels present: manual review required.");
    }
    if result.unresolved > 0 {
        println!("{} unknown label(s) still unresolved.", result.unresolved);
    }
}

pub fn print_rules(result: &RulesResult) {
    println!("Rule set: {}", result.root.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table"), header_cell("Entries")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (name, size) in &result.tables {
        table.add_row(vec![Cell::new(name), Cell::new(size)]);
    }
    println!("{table}");
}

fn format_table(format: &InputFormat, report: Option<&InferenceReport>) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("Setting"), header_cell("Value")];
    if report.is_some() {
        header.push(header_cell("Guessed"));
    }
    table.set_header(header);
    apply_table_style(&mut table);
    let guessed = |flag: Option<bool>| match flag {
        Some(true) => Cell::new("yes").fg(Color::Green),
        Some(false) => Cell::new("no").fg(Color::Yellow),
        None => dim_cell("-"),
    };
    let delimiter = match format.delimiter() {
        "\t" => "\\t".to_string(),
        other => format!("{other:?}"),
    };
    let mut rows = vec![
        ("Delimiter", delimiter, report.map(|r| r.delimiter)),
        (
            "Lines to skip",
            format.initial_lines_to_skip().to_string(),
            report.map(|r| r.lines_to_skip),
        ),
        (
            "Header",
            format.header_included().to_string(),
            report.map(|r| r.header),
        ),
        ("Model", format.model_name().to_string(), None),
    ];
    for role in ColumnRole::ALL {
        let index = format
            .column(role)
            .map_or_else(|| "-".to_string(), |index| index.to_string());
        rows.push((role.as_str(), index, report.map(|r| r.columns)));
    }
    for (name, value, flag) in rows {
        let mut cells = vec![Cell::new(name), Cell::new(value)];
        if report.is_some() {
            cells.push(guessed(flag));
        }
        table.add_row(cells);
    }
    table
}

fn counts_table(diagnosis: &DiagnosisResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Rows"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for class in RowClass::ALL {
        let color = match class {
            RowClass::StructuralIssue => Color::Red,
            RowClass::IgnoredScenario | RowClass::Duplicate => Color::Yellow,
            RowClass::Accepted => Color::Green,
        };
        table.add_row(vec![
            Cell::new(class.as_str()),
            count_cell(diagnosis.counts.get(class), color),
        ]);
    }
    table.add_row(vec![
        Cell::new("total")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(diagnosis.counts.total()).add_attribute(Attribute::Bold),
    ]);
    table
}

fn bad_labels_table(diagnosis: &DiagnosisResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Role"),
        header_cell("Label"),
        header_cell("Fix"),
    ]);
    apply_table_style(&mut table);
    for entry in &diagnosis.bad_labels {
        table.add_row(vec![
            Cell::new(entry.role.as_str()),
            Cell::new(&entry.label),
            Cell::new(&entry.fix).fg(Color::Green),
        ]);
    }
    table
}

fn unknown_labels_table(diagnosis: &DiagnosisResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Role"),
        header_cell("Label"),
        header_cell("Closest match"),
        header_cell("Fix"),
        header_cell("Override"),
    ]);
    apply_table_style(&mut table);
    for entry in &diagnosis.unknown_labels {
        let fix = if entry.fix.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(&entry.fix).fg(Color::Green)
        };
        let overridden = if entry.overridden {
            Cell::new("yes").fg(Color::Yellow)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            Cell::new(entry.role.as_str()),
            Cell::new(&entry.label).fg(Color::Red),
            Cell::new(&entry.closest_match),
            fix,
            overridden,
        ]);
    }
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
