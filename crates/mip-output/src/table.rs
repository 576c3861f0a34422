//! Reading and writing the headerless canonical table.

use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use mip_model::OutputRow;

use crate::error::{OutputError, Result};

pub fn write_table<'a>(path: &Path, rows: impl IntoIterator<Item = &'a OutputRow>) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| OutputError::csv(path, e))?;
    for row in rows {
        writer
            .write_record(row.fields())
            .map_err(|e| OutputError::csv(path, e))?;
    }
    writer.flush().map_err(|e| OutputError::io(path, e))
}

pub fn read_table(path: &Path) -> Result<Vec<OutputRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| OutputError::csv(path, e))?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| OutputError::csv(path, e))?;
        let fields: Vec<&str> = record.iter().collect();
        let row = OutputRow::from_fields(&fields).ok_or_else(|| OutputError::MalformedTableRow {
            path: path.to_path_buf(),
            line: record.position().map_or(0, csv::Position::line),
            found: fields.len(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}
