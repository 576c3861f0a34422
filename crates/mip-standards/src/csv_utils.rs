//! Shared CSV utilities for loading rule sheets.

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;

use crate::error::{Result, StandardsError};

/// A rule sheet read into memory: trimmed headers and trimmed cells.
#[derive(Debug, Clone)]
pub struct CsvSheet {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvSheet {
    /// Index of a required column, matched case-insensitively.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .ok_or_else(|| StandardsError::MissingColumn {
                path: self.path.clone(),
                column: name.to_string(),
            })
    }

    /// Iterate `(line, cell)` pairs of one column. Lines are 1-based and
    /// count the header row.
    pub fn cells(&self, index: usize) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.rows.iter().enumerate().map(move |(offset, row)| {
            let cell = row.get(index).map(String::as_str).unwrap_or("");
            (offset + 2, cell)
        })
    }
}

/// Read a CSV file with a header row.
///
/// Handles BOM characters and trims whitespace from headers and values.
pub fn read_csv_sheet(path: &Path) -> Result<CsvSheet> {
    if !path.is_file() {
        return Err(StandardsError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|error| csv_error(path, &error))?;

    let headers = reader
        .headers()
        .map_err(|error| csv_error(path, &error))?
        .iter()
        .map(|header| header.trim_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| csv_error(path, &error))?;
        rows.push(record.iter().map(|value| value.trim().to_string()).collect());
    }
    Ok(CsvSheet {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

fn csv_error(path: &Path, error: &csv::Error) -> StandardsError {
    if let csv::ErrorKind::Io(io) = error.kind() {
        return StandardsError::io(path, std::io::Error::new(io.kind(), io.to_string()));
    }
    StandardsError::Csv {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
