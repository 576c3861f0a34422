//! Input-format inference over bounded samples.
//!
//! A [`FormatInference`] session owns the [`InputFormat`] being built for one
//! upload, plus two samples of the file:
//!
//! - the *prefix sample*: the first `sample_size` lines, used for the
//!   delimiter and skip-count guesses;
//! - the *non-skipped sample*: `sample_size` lines starting at the current
//!   skip offset, used for header and column-role guesses.
//!
//! The parsed form of the non-skipped sample (split, quote-stripped, pruned to
//! its modal width) is memoized. Changing the delimiter or the skip count
//! goes through [`FormatInference::recompute_sample`], which drops that cache.

use std::path::{Path, PathBuf};

use mip_model::{ColumnRole, InputFormat, RuleTable};
use mip_standards::RuleRepository;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::fields::{is_plausible_year, modal_count, parse_value, split_line, strip_quotes};
use crate::lines::read_lines;
use crate::sniff::{sniff_delimiter, vote_header};

/// Delimiters tried when the caller supplies none.
pub const DEFAULT_DELIMITERS: [&str; 4] = [",", ";", "\t", "|"];

/// Tuning for inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceOptions {
    /// Lines read into each sample.
    pub sample_size: usize,
    /// A skip guess above this share of the sample is treated as a failure.
    pub max_skip_ratio: f64,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            sample_size: 1000,
            max_skip_ratio: 0.9,
        }
    }
}

/// Which inference steps produced a confident answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceReport {
    pub delimiter: bool,
    pub lines_to_skip: bool,
    pub header: bool,
    pub columns: bool,
}

impl InferenceReport {
    pub fn all_succeeded(&self) -> bool {
        self.delimiter && self.lines_to_skip && self.header && self.columns
    }
}

/// Non-skipped sample split into fields and pruned to its modal width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSample {
    pub width: usize,
    pub rows: Vec<Vec<String>>,
}

impl ParsedSample {
    fn parse(lines: &[String], delimiter: &str) -> Self {
        let split: Vec<Vec<&str>> = lines.iter().map(|line| split_line(line, delimiter)).collect();
        let Some((width, _)) = modal_count(split.iter().map(Vec::len)) else {
            return Self::default();
        };
        let rows = split
            .into_iter()
            .filter(|fields| fields.len() == width)
            .map(|fields| fields.into_iter().map(|f| strip_quotes(f).to_string()).collect())
            .collect();
        Self { width, rows }
    }
}

enum CellMatch {
    Model(String),
    Role(ColumnRole),
}

/// Interactive inference session for one uploaded file.
#[derive(Debug, Clone)]
pub struct FormatInference {
    path: PathBuf,
    options: InferenceOptions,
    format: InputFormat,
    prefix_sample: Vec<String>,
    non_skipped_sample: Vec<String>,
    parsed: Option<ParsedSample>,
}

impl FormatInference {
    /// Start a session with an empty descriptor.
    pub fn open(path: &Path, options: InferenceOptions) -> Result<Self> {
        Self::with_format(path, InputFormat::new(), options)
    }

    /// Resume a session from an existing descriptor.
    pub fn with_format(path: &Path, format: InputFormat, options: InferenceOptions) -> Result<Self> {
        let prefix_sample = read_lines(path, 0, options.sample_size)?;
        debug!(
            path = %path.display(),
            lines = prefix_sample.len(),
            "read prefix sample"
        );
        let mut session = Self {
            path: path.to_path_buf(),
            options,
            format,
            prefix_sample,
            non_skipped_sample: Vec::new(),
            parsed: None,
        };
        session.recompute_sample()?;
        Ok(session)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> &InputFormat {
        &self.format
    }

    pub fn into_format(self) -> InputFormat {
        self.format
    }

    pub fn prefix_sample(&self) -> &[String] {
        &self.prefix_sample
    }

    pub fn non_skipped_sample(&self) -> &[String] {
        &self.non_skipped_sample
    }

    /// Reload the non-skipped sample for the current skip count and drop the
    /// memoized parse.
    pub fn recompute_sample(&mut self) -> Result<()> {
        let skip = self.format.initial_lines_to_skip();
        let size = self.options.sample_size;
        let cached = self.prefix_sample.len();
        self.non_skipped_sample = match skip.checked_add(size) {
            Some(end) if end <= cached => self.prefix_sample[skip..end].to_vec(),
            // The whole file is already in the prefix sample.
            _ if cached < size => self.prefix_sample[skip.min(cached)..].to_vec(),
            _ => read_lines(&self.path, skip, size)?,
        };
        self.parsed = None;
        Ok(())
    }

    /// Parsed non-skipped sample, computed on first use.
    pub fn parsed_sample(&mut self) -> &ParsedSample {
        let delimiter = self.format.delimiter();
        let sample = &self.non_skipped_sample;
        self.parsed
            .get_or_insert_with(|| ParsedSample::parse(sample, delimiter))
    }

    pub fn set_delimiter(&mut self, delimiter: &str) {
        if self.format.set_delimiter(delimiter) {
            // The lines are unchanged; only the parse is stale.
            self.parsed = None;
        }
    }

    pub fn set_initial_lines_to_skip(&mut self, lines: usize) -> Result<()> {
        if self.format.set_initial_lines_to_skip(lines) {
            self.recompute_sample()?;
        }
        Ok(())
    }

    pub fn set_header_included(&mut self, included: bool) {
        self.format.set_header_included(included);
    }

    pub fn assign_column(&mut self, role: ColumnRole, index: usize) {
        self.format.assign_column(role, index);
    }

    pub fn set_model_name(&mut self, name: &str) {
        self.format.set_model_name(name);
    }

    /// Guess the delimiter from the prefix sample. Leaves the descriptor
    /// untouched and returns false when the sample is ambiguous.
    pub fn guess_delimiter(&mut self, candidates: &[&str]) -> bool {
        let Some(delimiter) = sniff_delimiter(&self.prefix_sample, candidates) else {
            debug!(path = %self.path.display(), "delimiter is ambiguous");
            return false;
        };
        self.set_delimiter(delimiter);
        true
    }

    /// Guess whether the first non-skipped line is a header.
    pub fn guess_header_presence(&mut self) -> bool {
        let delimiter = self.format.delimiter();
        let rows: Vec<Vec<&str>> = self
            .non_skipped_sample
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| split_line(line, delimiter).into_iter().map(strip_quotes).collect())
            .collect();
        let vote = vote_header(&rows);
        match vote.decision() {
            Some(included) => {
                self.format.set_header_included(included);
                true
            }
            None => {
                debug!(?vote, "header presence is indeterminate");
                false
            }
        }
    }

    /// Count leading prefix lines whose field count differs from the modal
    /// count. A guess above `max_skip_ratio` of the sample fails and resets
    /// the skip count to 0.
    pub fn guess_lines_to_skip(&mut self) -> Result<bool> {
        let delimiter = self.format.delimiter();
        let counts: Vec<usize> = self
            .prefix_sample
            .iter()
            .map(|line| split_line(line, delimiter).len())
            .collect();
        let Some((mode, _)) = modal_count(counts.iter().copied()) else {
            return Ok(false);
        };
        let leading = counts.iter().take_while(|count| **count != mode).count();
        let limit = self.options.max_skip_ratio * self.prefix_sample.len() as f64;
        if leading as f64 > limit {
            debug!(leading, limit, "skip guess exceeds sample ratio");
            self.set_initial_lines_to_skip(0)?;
            return Ok(false);
        }
        self.set_initial_lines_to_skip(leading)?;
        Ok(true)
    }

    /// Assign column roles from the parsed sample.
    ///
    /// Columns are scanned one at a time, top to bottom. Each cell is tested,
    /// in order, as a model name, a scenario/region/variable/item/unit label
    /// (or that role's literal header), a plausible year, and a number. The
    /// first hit decides the column. Roles that are already assigned are not
    /// reassigned. Returns true iff a role or the model name was assigned.
    pub fn guess_column_roles(&mut self, rules: &RuleRepository) -> bool {
        if self.parsed.is_none() {
            self.parsed_sample();
        }
        let Some(parsed) = &self.parsed else {
            return false;
        };
        let format = &mut self.format;
        let mut assigned_any = false;

        for column in 0..parsed.width {
            if format.columns().role_at(column + 1).is_some() {
                continue;
            }
            let hit = parsed
                .rows
                .iter()
                .map(|row| row[column].as_str())
                .filter(|cell| !cell.is_empty())
                .find_map(|cell| classify_cell(cell, format, rules));
            match hit {
                Some(CellMatch::Model(name)) => {
                    debug!(column = column + 1, model = %name, "found model column");
                    format.set_model_name(name);
                    assigned_any = true;
                }
                Some(CellMatch::Role(role)) => {
                    debug!(column = column + 1, %role, "assigned column role");
                    format.assign_column(role, column + 1);
                    assigned_any = true;
                }
                None => {}
            }
        }
        assigned_any
    }

    /// Run every guess in dependency order.
    pub fn infer(&mut self, candidates: &[&str], rules: &RuleRepository) -> Result<InferenceReport> {
        let mut report = InferenceReport {
            delimiter: self.guess_delimiter(candidates),
            ..InferenceReport::default()
        };
        report.lines_to_skip = self.guess_lines_to_skip()?;
        report.header = self.guess_header_presence();
        report.columns = self.guess_column_roles(rules);
        info!(
            path = %self.path.display(),
            format = %self.format,
            complete = self.format.columns().is_complete(),
            "inferred input format"
        );
        Ok(report)
    }
}

fn classify_cell(cell: &str, format: &InputFormat, rules: &RuleRepository) -> Option<CellMatch> {
    if let Some(model) = rules.match_exact(RuleTable::Model, cell) {
        return Some(CellMatch::Model(model.to_string()));
    }
    let open = |role: ColumnRole| format.column(role).is_none();
    for role in ColumnRole::LABELS {
        let Some(table) = role.rule_table() else {
            continue;
        };
        if open(role) && (role.is_header_name(cell) || rules.match_exact(table, cell).is_some()) {
            return Some(CellMatch::Role(role));
        }
    }
    if open(ColumnRole::Year)
        && (ColumnRole::Year.is_header_name(cell) || is_plausible_year(cell))
    {
        return Some(CellMatch::Role(ColumnRole::Year));
    }
    if open(ColumnRole::Value)
        && (ColumnRole::Value.is_header_name(cell) || parse_value(cell).is_some())
    {
        return Some(CellMatch::Role(ColumnRole::Value));
    }
    None
}
