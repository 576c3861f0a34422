//! The full diagnosis pass over one uploaded file.

use std::path::Path;

use mip_ingest::{modal_count, open_lines, split_line};
use mip_model::{DiagnosisResult, InputFormat, RowClass, RowCounts};
use mip_standards::RuleRepository;
use tracing::{debug, info, info_span, trace, warn};

use crate::error::{DiagnosisError, Result};
use crate::labels::FieldDiagnoser;
use crate::streams::{RowSinks, StreamPaths};
use crate::structural::{StructuralValidator, check_format};

/// Modal field count over the data region (skipped and header lines excluded).
///
/// Ties resolve to the smallest count. `None` when the data region is empty.
pub fn data_width(path: &Path, format: &InputFormat) -> Result<Option<usize>> {
    let delimiter = format.delimiter();
    let mut failure = None;
    let counts = open_lines(path)?
        .skip(format.data_start())
        .map_while(|line| match line {
            Ok(line) => Some(split_line(&line, delimiter).len()),
            Err(e) => {
                failure = Some(e);
                None
            }
        });
    let mode = modal_count(counts);
    if let Some(e) = failure {
        return Err(DiagnosisError::io(path, e));
    }
    Ok(mode.map(|(width, _)| width))
}

/// Classify every row of `path`, write the four row streams, and diagnose
/// the labels of accepted rows.
///
/// All four streams are truncated first. Row numbers in annotations are
/// 1-based over the whole file.
pub fn diagnose<S: AsRef<str>>(
    path: &Path,
    format: &InputFormat,
    rules: &RuleRepository,
    ignore_scenarios: &[S],
    streams: &StreamPaths,
) -> Result<DiagnosisResult> {
    let span = info_span!("diagnose", path = %path.display());
    let _guard = span.enter();

    check_format(format)?;
    let Some(width) = data_width(path, format)? else {
        warn!("no data rows after skipped and header lines");
        RowSinks::create(streams)?.finish()?;
        return Ok(DiagnosisResult::default());
    };
    debug!(width, "computed modal field count");

    let mut validator = StructuralValidator::new(format, rules, width, ignore_scenarios)?;
    let mut sinks = RowSinks::create(streams)?;
    let mut counts = RowCounts::default();

    let data_start = format.data_start();
    for (offset, line) in open_lines(path)?.enumerate() {
        let line = line.map_err(|e| DiagnosisError::io(path, e))?;
        if offset < data_start {
            continue;
        }
        let row = offset + 1;
        let outcome = validator.classify(&line);
        let class = outcome.class();
        trace!(row, class = %class, "classified row");
        counts.record(class);
        let note = outcome.note().map(|note| format!("row {row}: {note}"));
        sinks.write(class, &line, note.as_deref())?;
    }
    sinks.finish()?;

    let (values, value_fixes) = validator.finish();
    let mut report = FieldDiagnoser::new(rules).diagnose(&values)?;
    report.bad_labels.extend(value_fixes);

    info!(
        structural_issues = counts.get(RowClass::StructuralIssue),
        ignored_scenarios = counts.get(RowClass::IgnoredScenario),
        duplicates = counts.get(RowClass::Duplicate),
        accepted = counts.get(RowClass::Accepted),
        bad_labels = report.bad_labels.len(),
        unknown_labels = report.unknown_labels.len(),
        "diagnosis complete"
    );

    Ok(DiagnosisResult {
        counts,
        bad_labels: report.bad_labels.into_iter().collect(),
        unknown_labels: report.unknown_labels.into_iter().collect(),
        unknown_years: report.unknown_years,
    })
}
