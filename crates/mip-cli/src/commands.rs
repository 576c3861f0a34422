use std::path::Path;

use anyhow::{Context, Result};
use mip_ingest::{FormatInference, InferenceReport};
use mip_model::{ColumnOverride, RuleTable};
use mip_output::{create, refilter};
use mip_standards::RuleRepository;
use mip_standards::repository::{RANGE_SHEET, REGION_FIX_SHEET, VALUE_FIX_SHEET};
use mip_validate::{StreamPaths, diagnose};
use tracing::{info, info_span, trace, warn};

use crate::cli::{AssembleArgs, DiagnoseArgs, FormatArgs};
use crate::config::{IntakeConfig, unescape_delimiter};
use crate::logging::redact_value;
use crate::session::Session;
use crate::types::{AssembleResult, DiagnoseResult, InferResult, RulesResult};

pub fn load_rules(root: &Path) -> Result<RuleRepository> {
    RuleRepository::load(root).with_context(|| format!("load rule set from {}", root.display()))
}

/// Guess each part of the format unless the command line fixes it.
pub fn run_infer(
    args: &FormatArgs,
    config: &IntakeConfig,
    rules: &RuleRepository,
) -> Result<InferResult> {
    let span = info_span!("infer", path = %args.file.display());
    let _guard = span.enter();

    let mut session = FormatInference::open(&args.file, config.inference_options())
        .with_context(|| format!("open {}", args.file.display()))?;

    let delimiter = match &args.delimiter {
        Some(text) => {
            session.set_delimiter(&unescape_delimiter(text));
            true
        }
        None => session.guess_delimiter(&config.delimiters()),
    };
    let lines_to_skip = match args.skip {
        Some(lines) => {
            session.set_initial_lines_to_skip(lines)?;
            true
        }
        None => session.guess_lines_to_skip()?,
    };
    let header = match args.header_override() {
        Some(included) => {
            session.set_header_included(included);
            true
        }
        None => session.guess_header_presence(),
    };
    for &ColumnOverride { role, index } in &args.columns {
        session.assign_column(role, index);
    }
    let columns = session.guess_column_roles(rules) || !args.columns.is_empty();
    if let Some(model) = &args.model {
        session.set_model_name(model);
    }

    if let Some(line) = session.non_skipped_sample().first() {
        trace!(line = redact_value(line), "first non-skipped line");
    }
    let format = session.into_format();
    info!(format = %format, "format ready");
    Ok(InferResult {
        format,
        report: InferenceReport {
            delimiter,
            lines_to_skip,
            header,
            columns,
        },
    })
}

/// Infer the format, classify every row, and write the review session.
pub fn run_diagnose(
    args: &DiagnoseArgs,
    config: &IntakeConfig,
    rules: &RuleRepository,
) -> Result<DiagnoseResult> {
    let inferred = run_infer(&args.format, config, rules)?;
    let source = &args.format.file;

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("create {}", args.output_dir.display()))?;
    let streams = StreamPaths::new(&args.output_dir, &config.output);
    let diagnosis = diagnose(
        source,
        &inferred.format,
        rules,
        &args.ignore_scenarios,
        &streams,
    )
    .with_context(|| format!("diagnose {}", source.display()))?;

    let session = Session {
        source: source.clone(),
        format: inferred.format,
        diagnosis,
        ignore_scenarios: args.ignore_scenarios.clone(),
        streams,
        output_dir: args.output_dir.clone(),
    };
    let session_path = args.output_dir.join(&config.session_name);
    session.save(&session_path)?;
    info!(session = %session_path.display(), "wrote review session");
    Ok(DiagnoseResult {
        session_path,
        session,
    })
}

/// Run both output phases for a reviewed session.
pub fn run_assemble(
    args: &AssembleArgs,
    config: &IntakeConfig,
    rules: &RuleRepository,
) -> Result<AssembleResult> {
    let session = Session::load(&args.session)?;
    let span = info_span!("assemble", source = %session.source.display());
    let _guard = span.enter();

    let assembled = create(
        &session.format,
        &session.diagnosis,
        &session.streams.accepted,
        &session.output_dir,
    )
    .context("build output table")?;
    let filtered_path = session.output_dir.join(&config.filtered_name);
    let filter = refilter(&assembled.path, &session.diagnosis, rules, &filtered_path)
        .context("re-filter output table")?;

    let unresolved = session.diagnosis.unresolved().count();
    let has_overrides = session.diagnosis.has_overrides();
    if unresolved > 0 {
        warn!(unresolved, "rows with unresolved labels were left out");
    }
    if has_overrides {
        warn!("overridden labels present; the submission needs manual review");
    }
    if filter.filtered_any() {
        warn!(
            filtered = filter.filtered,
            path = %filter.filtered_path.display(),
            "rows failed re-validation"
        );
    }
    Ok(AssembleResult {
        assembled,
        filter,
        unresolved,
        has_overrides,
    })
}

pub fn run_rules(root: &Path) -> Result<RulesResult> {
    let rules = load_rules(root)?;
    let mut tables: Vec<(String, usize)> = RuleTable::ALL
        .into_iter()
        .map(|table| (table.sheet_name().to_string(), rules.table(table).len()))
        .collect();
    tables.push((REGION_FIX_SHEET.to_string(), rules.region_fixes().len()));
    tables.push((VALUE_FIX_SHEET.to_string(), rules.value_fixes().len()));
    tables.push((RANGE_SHEET.to_string(), rules.ranges().len()));
    Ok(RulesResult {
        root: root.to_path_buf(),
        tables,
    })
}
