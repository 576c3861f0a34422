//! CLI argument definitions for the intake tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use mip_model::ColumnOverride;

#[derive(Parser)]
#[command(
    name = "mip-intake",
    version,
    about = "Diagnose and clean economic model-output files",
    long_about = "Infer the layout of a model-output file, classify its rows, \
                  reconcile labels against a reference rule set, and assemble \
                  the canonical 8-column table after review."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Rule-set directory (defaults to $MIP_RULES_DIR, then ./rules).
    #[arg(long = "rules", value_name = "DIR", global = true)]
    pub rules: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row content in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Infer delimiter, header, skip count, and column roles.
    Infer(FormatArgs),

    /// Classify every row and report label defects.
    Diagnose(DiagnoseArgs),

    /// Build the output table from a reviewed session and re-filter it.
    Assemble(AssembleArgs),

    /// Load the rule set and print the size of every table.
    Rules,
}

/// Input file plus manual corrections to the inferred format.
#[derive(Args, Clone)]
pub struct FormatArgs {
    /// Raw model-output file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Field delimiter (`\t` is accepted for tab).
    #[arg(long = "delimiter", value_name = "TEXT")]
    pub delimiter: Option<String>,

    /// Leading lines to skip before the header or first data row.
    #[arg(long = "skip", value_name = "N")]
    pub skip: Option<usize>,

    /// The first non-skipped line is a header.
    #[arg(long = "header", conflicts_with = "no_header")]
    pub header: bool,

    /// The first non-skipped line is data.
    #[arg(long = "no-header")]
    pub no_header: bool,

    /// Assign a role to a 1-based column, e.g. `--column unit=6`.
    #[arg(long = "column", value_name = "ROLE=N")]
    pub columns: Vec<ColumnOverride>,

    /// Model name written into the first output column.
    #[arg(long = "model", value_name = "NAME")]
    pub model: Option<String>,
}

impl FormatArgs {
    pub fn header_override(&self) -> Option<bool> {
        match (self.header, self.no_header) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Args)]
pub struct DiagnoseArgs {
    #[command(flatten)]
    pub format: FormatArgs,

    /// Directory for the row streams and the session file.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Scenario whose rows are set aside (repeatable).
    #[arg(long = "ignore-scenario", value_name = "SCENARIO")]
    pub ignore_scenarios: Vec<String>,
}

#[derive(Args)]
pub struct AssembleArgs {
    /// Session file written by `diagnose`.
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
