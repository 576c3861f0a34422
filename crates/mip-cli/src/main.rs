//! Model-output intake CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use mip_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use mip_cli::commands::{load_rules, run_assemble, run_diagnose, run_infer, run_rules};
use mip_cli::config::{IntakeConfig, rules_dir};
use mip_cli::logging::{LogConfig, LogFormat, init_logging};
use mip_cli::summary::{print_assembly, print_diagnosis, print_infer, print_rules};
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<i32> {
    let config = IntakeConfig::load_or_default(cli.config.as_deref())?;
    let root = rules_dir(cli.rules.as_deref());
    match &cli.command {
        Command::Infer(args) => {
            let rules = load_rules(&root)?;
            print_infer(&run_infer(args, &config, &rules)?);
            Ok(0)
        }
        Command::Diagnose(args) => {
            let rules = load_rules(&root)?;
            print_diagnosis(&run_diagnose(args, &config, &rules)?);
            Ok(0)
        }
        Command::Assemble(args) => {
            let rules = load_rules(&root)?;
            let result = run_assemble(args, &config, &rules)?;
            print_assembly(&result);
            Ok(if result.unresolved > 0 { 1 } else { 0 })
        }
        Command::Rules => {
            print_rules(&run_rules(&root)?);
            Ok(0)
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
