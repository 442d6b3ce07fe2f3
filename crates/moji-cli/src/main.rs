//! mojimap CLI.

use clap::{ColorChoice, Parser};
use moji_cli::logging::{LogConfig, LogFormat, init_logging, level_filter};
use moji_cli::summary::{print_mapping_summary, print_report};
use moji_model::{LogLevel, LogOutput, LoggingConfig};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{load_convert_config, run_convert, run_tables};

/// Successful run.
const EXIT_OK: i32 = 0;
/// Failed run.
const EXIT_FAILURE: i32 = 1;
/// Successful run with warnings.
const EXIT_WARNINGS: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let exit_code = match &cli.command {
        Command::Convert(args) => {
            let config = match load_convert_config(args) {
                Ok(config) => config,
                Err(error) => {
                    eprintln!("error: {error:#}");
                    std::process::exit(EXIT_FAILURE);
                }
            };
            start_logging(&cli, &config.logging);
            match run_convert(args, &config) {
                Ok(report) => {
                    print_report(&report);
                    if report.warned { EXIT_WARNINGS } else { EXIT_OK }
                }
                Err(error) => {
                    tracing::error!("Conversion failed: {error:#}");
                    eprintln!("error: {error:#}");
                    EXIT_FAILURE
                }
            }
        }
        Command::Tables(args) => {
            let settings = LoggingConfig {
                level: LogLevel::Warn,
                output: LogOutput::Console,
                log_file: None,
            };
            start_logging(&cli, &settings);
            match run_tables(args) {
                Ok(summary) => {
                    print_mapping_summary(&summary);
                    EXIT_OK
                }
                Err(error) => {
                    eprintln!("error: {error:#}");
                    EXIT_FAILURE
                }
            }
        }
    };
    std::process::exit(exit_code);
}

fn start_logging(cli: &Cli, settings: &LoggingConfig) {
    let result = log_config_from_cli(cli, settings).and_then(|config| {
        if let Some(path) = &config.log_file {
            eprintln!("Log file: {}", path.display());
        }
        init_logging(&config)
    });
    if let Err(error) = result {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(EXIT_FAILURE);
    }
}

/// Build logging configuration with consistent precedence:
/// `--log-level` over `-v/-q` over the configuration file.
fn log_config_from_cli(cli: &Cli, settings: &LoggingConfig) -> io::Result<LogConfig> {
    // An explicit --log-file skips log file selection entirely.
    let mut config = match &cli.log_file {
        Some(_) => LogConfig {
            level_filter: level_filter(settings.level),
            ..LogConfig::default()
        },
        None => LogConfig::from_settings(settings)?,
    };
    if cli.verbosity.is_present() {
        config.level_filter = cli.verbosity.tracing_level_filter();
    }
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
    if let Some(path) = &cli.log_file {
        config.log_file = Some(path.clone());
    }
    let to_file = config.log_file.is_some();
    config.with_timestamps = to_file;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => !to_file && io::stderr().is_terminal(),
    };
    Ok(config)
}
