//! CLI argument definitions for mojimap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "mojimap",
    version,
    about = "Convert characters in CSV columns through a substitution table",
    long_about = "Convert characters in selected CSV columns through a substitution table.\n\n\
                  Works on grapheme clusters, so variation sequences and emoji are never split.\n\
                  Optionally checks the result against a target encoding such as Shift_JIS."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides the configuration file and -v/-q flags).
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

    /// Write logs to this file (overrides the configuration file).
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a CSV file as described by a JSON configuration file.
    Convert(ConvertArgs),

    /// Generate MJ→HK and HK→MJ conversion tables from a mapping source.
    Tables(TablesArgs),
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Path to the JSON configuration file.
    #[arg(short = 'c', long = "config", value_name = "PATH", default_value = "config.json")]
    pub config: PathBuf,

    /// Input CSV file (overrides conversion.input.path).
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output CSV file (overrides conversion.output.path).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct TablesArgs {
    /// Mapping source CSV with HKChar, IVSChar, RealChar and UnicodeChar columns.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output path for the MJ→HK table.
    #[arg(value_name = "MJ_TO_HK")]
    pub mj_to_hk: PathBuf,

    /// Output path for the HK→MJ table.
    #[arg(value_name = "HK_TO_MJ")]
    pub hk_to_mj: PathBuf,
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
