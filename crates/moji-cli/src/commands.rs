use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use moji_cli::config::load_config;
use moji_cli::processor::{ProcessReport, process_conversion};
use moji_ingest::{MappingSummary, write_mapping_tables};
use moji_model::AppConfig;

use crate::cli::{ConvertArgs, TablesArgs};

/// Load the configuration named by `args`, with command-line path overrides.
pub fn load_convert_config(args: &ConvertArgs) -> Result<AppConfig> {
    load_config(&args.config, args.input.clone(), args.output.clone())
}

pub fn run_convert(args: &ConvertArgs, config: &AppConfig) -> Result<ProcessReport> {
    let conversion = &config.conversion;
    info!(config = %args.config.display(), "Configuration loaded");
    if let Some(input) = &args.input {
        info!(input = %input.display(), "Input path overridden from the command line");
    }
    if let Some(output) = &args.output {
        info!(output = %output.display(), "Output path overridden from the command line");
    }

    if !conversion.input.path.is_file() {
        bail!("input file not found: {}", conversion.input.path.display());
    }
    if !conversion.conversion_table.is_file() {
        bail!(
            "conversion table not found: {}",
            conversion.conversion_table.display()
        );
    }
    ensure_parent_dir(&conversion.output.path)?;

    process_conversion(conversion)
}

pub fn run_tables(args: &TablesArgs) -> Result<MappingSummary> {
    info!(
        input = %args.input.display(),
        mj_to_hk = %args.mj_to_hk.display(),
        hk_to_mj = %args.hk_to_mj.display(),
        "Generating mapping tables"
    );
    ensure_parent_dir(&args.mj_to_hk)?;
    ensure_parent_dir(&args.hk_to_mj)?;
    write_mapping_tables(&args.input, &args.mj_to_hk, &args.hk_to_mj)
        .with_context(|| format!("generate mapping tables from {}", args.input.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
        return Ok(());
    };
    if !dir.exists() {
        info!(dir = %dir.display(), "Creating output directory");
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output directory {}", dir.display()))?;
    }
    Ok(())
}
