//! The conversion run: table, records, transformation, output.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, error, info, info_span, warn};

use moji_core::{Diagnostics, RepertoireValidator, TracingDiagnostics, transform_record};
use moji_ingest::{Record, load_conversion_table, read_records, write_records};
use moji_model::{ConversionConfig, RecordErrorHandling};

/// Records checked for short rows before processing.
const SHAPE_CHECK_ROWS: usize = 5;

/// Progress is logged every this many data records.
const PROGRESS_INTERVAL: usize = 1000;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Records read, header included.
    pub input_rows: usize,
    /// Records written, header included.
    pub output_rows: usize,
    /// Data records that went through the transformer.
    pub processed_rows: usize,
    /// Data records written unmodified after a field-level failure.
    pub kept_original_rows: usize,
    /// Characters written as `?` because the output encoding lacks them.
    pub replaced_characters: usize,
    pub rule_count: usize,
    pub target_columns: Vec<i64>,
    pub warned: bool,
}

impl ProcessReport {
    fn new(config: &ConversionConfig, rule_count: usize) -> Self {
        Self {
            input_path: config.input.path.clone(),
            output_path: config.output.path.clone(),
            input_rows: 0,
            output_rows: 0,
            processed_rows: 0,
            kept_original_rows: 0,
            replaced_characters: 0,
            rule_count,
            target_columns: config.target_columns.clone(),
            warned: false,
        }
    }
}

/// Run a conversion, reporting diagnostics through `tracing`.
///
/// # Errors
///
/// See [`process_conversion_with`].
pub fn process_conversion(config: &ConversionConfig) -> Result<ProcessReport> {
    process_conversion_with(config, &TracingDiagnostics)
}

/// Run a conversion with an explicit diagnostics sink.
///
/// An empty input file succeeds with a warning and writes nothing.
///
/// # Errors
///
/// Fails when the conversion table cannot be loaded, the validation
/// encoding is unknown, the input cannot be read, the output cannot be
/// written, or a record fails under `recordErrorHandling = abort`. The
/// underlying `IngestError` or `ConvertError` stays in the error chain.
pub fn process_conversion_with(
    config: &ConversionConfig,
    diagnostics: &dyn Diagnostics,
) -> Result<ProcessReport> {
    let span = info_span!(
        "conversion",
        input = %config.input.path.display(),
        output = %config.output.path.display()
    );
    let _guard = span.enter();
    let start = Instant::now();

    info!(
        table = %config.conversion_table.display(),
        target_columns = ?config.target_columns,
        input_encoding = %config.input.encoding,
        output_encoding = %config.output.encoding,
        input_header = config.input.has_header,
        output_header = config.output.has_header,
        missing_character_handling = %config.missing_character_handling,
        "Starting conversion"
    );

    let table = load_conversion_table(config.conversion_table(), diagnostics)
        .context("load conversion table")?;
    info!(rules = table.len(), "Conversion rules loaded");

    let validator = match config.active_validation() {
        Some(validation) => {
            let validator = RepertoireValidator::from_config(validation)
                .context("configure character set validation")?;
            info!(
                encoding = validator.label(),
                canonical = validator.encoding_name(),
                handling = validator.policy().as_str(),
                "Character set validation enabled"
            );
            Some(validator)
        }
        None => None,
    };

    let records = read_records(&config.input).context("read input file")?;
    let mut report = ProcessReport::new(config, table.len());
    report.input_rows = records.len();
    info!(records = records.len(), "Input file read");

    if records.is_empty() {
        warn!("Input file is empty; nothing to convert");
        report.warned = true;
        return Ok(report);
    }

    check_record_shapes(&records, config.expected_columns());

    let mut output: Vec<Record> = Vec::with_capacity(records.len());
    let (header, data) = if config.input.has_header {
        let (header, data) = records.split_at(1);
        debug!(header = ?header[0], "Input header detected");
        (header.first(), data)
    } else {
        (None, records.as_slice())
    };

    if config.output.has_header {
        match header {
            Some(header) => output.push(header.clone()),
            None => {
                warn!("Output header requested but the input has no header");
                report.warned = true;
            }
        }
    }

    let first_data_row = records.len() - data.len() + 1;
    for (offset, record) in data.iter().enumerate() {
        let row = first_data_row + offset;
        let result = transform_record(
            record,
            &config.target_columns,
            &table,
            config.missing_character_handling,
            validator.as_ref(),
            diagnostics,
        );
        match result {
            Ok(transformed) => {
                report.warned |= transformed.warned;
                output.push(transformed.fields);
                report.processed_rows += 1;
            }
            Err(err) => match config.record_error_handling {
                RecordErrorHandling::Abort => {
                    error!(row, error = %err, "Record conversion failed");
                    return Err(err).with_context(|| format!("record {row}"));
                }
                RecordErrorHandling::KeepOriginal => {
                    warn!(row, error = %err, "Record conversion failed; keeping original");
                    output.push(record.clone());
                    report.kept_original_rows += 1;
                    report.warned = true;
                }
            },
        }

        let done = offset + 1;
        if done % PROGRESS_INTERVAL == 0 {
            info!(records = done, "Processing");
        }
    }

    let replaced = write_records(&output, &config.output).context("write output file")?;
    report.output_rows = output.len();
    report.replaced_characters = replaced.len();
    report.warned |= !replaced.is_empty();

    info!(
        input_rows = report.input_rows,
        output_rows = report.output_rows,
        processed_rows = report.processed_rows,
        kept_original_rows = report.kept_original_rows,
        replaced_characters = report.replaced_characters,
        warned = report.warned,
        elapsed_ms = start.elapsed().as_millis(),
        "Conversion finished"
    );
    if report.warned {
        warn!("Conversion finished with warnings; see the log for details");
    }
    Ok(report)
}

/// Warn about leading records too short for the target columns.
fn check_record_shapes(records: &[Record], expected_columns: usize) {
    for (index, record) in records.iter().take(SHAPE_CHECK_ROWS).enumerate() {
        if record.len() < expected_columns {
            warn!(
                row = index + 1,
                actual = record.len(),
                expected = expected_columns,
                "Record has fewer columns than the target columns need"
            );
        }
    }
}
