//! Conversion table files.

use std::path::Path;

use moji_core::{ConversionTable, Diagnostics};
use moji_model::FileConfig;

use crate::csv::read_records;
use crate::error::{IngestError, Result};

/// Load a two-column conversion table file.
///
/// The file is UTF-8 with LF line breaks, `"` quotes and no header row.
/// Invalid rows are reported through `diagnostics` and skipped.
///
/// # Errors
///
/// Returns [`IngestError::FileNotFound`] when the file is missing, or
/// [`IngestError::Table`] when no row yields a usable rule.
pub fn load_conversion_table(path: &Path, diagnostics: &dyn Diagnostics) -> Result<ConversionTable> {
    let records = read_records(&FileConfig::new(path))?;
    let (table, report) =
        ConversionTable::from_rows(&records, diagnostics).map_err(|source| IngestError::Table {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(
        path = %path.display(),
        rules = table.len(),
        rejected = report.rejected.len(),
        duplicates = report.duplicates,
        "Loaded conversion table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use moji_core::{CollectedDiagnostics, ConvertError, Diagnostic, InvalidRowReason};
    use tempfile::TempDir;

    fn table_file(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("table.csv");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_loads_rules_and_deletions() {
        let dir = TempDir::new().unwrap();
        let path = table_file(&dir, "\"龍\",\"龙\"\n\"鳳\",\"凤\"\n\"删\",\"\"\n");
        let table = load_conversion_table(&path, &CollectedDiagnostics::new()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("龍"), Some("龙"));
        assert_eq!(table.get("删"), Some(""));
    }

    #[test]
    fn test_skips_invalid_rows() {
        let dir = TempDir::new().unwrap();
        let path = table_file(&dir, "\"龍\",\"龙\"\n\"孤\"\n\"\",\"x\"\n");
        let sink = CollectedDiagnostics::new();
        let table = load_conversion_table(&path, &sink).unwrap();
        assert_eq!(table.len(), 1);
        let diagnostics = sink.take();
        assert!(diagnostics.contains(&Diagnostic::InvalidTableRow {
            row: 2,
            reason: InvalidRowReason::TooFewFields { found: 1 }
        }));
        assert!(diagnostics.contains(&Diagnostic::InvalidTableRow {
            row: 3,
            reason: InvalidRowReason::EmptySource
        }));
    }

    #[test]
    fn test_blank_lines_are_rejected_rows() {
        let dir = TempDir::new().unwrap();
        let path = table_file(&dir, "\"龍\",\"龙\"\n\n\"鳳\",\"凤\"\n");
        let sink = CollectedDiagnostics::new();
        let table = load_conversion_table(&path, &sink).unwrap();
        assert_eq!(table.len(), 2);
        assert!(sink.take().contains(&Diagnostic::InvalidTableRow {
            row: 2,
            reason: InvalidRowReason::TooFewFields { found: 1 }
        }));
    }

    #[test]
    fn test_no_valid_rules() {
        let dir = TempDir::new().unwrap();
        let path = table_file(&dir, "\"孤\"\n");
        match load_conversion_table(&path, &CollectedDiagnostics::new()) {
            Err(IngestError::Table { source, .. }) => {
                assert_eq!(source, ConvertError::NoValidRules { rejected: 1 });
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_missing_table_file() {
        let dir = TempDir::new().unwrap();
        let err = load_conversion_table(&dir.path().join("nope.csv"), &CollectedDiagnostics::new())
            .unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }
}
