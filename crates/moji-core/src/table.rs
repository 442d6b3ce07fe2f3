//! Conversion table: source grapheme cluster to replacement text.
//!
//! Keys are compared by exact codepoint sequence. A rule whose replacement
//! is empty deletes the cluster. The table is immutable once built and can
//! be shared by reference across any number of record conversions.

use std::collections::HashMap;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{ConvertError, InvalidRowReason, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionTable {
    rules: HashMap<String, String>,
}

/// Outcome of building a table from rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableLoadReport {
    /// Rows that produced a rule (including rows that overwrote an earlier rule).
    pub valid: usize,
    /// Rows that were skipped, as `ConvertError::InvalidTableRow`.
    pub rejected: Vec<ConvertError>,
    /// Rows whose source cluster was already defined by an earlier row.
    pub duplicates: usize,
}

impl ConversionTable {
    /// Build a table from two-column rows.
    ///
    /// Both fields are trimmed. Rows with fewer than two fields or an empty
    /// source are rejected, reported and counted without stopping the load.
    /// An empty replacement registers a deletion rule. When a source appears
    /// more than once the last row wins.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::NoValidRules`] when no row is usable.
    pub fn from_rows<I, R, S>(rows: I, diagnostics: &dyn Diagnostics) -> Result<(Self, TableLoadReport)>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut rules = HashMap::new();
        let mut report = TableLoadReport::default();

        for (index, row) in rows.into_iter().enumerate() {
            let row_number = index + 1;
            let fields = row.as_ref();
            match parse_rule(fields) {
                Ok((source, replacement)) => {
                    if rules.insert(source.to_string(), replacement.to_string()).is_some() {
                        report.duplicates += 1;
                    }
                    report.valid += 1;
                }
                Err(reason) => {
                    diagnostics.report(Diagnostic::InvalidTableRow {
                        row: row_number,
                        reason,
                    });
                    report.rejected.push(ConvertError::InvalidTableRow {
                        row: row_number,
                        reason,
                    });
                }
            }
        }

        diagnostics.report(Diagnostic::TableLoaded {
            valid: report.valid,
            rejected: report.rejected.len(),
        });

        if report.valid == 0 {
            return Err(ConvertError::NoValidRules {
                rejected: report.rejected.len(),
            });
        }

        Ok((Self { rules }, report))
    }

    /// Number of distinct source clusters.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The replacement for `cluster`; `Some("")` marks a deletion rule.
    pub fn get(&self, cluster: &str) -> Option<&str> {
        self.rules.get(cluster).map(String::as_str)
    }

    pub fn contains(&self, cluster: &str) -> bool {
        self.rules.contains_key(cluster)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules
            .iter()
            .map(|(source, replacement)| (source.as_str(), replacement.as_str()))
    }
}

fn parse_rule<S: AsRef<str>>(fields: &[S]) -> std::result::Result<(&str, &str), InvalidRowReason> {
    let [source, replacement, ..] = fields else {
        return Err(InvalidRowReason::TooFewFields {
            found: fields.len(),
        });
    };
    let source = source.as_ref().trim();
    if source.is_empty() {
        return Err(InvalidRowReason::EmptySource);
    }
    Ok((source, replacement.as_ref().trim()))
}

/// Direct construction without validation; later pairs overwrite earlier ones.
impl<K, V> FromIterator<(K, V)> for ConversionTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            rules: iter
                .into_iter()
                .map(|(source, replacement)| (source.into(), replacement.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectedDiagnostics, SilentDiagnostics};

    #[test]
    fn builds_rules_from_rows() {
        let rows = vec![
            vec!["龍", "龙"],
            vec!["鳳", "凤"],
            vec!["車", "车"],
            vec!["馬", "马"],
        ];
        let (table, report) = ConversionTable::from_rows(rows, &SilentDiagnostics).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.get("龍"), Some("龙"));
        assert_eq!(table.get("馬"), Some("马"));
        assert_eq!(table.get("王"), None);
        assert_eq!(report.valid, 4);
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn trims_fields_and_registers_deletions() {
        let rows = vec![vec![" 龍 ", "\t龙 "], vec!["删", "   "], vec!["extra", "x", "ignored"]];
        let (table, _) = ConversionTable::from_rows(rows, &SilentDiagnostics).unwrap();
        assert_eq!(table.get("龍"), Some("龙"));
        assert_eq!(table.get("删"), Some(""));
        assert_eq!(table.get("extra"), Some("x"));
    }

    #[test]
    fn rejects_short_rows_and_empty_sources_without_aborting() {
        let rows: Vec<Vec<&str>> = vec![vec!["龍"], vec![" ", "x"], vec![], vec!["鳳", "凤"]];
        let sink = CollectedDiagnostics::new();
        let (table, report) = ConversionTable::from_rows(rows, &sink).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(report.valid, 1);
        assert_eq!(
            report.rejected,
            vec![
                ConvertError::InvalidTableRow {
                    row: 1,
                    reason: InvalidRowReason::TooFewFields { found: 1 }
                },
                ConvertError::InvalidTableRow {
                    row: 2,
                    reason: InvalidRowReason::EmptySource
                },
                ConvertError::InvalidTableRow {
                    row: 3,
                    reason: InvalidRowReason::TooFewFields { found: 0 }
                },
            ]
        );
        assert_eq!(sink.warning_count(), 3);
        assert_eq!(
            sink.snapshot().last(),
            Some(&Diagnostic::TableLoaded {
                valid: 1,
                rejected: 3
            })
        );
    }

    #[test]
    fn fails_when_no_rule_is_valid() {
        let rows = vec![vec!["only-one-field"], vec!["", "x"]];
        let err = ConversionTable::from_rows(rows, &SilentDiagnostics).unwrap_err();
        assert_eq!(err, ConvertError::NoValidRules { rejected: 2 });

        let empty: Vec<Vec<String>> = Vec::new();
        let err = ConversionTable::from_rows(empty, &SilentDiagnostics).unwrap_err();
        assert_eq!(err, ConvertError::NoValidRules { rejected: 0 });
    }

    #[test]
    fn last_duplicate_wins() {
        let rows = vec![vec!["龍", "竜"], vec!["龍", "龙"]];
        let (table, report) = ConversionTable::from_rows(rows, &SilentDiagnostics).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("龍"), Some("龙"));
        assert_eq!(report.valid, 2);
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn keys_match_exact_codepoint_sequences() {
        let table: ConversionTable = [("葛\u{E0100}", "葛")].into_iter().collect();
        assert!(table.contains("葛\u{E0100}"));
        assert!(!table.contains("葛"));
        assert!(!table.contains("\u{E0100}"));
    }
}
