//! Conversion table generation from an MJ/HK character mapping source.
//!
//! The source is a headed CSV listing, per row, a character in the HK set
//! and its MJ counterpart in up to three forms (IVS, real, Unicode). Two
//! tables come out of it, one per direction.

use std::collections::HashMap;
use std::path::Path;

use moji_model::FileConfig;

use crate::csv::{Record, decode_text, write_records};
use crate::error::{IngestError, Result};

const HK_CHAR: &str = "HKChar";
const IVS_CHAR: &str = "IVSChar";
const REAL_CHAR: &str = "RealChar";
const UNICODE_CHAR: &str = "UnicodeChar";

/// Character pairs in first-insertion order; a repeated key overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingPairs {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl MappingPairs {
    pub fn insert(&mut self, from: &str, to: &str) {
        if let Some(&position) = self.index.get(from) {
            self.entries[position].1 = to.to_string();
        } else {
            self.index.insert(from.to_string(), self.entries.len());
            self.entries.push((from.to_string(), to.to_string()));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, from: &str) -> Option<&str> {
        self.index
            .get(from)
            .map(|&position| self.entries[position].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
    }

    /// Rows ready for [`write_records`].
    pub fn to_records(&self) -> Vec<Record> {
        self.entries
            .iter()
            .map(|(from, to)| vec![from.clone(), to.clone()])
            .collect()
    }
}

/// Both directions of a mapping source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTables {
    pub mj_to_hk: MappingPairs,
    pub hk_to_mj: MappingPairs,
}

/// Entry counts of generated tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingSummary {
    pub source_rows: usize,
    pub mj_to_hk: usize,
    pub hk_to_mj: usize,
}

fn header_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn required_index(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    header_index(headers, name).ok_or_else(|| IngestError::MissingColumn {
        column: name.to_string(),
        path: path.to_path_buf(),
    })
}

fn get_string(row: &csv::StringRecord, idx: usize) -> &str {
    row.get(idx).map_or("", str::trim)
}

/// The MJ form of a row: IVS if present, else real, else Unicode.
fn mj_char<'a>(ivs: &'a str, real: &'a str, unicode: &'a str) -> &'a str {
    [ivs, real]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(unicode)
}

/// Build both mapping directions from a headed UTF-8 source file.
///
/// Values are trimmed and blank lines skipped. Rows without an HK
/// character or without any MJ form are ignored.
///
/// # Errors
///
/// - [`IngestError::FileNotFound`] / [`IngestError::FileRead`] for I/O failures
/// - [`IngestError::MissingColumn`] when a required header is absent
/// - [`IngestError::Csv`] for malformed records
pub fn build_mapping_tables(path: &Path) -> Result<(MappingTables, usize)> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::read(path, e))?;
    let text = decode_text(path, &bytes, encoding_rs::UTF_8);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| IngestError::csv(path, &e))?
        .clone();

    let idx_hk = required_index(&headers, HK_CHAR, path)?;
    let idx_ivs = required_index(&headers, IVS_CHAR, path)?;
    let idx_real = required_index(&headers, REAL_CHAR, path)?;
    let idx_unicode = required_index(&headers, UNICODE_CHAR, path)?;

    let mut tables = MappingTables::default();
    let mut rows = 0;
    for row in reader.records() {
        let row = row.map_err(|e| IngestError::csv(path, &e))?;
        rows += 1;

        let hk = get_string(&row, idx_hk);
        let mj = mj_char(
            get_string(&row, idx_ivs),
            get_string(&row, idx_real),
            get_string(&row, idx_unicode),
        );
        if hk.is_empty() || mj.is_empty() {
            tracing::debug!(row = rows, "Skipping mapping row without both characters");
            continue;
        }
        tables.mj_to_hk.insert(mj, hk);
        tables.hk_to_mj.insert(hk, mj);
    }

    Ok((tables, rows))
}

/// Generate the MJ→HK and HK→MJ conversion table files from `input`.
///
/// Outputs are UTF-8, every field quoted, LF terminated, so they load
/// directly as conversion tables.
///
/// # Errors
///
/// Propagates read failures from [`build_mapping_tables`] and write failures
/// for either output.
pub fn write_mapping_tables(input: &Path, mj_to_hk: &Path, hk_to_mj: &Path) -> Result<MappingSummary> {
    let (tables, source_rows) = build_mapping_tables(input)?;

    write_records(&tables.mj_to_hk.to_records(), &FileConfig::new(mj_to_hk))?;
    write_records(&tables.hk_to_mj.to_records(), &FileConfig::new(hk_to_mj))?;

    let summary = MappingSummary {
        source_rows,
        mj_to_hk: tables.mj_to_hk.len(),
        hk_to_mj: tables.hk_to_mj.len(),
    };
    tracing::info!(
        input = %input.display(),
        source_rows = summary.source_rows,
        mj_to_hk = summary.mj_to_hk,
        hk_to_mj = summary.hk_to_mj,
        "Generated mapping tables"
    );
    Ok(summary)
}
