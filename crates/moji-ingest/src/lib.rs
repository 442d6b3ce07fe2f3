//! File handling for mojimap.
//!
//! This crate reads and writes the delimited files the conversion engine
//! works on:
//!
//! - **Records**: comma-separated files in any supported encoding, with a
//!   configurable quote character and line break
//! - **Conversion tables**: two-column UTF-8 tables loaded into a
//!   [`moji_core::ConversionTable`]
//! - **Mapping sources**: MJ/HK character lists turned into a pair of
//!   conversion tables
//!
//! # Example
//!
//! ```ignore
//! use moji_core::TracingDiagnostics;
//! use moji_ingest::{load_conversion_table, read_records};
//! use moji_model::FileConfig;
//!
//! let table = load_conversion_table("tables/hk_to_mj.csv".as_ref(), &TracingDiagnostics)?;
//! let records = read_records(&FileConfig::new("input.csv").with_encoding("shift_jis"))?;
//! ```

mod csv;
mod error;
mod mapping;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === Record I/O ===
pub use self::csv::{
    EncodedText, Record, decode_text, encode_text, read_records, resolve_encoding, write_records,
};

// === Conversion Tables ===
pub use table::load_conversion_table;

// === Mapping Sources ===
pub use mapping::{
    MappingPairs, MappingSummary, MappingTables, build_mapping_tables, write_mapping_tables,
};
