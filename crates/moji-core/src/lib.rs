//! Character conversion engine for tabular text.
//!
//! Fields are split into grapheme clusters, each cluster is looked up in an
//! immutable [`ConversionTable`], and the result can optionally be checked
//! against the repertoire of a legacy encoding.
//!
//! - **segment**: grapheme cluster segmentation
//! - **table**: conversion rules built from two-column rows
//! - **convert**: per-field substitution under a missing-character policy
//! - **charset**: encode/decode round-trip validation
//! - **record**: column-scoped transformation of whole records
//! - **diagnostics**: explicit sink for everything the engine reports
//!
//! # Example
//!
//! ```
//! use moji_core::{ConversionTable, SilentDiagnostics, convert_text};
//! use moji_model::MissingCharacterPolicy;
//!
//! let table: ConversionTable = [("龍", "龙"), ("鳳", "凤")].into_iter().collect();
//! let converted = convert_text("龍王", &table, MissingCharacterPolicy::Skip, &SilentDiagnostics)?;
//! assert_eq!(converted.text, "龙王");
//! assert!(!converted.warned);
//! # Ok::<(), moji_core::ConvertError>(())
//! ```

pub mod charset;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod record;
pub mod segment;
pub mod table;

pub use charset::{RepertoireValidator, is_encodable, lookup_encoding};
pub use convert::{Converted, convert_text};
pub use diagnostics::{
    CollectedDiagnostics, Diagnostic, Diagnostics, SilentDiagnostics, TracingDiagnostics,
};
pub use error::{ConvertError, InvalidRowReason, Result, describe_cluster};
pub use record::{TransformedRecord, transform_record};
pub use table::{ConversionTable, TableLoadReport};
