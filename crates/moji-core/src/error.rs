//! Error types for the conversion engine.

use std::fmt;

use thiserror::Error;

/// Why a conversion table row was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidRowReason {
    /// The row has fewer than two fields.
    TooFewFields { found: usize },
    /// The source field is empty after trimming.
    EmptySource,
}

impl fmt::Display for InvalidRowReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewFields { found } => write!(f, "expected 2 fields, found {found}"),
            Self::EmptySource => f.write_str("source character is empty"),
        }
    }
}

/// Errors raised while building tables or converting text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConvertError {
    // === Table Errors ===
    /// Malformed table row. Recovered by the loader and counted.
    #[error("conversion table row {row}: {reason}")]
    InvalidTableRow { row: usize, reason: InvalidRowReason },

    /// The table source produced no usable rule.
    #[error("no valid conversion rules found ({rejected} rows rejected)")]
    NoValidRules { rejected: usize },

    // === Field Errors ===
    /// A cluster has no rule and the missing-character policy is `error`.
    #[error("character {} not found in conversion table", describe_cluster(cluster))]
    MissingCharacter { cluster: String },

    /// The encoding label is not in the registry.
    #[error("unsupported encoding: {encoding:?}")]
    UnsupportedEncoding { encoding: String },

    /// A cluster does not survive an encode/decode round trip and the policy is `error`.
    #[error("character {} is not representable in {encoding}", describe_cluster(cluster))]
    CharacterNotRepresentable { cluster: String, encoding: String },
}

impl ConvertError {
    /// The offending cluster for field-level failures.
    pub fn cluster(&self) -> Option<&str> {
        match self {
            Self::MissingCharacter { cluster } | Self::CharacterNotRepresentable { cluster, .. } => {
                Some(cluster)
            }
            _ => None,
        }
    }
}

/// Formats a cluster with its codepoints, e.g. `"龍" (U+9F8D)`.
pub fn describe_cluster(cluster: &str) -> String {
    let codepoints: Vec<String> = cluster
        .chars()
        .map(|c| format!("U+{:04X}", u32::from(c)))
        .collect();
    format!("\"{cluster}\" ({})", codepoints.join(" "))
}

pub type Result<T> = std::result::Result<T, ConvertError>;
