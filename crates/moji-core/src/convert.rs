//! Character substitution over one field.

use moji_model::MissingCharacterPolicy;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{ConvertError, Result};
use crate::segment::graphemes;
use crate::table::ConversionTable;

/// Text produced by a conversion step plus its warning flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Converted {
    pub text: String,
    pub warned: bool,
}

impl Converted {
    pub fn new(text: impl Into<String>, warned: bool) -> Self {
        Self {
            text: text.into(),
            warned,
        }
    }
}

/// Apply `table` to every grapheme cluster of `text`.
///
/// A rule with a non-empty replacement substitutes the cluster, an empty
/// replacement deletes it. Clusters without a rule follow `policy`:
/// `Warn` and `Skip` keep them unchanged (only `Warn` sets `warned`).
/// Substitution never splits a cluster, so a rule for a variation
/// selector alone never matches inside an ideographic variation sequence.
///
/// # Errors
///
/// Returns [`ConvertError::MissingCharacter`] for the first cluster without
/// a rule when `policy` is `Error`. No partial output is returned.
pub fn convert_text(
    text: &str,
    table: &ConversionTable,
    policy: MissingCharacterPolicy,
    diagnostics: &dyn Diagnostics,
) -> Result<Converted> {
    let mut converted = Converted {
        text: String::with_capacity(text.len()),
        warned: false,
    };

    for cluster in graphemes(text) {
        if let Some(replacement) = table.get(cluster) {
            converted.text.push_str(replacement);
            continue;
        }
        match policy {
            MissingCharacterPolicy::Error => {
                return Err(ConvertError::MissingCharacter {
                    cluster: cluster.to_string(),
                });
            }
            MissingCharacterPolicy::Warn => {
                diagnostics.report(Diagnostic::MissingCharacter {
                    cluster: cluster.to_string(),
                });
                converted.warned = true;
            }
            MissingCharacterPolicy::Skip => {}
        }
        converted.text.push_str(cluster);
    }

    Ok(converted)
}
