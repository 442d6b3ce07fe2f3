//! Column-scoped transformation of a whole record.

use moji_model::MissingCharacterPolicy;
use tracing::Level;

use crate::charset::RepertoireValidator;
use crate::convert::convert_text;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::Result;
use crate::table::ConversionTable;

/// A transformed record. Always has the same field count as its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformedRecord {
    pub fields: Vec<String>,
    pub warned: bool,
}

/// Convert the fields named by `target_columns` and copy every other field.
///
/// Each target field is substituted through `table` and then, when a
/// validator is given, checked against its encoding. Indices that are
/// negative or past the end leave the record untouched at that position,
/// are reported as `ColumnOutOfRange` and set `warned`. Every target is
/// converted from the input field, so a repeated index yields the same
/// result as a single one.
///
/// # Errors
///
/// Propagates the first field-level failure (`MissingCharacter` or
/// `CharacterNotRepresentable`); the caller decides whether that aborts
/// the run.
pub fn transform_record<S: AsRef<str>>(
    record: &[S],
    target_columns: &[i64],
    table: &ConversionTable,
    policy: MissingCharacterPolicy,
    validator: Option<&RepertoireValidator>,
    diagnostics: &dyn Diagnostics,
) -> Result<TransformedRecord> {
    let mut transformed = TransformedRecord {
        fields: record.iter().map(|field| field.as_ref().to_string()).collect(),
        warned: false,
    };

    for &column in target_columns {
        let Some(index) = usize::try_from(column)
            .ok()
            .filter(|&index| index < record.len())
        else {
            diagnostics.report(Diagnostic::ColumnOutOfRange {
                column,
                field_count: record.len(),
            });
            transformed.warned = true;
            continue;
        };

        let original = record[index].as_ref();
        let mut converted = convert_text(original, table, policy, diagnostics)?;
        if let Some(validator) = validator {
            let validated = validator.validate(&converted.text, diagnostics)?;
            converted.text = validated.text;
            converted.warned |= validated.warned;
        }

        if converted.text != original && diagnostics.enabled(Level::DEBUG) {
            diagnostics.report(Diagnostic::FieldConverted {
                column: index,
                before: original.to_string(),
                after: converted.text.clone(),
            });
        }
        transformed.warned |= converted.warned;
        transformed.fields[index] = converted.text;
    }

    Ok(transformed)
}
