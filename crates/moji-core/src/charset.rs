//! Encoding repertoire validation.
//!
//! A cluster is representable in an encoding when encoding it and decoding
//! the bytes again reproduces the cluster exactly. Unmappable characters,
//! substitutions and decode mismatches all count as failures. Encoding
//! names are resolved through the `encoding_rs` label registry.

use encoding_rs::Encoding;
use moji_model::{CharacterSetValidation, UndefinedCharacterPolicy};

use crate::convert::Converted;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{ConvertError, Result};
use crate::segment::graphemes;

/// Resolve an encoding label such as `shift_jis`, `big5` or `utf8`.
///
/// The `replacement` pseudo-encoding is not accepted.
///
/// # Errors
///
/// Returns [`ConvertError::UnsupportedEncoding`] for unknown labels.
pub fn lookup_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label_no_replacement(label.trim().as_bytes()).ok_or_else(|| {
        ConvertError::UnsupportedEncoding {
            encoding: label.to_string(),
        }
    })
}

/// True when `cluster` survives an encode/decode round trip in `encoding`.
pub fn is_encodable(cluster: &str, encoding: &'static Encoding) -> bool {
    let (bytes, output_encoding, unmappable) = encoding.encode(cluster);
    if unmappable {
        return false;
    }
    let (decoded, malformed) = output_encoding.decode_without_bom_handling(&bytes);
    !malformed && decoded == cluster
}

/// Validates converted text against one target encoding.
#[derive(Debug, Clone)]
pub struct RepertoireValidator {
    label: String,
    encoding: &'static Encoding,
    policy: UndefinedCharacterPolicy,
    alt_char: Option<String>,
}

impl RepertoireValidator {
    /// # Errors
    ///
    /// Returns [`ConvertError::UnsupportedEncoding`] when `label` is not a known
    /// encoding. This is checked once, before any text is seen.
    pub fn new(
        label: &str,
        policy: UndefinedCharacterPolicy,
        alt_char: Option<String>,
    ) -> Result<Self> {
        let encoding = lookup_encoding(label)?;
        Ok(Self {
            label: label.to_string(),
            encoding,
            policy,
            alt_char,
        })
    }

    /// # Errors
    ///
    /// Returns [`ConvertError::UnsupportedEncoding`] for an unknown target encoding.
    pub fn from_config(validation: &CharacterSetValidation) -> Result<Self> {
        Self::new(
            &validation.target_encoding,
            validation.undefined_character_handling,
            validation.alt_char.clone(),
        )
    }

    /// The label this validator was configured with.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Canonical encoding name, e.g. `Shift_JIS`.
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn policy(&self) -> UndefinedCharacterPolicy {
        self.policy
    }

    pub fn is_representable(&self, cluster: &str) -> bool {
        is_encodable(cluster, self.encoding)
    }

    /// Check every cluster of `text`.
    ///
    /// Under `Warn`, an unrepresentable cluster is replaced by the alternate
    /// character when one is configured, otherwise kept, and `warned` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::CharacterNotRepresentable`] for the first failing
    /// cluster when the policy is `Error`.
    pub fn validate(&self, text: &str, diagnostics: &dyn Diagnostics) -> Result<Converted> {
        let mut validated = Converted {
            text: String::with_capacity(text.len()),
            warned: false,
        };

        for cluster in graphemes(text) {
            if self.is_representable(cluster) {
                validated.text.push_str(cluster);
                continue;
            }
            match self.policy {
                UndefinedCharacterPolicy::Error => {
                    return Err(ConvertError::CharacterNotRepresentable {
                        cluster: cluster.to_string(),
                        encoding: self.label.clone(),
                    });
                }
                UndefinedCharacterPolicy::Warn => {
                    diagnostics.report(Diagnostic::CharacterNotRepresentable {
                        cluster: cluster.to_string(),
                        encoding: self.label.clone(),
                        replacement: self.alt_char.clone(),
                    });
                    validated
                        .text
                        .push_str(self.alt_char.as_deref().unwrap_or(cluster));
                    validated.warned = true;
                }
            }
        }

        Ok(validated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectedDiagnostics, SilentDiagnostics};

    fn encoding(label: &str) -> &'static Encoding {
        lookup_encoding(label).unwrap()
    }

    #[test]
    fn recognizes_common_labels() {
        for label in ["utf8", "UTF-8", "shift_jis", "sjis", "euc-jp", "gb2312", "big5"] {
            assert!(lookup_encoding(label).is_ok(), "{label}");
        }
        assert_eq!(encoding("shift_jis").name(), "Shift_JIS");
    }

    #[test]
    fn rejects_unknown_labels() {
        for label in ["invalid-encoding", "", "replacement"] {
            assert_eq!(
                lookup_encoding(label).unwrap_err(),
                ConvertError::UnsupportedEncoding {
                    encoding: label.to_string()
                }
            );
        }
    }

    #[test]
    fn shift_jis_repertoire() {
        let sjis = encoding("shift_jis");
        for cluster in ["あ", "漢", "字", "A", "1", "ｱ"] {
            assert!(is_encodable(cluster, sjis), "{cluster}");
        }
        for cluster in ["🙂", "𝕏", "葛\u{E0100}"] {
            assert!(!is_encodable(cluster, sjis), "{cluster}");
        }
    }

    #[test]
    fn lossy_round_trips_are_not_representable() {
        // YEN SIGN encodes to 0x5C, which decodes as REVERSE SOLIDUS.
        assert!(!is_encodable("\u{00A5}", encoding("shift_jis")));
    }

    #[test]
    fn other_encodings() {
        assert!(is_encodable("中", encoding("gb2312")));
        assert!(is_encodable("中", encoding("big5")));
        assert!(is_encodable("🙂", encoding("utf8")));
        assert!(is_encodable("葛\u{E0100}", encoding("utf8")));
    }

    #[test]
    fn warn_keeps_unrepresentable_clusters_without_alt_char() {
        let validator =
            RepertoireValidator::new("shift_jis", UndefinedCharacterPolicy::Warn, None).unwrap();
        let sink = CollectedDiagnostics::new();
        let validated = validator.validate("漢字🙂", &sink).unwrap();
        assert_eq!(validated, Converted::new("漢字🙂", true));
        assert_eq!(
            sink.take(),
            vec![Diagnostic::CharacterNotRepresentable {
                cluster: "🙂".to_string(),
                encoding: "shift_jis".to_string(),
                replacement: None,
            }]
        );
    }

    #[test]
    fn warn_substitutes_alt_char() {
        let validator = RepertoireValidator::new(
            "shift_jis",
            UndefinedCharacterPolicy::Warn,
            Some("?".to_string()),
        )
        .unwrap();
        let validated = validator.validate("漢🙂字𝕏", &SilentDiagnostics).unwrap();
        assert_eq!(validated, Converted::new("漢?字?", true));
    }

    #[test]
    fn whole_cluster_is_replaced() {
        let validator = RepertoireValidator::new(
            "shift_jis",
            UndefinedCharacterPolicy::Warn,
            Some("〓".to_string()),
        )
        .unwrap();
        let validated = validator
            .validate("👨\u{200D}👩\u{200D}👧あ", &SilentDiagnostics)
            .unwrap();
        assert_eq!(validated.text, "〓あ");
    }

    #[test]
    fn error_policy_fails_on_first_unrepresentable_cluster() {
        let validator =
            RepertoireValidator::new("shift_jis", UndefinedCharacterPolicy::Error, None).unwrap();
        let err = validator.validate("漢字🙂𝕏", &SilentDiagnostics).unwrap_err();
        assert_eq!(
            err,
            ConvertError::CharacterNotRepresentable {
                cluster: "🙂".to_string(),
                encoding: "shift_jis".to_string(),
            }
        );
        assert!(err.to_string().contains("shift_jis"));
    }

    #[test]
    fn representable_text_passes_unflagged() {
        let validator =
            RepertoireValidator::new("shift_jis", UndefinedCharacterPolicy::Error, None).unwrap();
        assert_eq!(
            validator.validate("漢字テスト", &SilentDiagnostics).unwrap(),
            Converted::new("漢字テスト", false)
        );
    }

    #[test]
    fn unknown_encoding_fails_before_validation() {
        let validation = CharacterSetValidation::new("invalid-encoding", UndefinedCharacterPolicy::Warn);
        assert!(matches!(
            RepertoireValidator::from_config(&validation),
            Err(ConvertError::UnsupportedEncoding { .. })
        ));
    }
}
