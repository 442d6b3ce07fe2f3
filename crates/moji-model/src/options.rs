//! Policies controlling how a conversion run treats problem characters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What to do with a grapheme cluster that has no conversion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingCharacterPolicy {
    /// Abort the field with a `MissingCharacter` failure.
    Error,
    /// Keep the cluster unchanged and raise the warning flag.
    Warn,
    /// Keep the cluster unchanged silently.
    #[default]
    Skip,
}

impl MissingCharacterPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for MissingCharacterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with a cluster the target encoding cannot represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UndefinedCharacterPolicy {
    /// Abort the field with a `CharacterNotRepresentable` failure.
    Error,
    /// Substitute `altChar` when configured (otherwise keep the cluster) and warn.
    #[default]
    Warn,
}

impl UndefinedCharacterPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
        }
    }
}

impl fmt::Display for UndefinedCharacterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the run driver reacts when a record fails to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordErrorHandling {
    /// Stop the run and report the failing record.
    #[default]
    Abort,
    /// Emit the unmodified input record and flag the run as warned.
    KeepOriginal,
}

/// Repertoire validation applied to converted text.
///
/// Validation always runs on the substituted output, never on the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSetValidation {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Encoding label, e.g. `shift_jis`, `big5`, `gb2312`, `utf8`.
    pub target_encoding: String,
    #[serde(default)]
    pub undefined_character_handling: UndefinedCharacterPolicy,
    /// Replacement emitted for unrepresentable clusters under `warn`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_char: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl CharacterSetValidation {
    pub fn new(target_encoding: impl Into<String>, handling: UndefinedCharacterPolicy) -> Self {
        Self {
            enabled: true,
            target_encoding: target_encoding.into(),
            undefined_character_handling: handling,
            alt_char: None,
        }
    }

    #[must_use]
    pub fn with_alt_char(mut self, alt_char: impl Into<String>) -> Self {
        self.alt_char = Some(alt_char.into());
        self
    }
}
