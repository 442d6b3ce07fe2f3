//! Run configuration as read from the JSON configuration file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::options::{CharacterSetValidation, MissingCharacterPolicy, RecordErrorHandling};

/// Record terminator used by a delimited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineBreak {
    Crlf,
    #[default]
    Lf,
    Cr,
}

impl LineBreak {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crlf => "\r\n",
            Self::Lf => "\n",
            Self::Cr => "\r",
        }
    }
}

/// Dialect and location of one delimited file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    #[serde(default)]
    pub path: PathBuf,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default)]
    pub line_break: LineBreak,
    #[serde(default = "default_quote")]
    pub quote: String,
    #[serde(default)]
    pub has_header: bool,
    /// Quote every field on output (otherwise only where required).
    #[serde(default = "default_quoted")]
    pub quoted: bool,
}

fn default_encoding() -> String {
    "utf8".to_string()
}

fn default_quote() -> String {
    "\"".to_string()
}

fn default_quoted() -> bool {
    true
}

impl FileConfig {
    /// UTF-8, LF, double quote, no header.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            encoding: default_encoding(),
            line_break: LineBreak::default(),
            quote: default_quote(),
            has_header: false,
            quoted: default_quoted(),
        }
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    #[must_use]
    pub fn with_line_break(mut self, line_break: LineBreak) -> Self {
        self.line_break = line_break;
        self
    }

    #[must_use]
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    #[must_use]
    pub fn with_quoted(mut self, quoted: bool) -> Self {
        self.quoted = quoted;
        self
    }

    /// The quote character as a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidQuote`] unless `quote` is exactly one ASCII character.
    pub fn quote_byte(&self) -> Result<u8> {
        match self.quote.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(ConfigError::InvalidQuote {
                quote: self.quote.clone(),
            }),
        }
    }

    fn has_path(&self) -> bool {
        !self.path.as_os_str().is_empty()
    }
}

/// Settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionConfig {
    pub input: FileConfig,
    pub output: FileConfig,
    pub conversion_table: PathBuf,
    /// Zero-based column indices; signed so out-of-range values surface as warnings.
    pub target_columns: Vec<i64>,
    #[serde(default)]
    pub missing_character_handling: MissingCharacterPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_set_validation: Option<CharacterSetValidation>,
    #[serde(default)]
    pub record_error_handling: RecordErrorHandling,
}

impl ConversionConfig {
    /// The validation settings, if present and enabled.
    pub fn active_validation(&self) -> Option<&CharacterSetValidation> {
        self.character_set_validation
            .as_ref()
            .filter(|validation| validation.enabled)
    }

    /// Minimum column count a record needs to cover every target column.
    pub fn expected_columns(&self) -> usize {
        self.target_columns
            .iter()
            .filter_map(|&index| usize::try_from(index).ok())
            .max()
            .map_or(0, |max| max + 1)
    }

    pub fn conversion_table(&self) -> &Path {
        &self.conversion_table
    }
}

/// Log verbosity selectable from the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Console,
    #[default]
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub output: LogOutput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Replace the configured input/output paths with command-line values.
    #[must_use]
    pub fn with_overrides(mut self, input: Option<PathBuf>, output: Option<PathBuf>) -> Self {
        if let Some(path) = input {
            self.conversion.input.path = path;
        }
        if let Some(path) = output {
            self.conversion.output.path = path;
        }
        self
    }

    /// Check the settings that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<()> {
        let conversion = &self.conversion;
        if !conversion.input.has_path() {
            return Err(ConfigError::MissingInputPath);
        }
        if !conversion.output.has_path() {
            return Err(ConfigError::MissingOutputPath);
        }
        if conversion.conversion_table.as_os_str().is_empty() {
            return Err(ConfigError::MissingConversionTable);
        }
        if conversion.target_columns.is_empty() {
            return Err(ConfigError::NoTargetColumns);
        }
        if conversion.output.has_header && !conversion.input.has_header {
            return Err(ConfigError::HeaderMismatch);
        }
        conversion.input.quote_byte()?;
        conversion.output.quote_byte()?;
        if let Some(validation) = conversion.active_validation() {
            if validation.target_encoding.trim().is_empty() {
                return Err(ConfigError::MissingTargetEncoding);
            }
            if validation.alt_char.as_deref() == Some("") {
                return Err(ConfigError::EmptyAltChar);
            }
        }
        Ok(())
    }
}
