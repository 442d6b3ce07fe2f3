//! Data model shared by the mojimap crates.
//!
//! - **options**: per-run policies for missing and unrepresentable characters
//! - **config**: file dialects, conversion settings and logging settings
//! - **error**: configuration validation errors

pub mod config;
pub mod error;
pub mod options;

pub use config::{AppConfig, ConversionConfig, FileConfig, LineBreak, LogLevel, LogOutput, LoggingConfig};
pub use error::{ConfigError, Result};
pub use options::{
    CharacterSetValidation, MissingCharacterPolicy, RecordErrorHandling, UndefinedCharacterPolicy,
};
