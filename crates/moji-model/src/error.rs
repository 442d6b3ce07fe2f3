use thiserror::Error;

/// Problems found while validating a run configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("input file path is not set (configure conversion.input.path or pass --input)")]
    MissingInputPath,

    #[error("output file path is not set (configure conversion.output.path or pass --output)")]
    MissingOutputPath,

    #[error("conversion table path is not set")]
    MissingConversionTable,

    #[error("no target columns configured")]
    NoTargetColumns,

    #[error("output header requested but the input file has no header")]
    HeaderMismatch,

    #[error("quote must be a single ASCII character, got {quote:?}")]
    InvalidQuote { quote: String },

    #[error("character set validation is enabled without a target encoding")]
    MissingTargetEncoding,

    #[error("altChar must not be empty")]
    EmptyAltChar,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
