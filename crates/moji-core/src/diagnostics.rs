//! Diagnostics emitted by the conversion engine.
//!
//! The engine never logs on its own. Table loading, field conversion and
//! record transformation take a `&dyn Diagnostics` and report through it,
//! so callers choose between forwarding to `tracing`, capturing for
//! inspection, or discarding.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::{Level, debug, info, warn};

use crate::error::{InvalidRowReason, describe_cluster};

/// A single event reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A conversion table row was skipped (1-based row number).
    InvalidTableRow { row: usize, reason: InvalidRowReason },
    /// Table construction finished.
    TableLoaded { valid: usize, rejected: usize },
    /// A cluster had no rule and was kept under the `warn` policy.
    MissingCharacter { cluster: String },
    /// A cluster failed the round trip under the `warn` policy.
    CharacterNotRepresentable {
        cluster: String,
        encoding: String,
        replacement: Option<String>,
    },
    /// A target column does not exist in the record.
    ColumnOutOfRange { column: i64, field_count: usize },
    /// A target field changed.
    FieldConverted {
        column: usize,
        before: String,
        after: String,
    },
}

impl Diagnostic {
    pub fn level(&self) -> Level {
        match self {
            Self::InvalidTableRow { .. }
            | Self::MissingCharacter { .. }
            | Self::CharacterNotRepresentable { .. }
            | Self::ColumnOutOfRange { .. } => Level::WARN,
            Self::TableLoaded { .. } => Level::INFO,
            Self::FieldConverted { .. } => Level::DEBUG,
        }
    }

    /// True for diagnostics that set the warned flag of a conversion.
    pub fn is_warning(&self) -> bool {
        self.level() == Level::WARN
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTableRow { row, reason } => {
                write!(f, "conversion table row {row} skipped: {reason}")
            }
            Self::TableLoaded { valid, rejected } => write!(
                f,
                "conversion table loaded: {valid} valid rules, {rejected} rejected rows"
            ),
            Self::MissingCharacter { cluster } => write!(
                f,
                "character {} not found in conversion table, kept unchanged",
                describe_cluster(cluster)
            ),
            Self::CharacterNotRepresentable {
                cluster,
                encoding,
                replacement,
            } => {
                write!(
                    f,
                    "character {} is not representable in {encoding}",
                    describe_cluster(cluster)
                )?;
                match replacement {
                    Some(alt) => write!(f, ", replaced with {alt:?}"),
                    None => f.write_str(", kept unchanged"),
                }
            }
            Self::ColumnOutOfRange {
                column,
                field_count,
            } => write!(
                f,
                "column index {column} is out of range (record has {field_count} fields)"
            ),
            Self::FieldConverted {
                column,
                before,
                after,
            } => write!(f, "column {column}: {before:?} -> {after:?}"),
        }
    }
}

/// Receiver for engine diagnostics.
///
/// Implementations must be shareable across threads so one sink can serve
/// records converted in parallel.
pub trait Diagnostics: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);

    /// Lets callers skip building diagnostics nobody will see.
    fn enabled(&self, _level: Level) -> bool {
        true
    }
}

/// Forwards diagnostics to `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::InvalidTableRow { row, reason } => {
                warn!(row, reason = %reason, "skipping invalid conversion table row");
            }
            Diagnostic::TableLoaded { valid, rejected } => {
                info!(valid, rejected, "conversion table loaded");
            }
            Diagnostic::MissingCharacter { .. }
            | Diagnostic::CharacterNotRepresentable { .. }
            | Diagnostic::ColumnOutOfRange { .. } => {
                warn!("{diagnostic}");
            }
            Diagnostic::FieldConverted {
                column,
                before,
                after,
            } => {
                debug!(column, before = %before, after = %after, "field converted");
            }
        }
    }

    fn enabled(&self, level: Level) -> bool {
        if level == Level::ERROR {
            tracing::enabled!(Level::ERROR)
        } else if level == Level::WARN {
            tracing::enabled!(Level::WARN)
        } else if level == Level::INFO {
            tracing::enabled!(Level::INFO)
        } else if level == Level::DEBUG {
            tracing::enabled!(Level::DEBUG)
        } else {
            tracing::enabled!(Level::TRACE)
        }
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything reported so far.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain everything reported so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn warning_count(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|diagnostic| diagnostic.is_warning())
            .count()
    }
}

impl Diagnostics for CollectedDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentDiagnostics;

impl Diagnostics for SilentDiagnostics {
    fn report(&self, _diagnostic: Diagnostic) {}

    fn enabled(&self, _level: Level) -> bool {
        false
    }
}
