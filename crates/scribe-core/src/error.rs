//! Error types for Scribe Core
//!
//! Extraction itself never fails: sparse or unparsable transcripts degrade to
//! clarifications. Errors cover the edges of the pipeline:
//! - Configuration loading
//! - Re-ingesting a hand-edited structured document
//! - Driving the review checkpoint
//! - Submitting tickets to a tracker

use crate::checkpoint::ReviewState;
use scribe_patterns::PatternError;

/// Main Scribe error type
#[derive(Debug, thiserror::Error)]
pub enum ScribeError {
    /// Pattern library could not be built
    #[error("pattern library error: {0}")]
    Pattern(#[from] PatternError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Structured document failed validation
    #[error("schema violation: {0}")]
    Schema(#[from] SchemaError),

    /// Checkpoint misuse
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// Ticket submission failed as a whole
    #[error("submission error: {0}")]
    Submission(#[from] SubmissionError),

    /// Serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScribeError {
    /// Whether a human has to act before the run can continue
    #[inline]
    #[must_use]
    pub fn requires_human(&self) -> bool {
        matches!(self, Self::Schema(_) | Self::Checkpoint(_))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config '{path}': {source}")]
    Io {
        /// Config path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML or invalid values
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be rendered
    #[error("cannot render config: {0}")]
    Render(#[from] toml::ser::Error),

    /// Priority table names an unknown ticket type
    #[error("unknown ticket type '{0}' in priority_defaults")]
    UnknownTicketType(String),
}

/// Structural problems in a re-ingested structured document
///
/// Every variant carries the JSON path of the offending value, e.g.
/// `epics[0].tickets[2].priority`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Not valid JSON
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Syntax {
        /// Line of the error
        line: usize,
        /// Column of the error
        column: usize,
        /// Parser message
        message: String,
    },

    /// Required key absent
    #[error("missing required key '{path}'")]
    MissingKey {
        /// JSON path of the missing key
        path: String,
    },

    /// Value of the wrong JSON type
    #[error("'{path}' should be {expected}, found {found}")]
    WrongType {
        /// JSON path
        path: String,
        /// Expected JSON type
        expected: &'static str,
        /// Actual JSON type
        found: &'static str,
    },

    /// Value of the right type but not allowed
    #[error("'{path}' has invalid value {value}: expected {expected}")]
    InvalidValue {
        /// JSON path
        path: String,
        /// Offending value
        value: String,
        /// Allowed values
        expected: String,
    },
}

impl SchemaError {
    /// JSON path of the problem, empty for syntax errors
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Syntax { .. } => "",
            Self::MissingKey { path }
            | Self::WrongType { path, .. }
            | Self::InvalidValue { path, .. } => path,
        }
    }
}

/// Review checkpoint errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckpointError {
    /// Reply is not one of the accepted tokens
    #[error("unrecognised decision '{0}': expected yes, no or edit")]
    UnknownDecision(String),

    /// Transition not allowed from the current state
    #[error("illegal transition {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current state
        from: ReviewState,
        /// Requested state
        to: ReviewState,
    },

    /// Session holds no document in its current state
    #[error("no document available in state {0:?}")]
    NoDocument(ReviewState),
}

/// Ticket tracker errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// Tracker refused the ticket
    #[error("tracker rejected ticket: {0}")]
    Rejected(String),

    /// Tracker could not be reached
    #[error("tracker unavailable: {0}")]
    Unavailable(String),
}

/// Result type for Scribe operations
pub type Result<T> = std::result::Result<T, ScribeError>;
