//! Error types for session-validation
//!
//! Only the internal/programming tier lives here. User-facing validation
//! failures are plain strings collected in a [`crate::pipeline::ErrorList`]
//! and never surface as a `ParameterError`.

use thiserror::Error;

/// Internal error: a parameter declaration, the engine configuration or the
/// requested session is self-contradictory.
#[derive(Debug, Error)]
pub enum ParameterError {
    /// Parameter shape / hook combination that can never work
    #[error("Illegal declaration for parameter {parameter}: {reason}")]
    Declaration { parameter: String, reason: String },

    /// Constraint bounds out of order
    #[error("Invalid constraints: {0}")]
    InvalidConstraints(String),

    /// Requested mode is inconsistent with the enable flags
    #[error("Mode cannot be {mode} because {reason}")]
    ModeConflict { mode: String, reason: String },

    /// Unknown mode name
    #[error("Unknown mode '{found}'. Valid modes: {}", valid.join(", "))]
    UnknownMode { found: String, valid: Vec<String> },

    /// Value holder read or written with the wrong value type
    #[error("Parameter {parameter} holds a {found} value where {expected} was expected")]
    ValueType {
        parameter: String,
        expected: String,
        found: String,
    },

    /// Default or Special functor invoked on a value that is already set
    #[error("{stage} functor invoked on parameter {parameter} which already has a value")]
    AlreadySet { parameter: String, stage: String },

    /// Anything else that indicates a bug in parameter registration
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Missing version field in YAML
    #[error("Missing 'version' field in configuration file. Add 'version: 1' to the top of your YAML file.")]
    MissingVersion,

    /// Unsupported version
    #[error("Unsupported configuration version {found}. Supported versions: {}", supported.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))]
    UnsupportedVersion { found: u32, supported: Vec<u32> },
}

impl ParameterError {
    /// Create a declaration error
    pub fn declaration(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Declaration {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a mode conflict error
    pub fn mode_conflict(mode: impl ToString, reason: impl Into<String>) -> Self {
        Self::ModeConflict {
            mode: mode.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias for engine operations
pub type ParameterResult<T> = Result<T, ParameterError>;
