//! Error types shared across trimview crates.

use std::path::PathBuf;

/// Top-level error type for trimview operations.
///
/// Input-contract and configuration errors are fatal to the component
/// instance that reported them; recovery means building a fresh one.
#[derive(Debug, thiserror::Error)]
pub enum TrimError {
    /// The host delivered a pointer stream that breaks the event contract.
    #[error("Input contract violation: {message}")]
    InputContract { message: String },

    /// A component was configured with values it cannot operate on.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The component already failed on an earlier event and refuses further input.
    #[error("Component is poisoned by an earlier failure: {message}")]
    Poisoned { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using TrimError.
pub type TrimResult<T> = Result<T, TrimError>;

impl TrimError {
    pub fn input_contract(msg: impl Into<String>) -> Self {
        Self::InputContract {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn poisoned(msg: impl Into<String>) -> Self {
        Self::Poisoned {
            message: msg.into(),
        }
    }

    /// Whether this error leaves the reporting component unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InputContract { .. } | Self::Config { .. } | Self::Poisoned { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_message() {
        let err = TrimError::input_contract("empty contact set");
        assert_eq!(
            err.to_string(),
            "Input contract violation: empty contact set"
        );
    }

    #[test]
    fn test_fatal_classification() {
        assert!(TrimError::config("min > max").is_fatal());
        assert!(TrimError::poisoned("earlier").is_fatal());
        let io = TrimError::from(std::io::Error::other("disk"));
        assert!(!io.is_fatal());
    }
}
