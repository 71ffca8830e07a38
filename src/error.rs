/// Unified error type for the Q&A engine
/// Structured variants for the failure categories of the question pipeline
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum EngineError {
    /// A question parameter is out of range (windows and limits must be positive)
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// A relation needed to resolve query bounds has no rows
    #[error("No data available: {message}")]
    NoDataAvailable { message: String },

    /// Execution errors: missing columns, type mismatches in the store
    #[error("Execution error: {message}")]
    Execution {
        message: String,
        context: Option<String>,
    },

    /// Ingestion errors: unreadable files, missing required columns
    #[error("Ingestion error: {message}")]
    Ingestion {
        message: String,
        path: Option<String>,
    },

    /// Internal errors: should never happen, indicates a bug
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EngineError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::NoDataAvailable {
            message: message.into(),
        }
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
            context: None,
        }
    }

    pub fn execution_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    pub fn ingestion(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Ingestion {
            message: message.into(),
            path,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Recoverable conditions become informational answers instead of
    /// escaping the per-question pipeline as errors.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. } | Self::NoDataAvailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_classification() {
        assert!(EngineError::no_data("x").is_recoverable());
        assert!(EngineError::invalid_parameter("x").is_recoverable());
        assert!(!EngineError::execution("x").is_recoverable());
        assert!(!EngineError::internal("x").is_recoverable());
    }

    #[test]
    fn display_includes_category() {
        let err = EngineError::no_data("no rainfall rows loaded");
        assert_eq!(err.to_string(), "No data available: no rainfall rows loaded");
    }
}
