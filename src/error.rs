// ⚠️ Error Types - one enum for the whole engine
// Validation failures surface immediately, nothing is silently defaulted

use thiserror::Error;

/// Everything the engine can refuse to do.
#[derive(Debug, Error)]
pub enum NumerologyError {
    /// Malformed identity (empty name, bad birth date)
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Requested system is not registered
    #[error("unknown numerology system: {0}")]
    UnknownSystem(String),

    /// Custom system definition rejected at registration
    #[error("invalid numerology system '{name}': {message}")]
    InvalidSystem { name: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl NumerologyError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        NumerologyError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// True for errors caused by caller input rather than configuration
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            NumerologyError::Validation { .. } | NumerologyError::UnknownSystem(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NumerologyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = NumerologyError::validation("full_name", "must not be empty");
        assert_eq!(err.to_string(), "invalid full_name: must not be empty");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_config_errors_are_not_client_errors() {
        let err = NumerologyError::Config("ttl must be positive".to_string());
        assert!(!err.is_client_error());
        assert!(NumerologyError::UnknownSystem("vedic".to_string()).is_client_error());
    }
}
