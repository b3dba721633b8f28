//! Centralized error handling for the pipeline.
//!
//! Provides `AppError` with variants for every error category a stage can
//! produce, implementing standard error traits plus a structured Serde
//! representation for logging/reporting.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Crate-wide error type.
///
/// Each variant represents a distinct error category so callers can
/// classify and react to failures consistently across stages.
///
/// # Serialization
///
/// ```json
/// { "error_type": "variant_name", "message": "details" }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing-field input records (P3 entry).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tokenizer/encoder initialization failure (fatal for the process).
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Vector index or metadata sidecar I/O failure (P7).
    #[error("Index error: {0}")]
    Index(String),

    /// Graph store read/write failure (P8).
    #[error("Graph store error: {0}")]
    GraphStore(String),

    /// LLM invocation failure (P11).
    #[error("LLM error: {0}")]
    Llm(String),

    /// File storage operations (read, write, delete, path resolution).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Input validation failures (invalid data, constraint violations).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found (case, document, chunk).
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Returns the error type name for serialization.
    fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Tokenizer(_) => "Tokenizer",
            AppError::Index(_) => "Index",
            AppError::GraphStore(_) => "GraphStore",
            AppError::Llm(_) => "Llm",
            AppError::Storage(_) => "Storage",
            AppError::Validation(_) => "Validation",
            AppError::NotFound(_) => "NotFound",
        }
    }

    /// Returns the error message content.
    fn message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Tokenizer(msg) => msg.clone(),
            AppError::Index(msg) => msg.clone(),
            AppError::GraphStore(msg) => msg.clone(),
            AppError::Llm(msg) => msg.clone(),
            AppError::Storage(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("AppError", 2)?;
        state.serialize_field("error_type", self.error_type())?;
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}

// ============================================================================
// From implementations for automatic error conversion
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => {
                AppError::NotFound(format!("File not found: {}", err))
            }
            std::io::ErrorKind::InvalidInput | std::io::ErrorKind::InvalidData => {
                AppError::Validation(format!("Invalid data: {}", err))
            }
            _ => AppError::Storage(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Llm(format!("Request timeout: {}", err))
        } else if err.is_connect() {
            AppError::Llm(format!("Connection failed: {}", err))
        } else if err.is_status() {
            if let Some(status) = err.status() {
                match status.as_u16() {
                    401 | 403 => AppError::Llm(format!("API authentication failed: {}", err)),
                    404 => AppError::NotFound(format!("API endpoint not found: {}", err)),
                    429 => AppError::Llm("Rate limit exceeded".to_string()),
                    500..=599 => AppError::Llm(format!("API server error: {}", err)),
                    _ => AppError::Llm(format!("API error ({}): {}", status, err)),
                }
            } else {
                AppError::Llm(err.to_string())
            }
        } else if err.is_decode() {
            AppError::Llm(format!("Failed to decode response: {}", err))
        } else {
            AppError::Llm(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => {
                AppError::Storage(format!("JSON I/O error: {}", err))
            }
            serde_json::error::Category::Syntax => {
                AppError::Validation(format!("Invalid JSON syntax: {}", err))
            }
            serde_json::error::Category::Data => {
                AppError::Validation(format!("Invalid JSON data: {}", err))
            }
            serde_json::error::Category::Eof => {
                AppError::Validation(format!("Unexpected end of JSON: {}", err))
            }
        }
    }
}

// ============================================================================
// Convenience type alias
// ============================================================================

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Storage("disk full".to_string());
        assert_eq!(err.to_string(), "Storage error: disk full");
    }

    #[test]
    fn test_error_serialization() {
        let err = AppError::GraphStore("merge failed".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"error_type\":\"GraphStore\""));
        assert!(json.contains("\"message\":\"merge failed\""));
    }

    #[test]
    fn test_error_type_classification() {
        assert_eq!(AppError::InvalidInput("x".into()).error_type(), "InvalidInput");
        assert_eq!(AppError::Tokenizer("x".into()).error_type(), "Tokenizer");
        assert_eq!(AppError::Index("x".into()).error_type(), "Index");
        assert_eq!(AppError::GraphStore("x".into()).error_type(), "GraphStore");
        assert_eq!(AppError::Llm("x".into()).error_type(), "Llm");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::NotFound(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(app_err, AppError::Validation(_)));
    }
}
