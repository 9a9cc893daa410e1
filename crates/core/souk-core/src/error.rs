//! Error types for Souk

use thiserror::Error;

/// Main error type for Souk operations
#[derive(Debug, Error)]
pub enum SoukError {
    /// Embedding subsystem missing or failed
    #[error("Embedder unavailable: {0}")]
    EmbedderUnavailable(String),

    /// Product catalog missing or unreadable
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Writing updated catalog state failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),

    /// Missing required field in a stored record
    #[error("Missing required field '{field}' in {context}")]
    MissingField {
        /// Field name
        field: String,
        /// Context where the field is missing
        context: String,
    },
}

/// Convenient Result type using SoukError
pub type Result<T> = std::result::Result<T, SoukError>;

impl SoukError {
    /// Create an embedder-unavailable error
    pub fn embedder(msg: impl Into<String>) -> Self {
        SoukError::EmbedderUnavailable(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        SoukError::Catalog(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        SoukError::Persistence(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        SoukError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        SoukError::Validation(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        SoukError::Other(msg.into())
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        SoukError::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SoukError::embedder("model not loaded");
        assert_eq!(err.to_string(), "Embedder unavailable: model not loaded");

        let err = SoukError::catalog("products.json not found");
        assert_eq!(err.to_string(), "Catalog error: products.json not found");
    }

    #[test]
    fn test_missing_field_display() {
        let err = SoukError::missing_field("content", "stored conversation turn");
        assert_eq!(
            err.to_string(),
            "Missing required field 'content' in stored conversation turn"
        );
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(returns_result().unwrap(), 42);
    }
}
