use crate::domain::errors::ValidationError;

/// Errors surfaced by the image gateway operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Deployment misconfiguration; never retried
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Declared MIME type is not an accepted image type
    #[error("Unsupported media type '{mime_type}': only JPEG, PNG, GIF and WEBP are allowed")]
    UnsupportedMediaType { mime_type: String },

    /// The client must correct its input
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The object store failed, timed out or rejected our credentials
    #[error("Object store unavailable during {operation}: {message}")]
    StoreUnavailable { operation: String, message: String },
}

impl GatewayError {
    pub fn configuration(message: impl Into<String>) -> Self {
        GatewayError::Configuration {
            message: message.into(),
        }
    }

    pub fn store_unavailable(operation: &str, message: impl Into<String>) -> Self {
        GatewayError::StoreUnavailable {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

impl From<ValidationError> for GatewayError {
    fn from(err: ValidationError) -> Self {
        GatewayError::Validation {
            message: err.to_string(),
        }
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
