use thiserror::Error as ThisError;

use crate::domain::errors::GatewayError;

/// Failures raised by the object store infrastructure
#[derive(ThisError, Debug)]
pub enum StoreError {
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("Failed to build object store client: {0}")]
    Client(String),
}

impl StoreError {
    /// Classify the failure for the gateway, tagging it with the operation
    pub fn into_gateway(self, operation: &str) -> GatewayError {
        match self {
            StoreError::Client(message) => GatewayError::configuration(message),
            StoreError::ObjectStore(err) => {
                let message = match &err {
                    object_store::Error::Unauthenticated { .. }
                    | object_store::Error::PermissionDenied { .. } => {
                        format!("store rejected our credentials: {err}")
                    }
                    object_store::Error::NotFound { .. } => {
                        format!("bucket or object not found: {err}")
                    }
                    _ => err.to_string(),
                };
                GatewayError::store_unavailable(operation, message)
            }
        }
    }
}

/// Convert domain GatewayError to HTTP status codes for API responses
impl From<&GatewayError> for http::StatusCode {
    fn from(err: &GatewayError) -> Self {
        match err {
            GatewayError::UnsupportedMediaType { .. } | GatewayError::Validation { .. } => {
                http::StatusCode::BAD_REQUEST
            }
            GatewayError::Configuration { .. } | GatewayError::StoreUnavailable { .. } => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_store_errors_become_store_unavailable() {
        let err = StoreError::from(object_store::Error::Generic {
            store: "S3",
            source: "connection reset".into(),
        })
        .into_gateway("list_images");

        match err {
            GatewayError::StoreUnavailable { operation, message } => {
                assert_eq!(operation, "list_images");
                assert!(message.contains("connection reset"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_client_errors_become_configuration_errors() {
        let err = StoreError::Client("bad endpoint".to_string()).into_gateway("startup");
        assert_eq!(err, GatewayError::configuration("bad endpoint"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            http::StatusCode::from(&GatewayError::UnsupportedMediaType {
                mime_type: "text/plain".to_string()
            }),
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            http::StatusCode::from(&GatewayError::configuration("missing bucket")),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            http::StatusCode::from(&GatewayError::store_unavailable("delete_image", "timeout")),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
