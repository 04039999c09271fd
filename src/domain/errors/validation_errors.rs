/// Validation errors for domain value objects
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    // ObjectKey validation errors
    #[error("Object key cannot be empty")]
    EmptyObjectKey,

    #[error("Object key too long: {actual} bytes (max: {max})")]
    ObjectKeyTooLong { actual: usize, max: usize },

    #[error("Invalid character in object key: {0:?}")]
    InvalidObjectKeyCharacter(char),

    #[error("Object key is not valid percent-encoded UTF-8: {0}")]
    UndecodableObjectKey(String),

    #[error("Object key cannot be used as a store path: {0}")]
    UnstorableObjectKey(String),

    // Paging validation errors
    #[error("Page number must be at least 1, got {0}")]
    InvalidPageNumber(usize),

    #[error("Page size must be at least 1, got {0}")]
    InvalidPageSize(usize),

    // Upload validation errors
    #[error("Missing multipart field '{0}'")]
    MissingField(String),
}
