use crate::domain::errors::ValidationError;

/// Maximum key length accepted by S3-compatible stores
pub const MAX_OBJECT_KEY_LEN: usize = 1024;

/// A validated object key (path) in the image bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Create a new ObjectKey with validation
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyObjectKey);
        }

        if value.len() > MAX_OBJECT_KEY_LEN {
            return Err(ValidationError::ObjectKeyTooLong {
                actual: value.len(),
                max: MAX_OBJECT_KEY_LEN,
            });
        }

        if let Some(c) = value.chars().find(|c| c.is_control()) {
            return Err(ValidationError::InvalidObjectKeyCharacter(c));
        }

        Ok(Self(value))
    }

    /// Decode a percent-encoded key taken from a request path, then validate it.
    ///
    /// The key is decoded exactly once, so `a%2520b` becomes `a%20b`.
    pub fn from_encoded(raw: &str) -> Result<Self, ValidationError> {
        let decoded = urlencoding::decode(raw)
            .map_err(|e| ValidationError::UndecodableObjectKey(e.to_string()))?;
        Self::new(decoded.into_owned())
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
