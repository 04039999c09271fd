use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::{AuthError, GatewayError},
    models::{ImageItem, Page, PageRequest},
};

/// Query string of `GET /images`.
///
/// Values are kept as strings so that malformed numbers fall back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListImagesQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListImagesQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

/// DTO for one listed image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageItemDto {
    pub key: String,
    pub url: String,
    pub size: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// DTO for the image list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListImagesResponseDto {
    pub images: Vec<ImageItemDto>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

/// DTO for a successful upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageResponseDto {
    pub success: bool,
    pub url: String,
    pub file_name: String,
}

/// DTO for a successful deletion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteImageResponseDto {
    pub success: bool,
    pub message: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponseDto {
    pub status: String,
}

/// DTO for error responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub error: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

// Conversion implementations

impl From<ImageItem> for ImageItemDto {
    fn from(item: ImageItem) -> Self {
        ImageItemDto {
            key: item.key,
            url: item.url,
            size: item.size,
            last_modified: item.last_modified,
        }
    }
}

impl From<Page<ImageItem>> for ListImagesResponseDto {
    fn from(page: Page<ImageItem>) -> Self {
        ListImagesResponseDto {
            images: page.items.into_iter().map(ImageItemDto::from).collect(),
            total: page.total_count,
            page: page.page_number,
            limit: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

// Error response helpers

impl ErrorResponseDto {
    pub fn new(error: &str, message: &str) -> Self {
        ErrorResponseDto {
            error: error.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Client errors carry their own message; server-side failures are
    /// reported generically and only logged in detail.
    pub fn from_gateway_error(error: &GatewayError) -> Self {
        match error {
            GatewayError::UnsupportedMediaType { .. } => {
                Self::new("UnsupportedMediaType", &error.to_string())
            }
            GatewayError::Validation { .. } => Self::bad_request(&error.to_string()),
            GatewayError::Configuration { .. } => Self::internal_error(
                "Image storage is not configured correctly",
            ),
            GatewayError::StoreUnavailable { .. } => {
                Self::internal_error("The image store is currently unavailable")
            }
        }
    }

    pub fn from_auth_error(error: &AuthError) -> Self {
        match error {
            AuthError::MissingToken => Self::new("Unauthorized", "Authentication required"),
            AuthError::Encoding(_) => Self::internal_error("Failed to issue token"),
            _ => Self::new("Unauthorized", "Authentication failed"),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}
