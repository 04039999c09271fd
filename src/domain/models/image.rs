use chrono::{DateTime, Utc};

use crate::domain::value_objects::ObjectKey;

/// Key suffixes recognised as images when listing the bucket
pub const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// An object as reported by the store listing
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub key: ObjectKey,
    pub size_bytes: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// A stored image enriched with its public URL
#[derive(Debug, Clone, PartialEq)]
pub struct ImageItem {
    pub key: String,
    pub url: String,
    pub size: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Request to store a new image
#[derive(Debug, Clone)]
pub struct UploadImageRequest {
    pub data: bytes::Bytes,
    pub declared_mime_type: String,
    pub original_filename: Option<String>,
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub key: ObjectKey,
    pub url: String,
}

/// Whether the key ends with a known image extension, ignoring case
pub fn is_image_key(key: &str) -> bool {
    let lowered = key.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}

/// Keep only objects whose key looks like an image, preserving order
pub fn filter_images(objects: Vec<StoredObject>) -> Vec<StoredObject> {
    objects
        .into_iter()
        .filter(|obj| is_image_key(obj.key.as_str()))
        .collect()
}

/// Stable sort, newest first. Objects without a timestamp sort as the epoch.
pub fn sort_newest_first(objects: &mut [StoredObject]) {
    objects.sort_by_key(|obj| std::cmp::Reverse(obj.last_modified.unwrap_or(DateTime::UNIX_EPOCH)));
}

/// Extension (with the leading dot) for a freshly generated key.
///
/// Taken from the original filename's final path component; `.jpg` when the
/// filename is absent or has no extension.
pub fn upload_extension(original_filename: Option<&str>) -> String {
    let file_name = original_filename
        .map(|name| name.rsplit(['/', '\\']).next().unwrap_or(name))
        .unwrap_or_default();

    match file_name.rfind('.') {
        // A leading dot marks a hidden file, not an extension
        Some(idx) if idx > 0 && idx + 1 < file_name.len() => file_name[idx..].to_string(),
        _ => ".jpg".to_string(),
    }
}
