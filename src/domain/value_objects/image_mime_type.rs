use std::str::FromStr;

use crate::domain::errors::GatewayError;

/// An image content type accepted for upload.
///
/// Parsed from the MIME type the client declares; the bytes themselves are
/// never inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageMimeType {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageMimeType {
    pub const ALL: [ImageMimeType; 4] = [
        ImageMimeType::Jpeg,
        ImageMimeType::Png,
        ImageMimeType::Gif,
        ImageMimeType::Webp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMimeType::Jpeg => "image/jpeg",
            ImageMimeType::Png => "image/png",
            ImageMimeType::Gif => "image/gif",
            ImageMimeType::Webp => "image/webp",
        }
    }
}

impl FromStr for ImageMimeType {
    type Err = GatewayError;

    /// Parameters such as `; charset=...` are ignored and the comparison is
    /// case-insensitive.
    fn from_str(declared: &str) -> Result<Self, Self::Err> {
        let essence = declared.split(';').next().unwrap_or_default().trim();

        Self::ALL
            .into_iter()
            .find(|mime| mime.as_str().eq_ignore_ascii_case(essence))
            .ok_or_else(|| GatewayError::UnsupportedMediaType {
                mime_type: declared.to_string(),
            })
    }
}

impl std::fmt::Display for ImageMimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_image_types() {
        assert_eq!("image/jpeg".parse::<ImageMimeType>().unwrap(), ImageMimeType::Jpeg);
        assert_eq!("image/png".parse::<ImageMimeType>().unwrap(), ImageMimeType::Png);
        assert_eq!("image/gif".parse::<ImageMimeType>().unwrap(), ImageMimeType::Gif);
        assert_eq!("image/webp".parse::<ImageMimeType>().unwrap(), ImageMimeType::Webp);
        assert_eq!("IMAGE/PNG".parse::<ImageMimeType>().unwrap(), ImageMimeType::Png);
    }

    #[test]
    fn test_rejects_other_types() {
        for declared in ["text/plain", "image/svg+xml", "application/octet-stream", ""] {
            let err = declared.parse::<ImageMimeType>().unwrap_err();
            assert_eq!(
                err,
                GatewayError::UnsupportedMediaType {
                    mime_type: declared.to_string()
                }
            );
        }
    }
}
