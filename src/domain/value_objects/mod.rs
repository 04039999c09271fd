mod image_mime_type;
mod object_key;

pub use image_mime_type::ImageMimeType;
pub use object_key::{MAX_OBJECT_KEY_LEN, ObjectKey};
