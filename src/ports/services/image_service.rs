use async_trait::async_trait;

use crate::domain::{
    errors::GatewayResult,
    models::{ImageItem, Page, PageRequest, UploadImageRequest, UploadedImage},
    value_objects::ObjectKey,
};

/// Port for image gallery operations
/// This trait defines the business logic behind the `/images` endpoints
#[async_trait]
pub trait ImageService: Send + Sync + 'static {
    /// List stored images, newest first, one page at a time
    async fn list_images(&self, request: PageRequest) -> GatewayResult<Page<ImageItem>>;

    /// Validate and store a new image under a generated key
    async fn upload_image(&self, request: UploadImageRequest) -> GatewayResult<UploadedImage>;

    /// Delete an image by its percent-encoded key, returning the decoded key
    async fn delete_image(&self, encoded_key: &str) -> GatewayResult<ObjectKey>;
}
