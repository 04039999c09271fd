use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{errors::GatewayResult, models::StoredObject, value_objects::ObjectKey};

/// Port for the blob store holding the images.
/// This abstracts the actual backend (MinIO, S3, in-memory)
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// List at most `max_results` objects of the bucket in a single pass
    async fn list_objects(&self, max_results: usize) -> GatewayResult<Vec<StoredObject>>;

    /// Store object data under `key` with the given content type
    async fn put_object(&self, key: &ObjectKey, data: Bytes, content_type: &str)
        -> GatewayResult<()>;

    /// Delete object data. Deleting a missing key succeeds.
    async fn delete_object(&self, key: &ObjectKey) -> GatewayResult<()>;
}
