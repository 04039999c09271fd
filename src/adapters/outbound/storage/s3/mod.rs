//! S3-compatible client factory using the object_store crate
//!
//! The target is a self-hosted store (MinIO), so requests are path-style and
//! the region is a placeholder the store does not enforce.

use object_store::{ObjectStore as ObjectStoreBackend, aws::AmazonS3Builder};
use std::sync::Arc;
use tracing::info;

use crate::{
    adapters::outbound::storage::error::StoreError,
    domain::{errors::GatewayResult, models::StoreConfig},
};

/// Region sent with every request; self-hosted stores ignore it
pub const PLACEHOLDER_REGION: &str = "ap-northeast-1";

/// Create an S3 client bound to the configured endpoint and bucket.
///
/// The configuration is validated first, so a misconfigured deployment fails
/// here rather than on the first request.
pub fn create_s3_store(config: &StoreConfig) -> GatewayResult<Arc<dyn ObjectStoreBackend>> {
    config.validate()?;

    let store = AmazonS3Builder::new()
        .with_endpoint(&config.endpoint)
        .with_bucket_name(&config.bucket)
        .with_region(PLACEHOLDER_REGION)
        .with_access_key_id(&config.access_key)
        .with_secret_access_key(&config.secret_key)
        .with_virtual_hosted_style_request(false)
        .with_allow_http(config.endpoint.starts_with("http://"))
        .build()
        .map_err(|e| StoreError::Client(e.to_string()).into_gateway("create_s3_store"))?;

    info!(
        endpoint = %config.endpoint,
        bucket = %config.bucket,
        "Object store client ready"
    );
    Ok(Arc::new(store))
}
