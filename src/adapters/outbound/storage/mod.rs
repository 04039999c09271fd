// Infrastructure error types
pub mod error;

// Storage implementations
pub mod apache_object_store_adapter;

// Provider-specific client construction
pub mod s3;

// Re-export key types
pub use apache_object_store_adapter::ApacheObjectStoreAdapter;
pub use error::StoreError;
pub use s3::{PLACEHOLDER_REGION, create_s3_store};
