pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use services::ImageService;
pub use storage::ObjectStore;
