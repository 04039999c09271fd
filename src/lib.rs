pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core business entities and value objects
pub use domain::{
    AuthError,
    // Errors
    GatewayError,
    // Models
    ImageItem,
    // Value objects
    ImageMimeType,
    ObjectKey,
    Page,
    PageRequest,
    StoreConfig,
    StoredObject,
    UploadImageRequest,
    UploadedImage,
    UrlStyle,
    ValidationError,
};

// Port types - interfaces for external systems
pub use ports::{ImageService, ObjectStore};

// Service implementations - business logic
pub use services::{Claims, ImageServiceBuilder, ImageServiceImpl, JwtAuthenticator, JwtConfig};

// Application factory and configuration
pub use app::{
    AppBuilder, AppConfig, AppDependencies, AppError, AppServices, StorageBackend,
    create_in_memory_app,
};

// Adapter types - infrastructure implementations
pub use adapters::{
    inbound::http::router::{AppState, create_router},
    outbound::storage::{ApacheObjectStoreAdapter, create_s3_store},
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        ApacheObjectStoreAdapter, AppBuilder, AppServices, ImageService, ImageServiceImpl,
        JwtAuthenticator, JwtConfig, ObjectKey, ObjectStore, StoreConfig, UrlStyle,
        create_in_memory_app, create_router,
    };
}
