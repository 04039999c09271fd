use axum::Router;
use object_store::memory::InMemory;
use std::{str::FromStr, sync::Arc, time::Duration};
use tracing::info;

use crate::{
    adapters::{
        inbound::http::router::{AppState, DEFAULT_MAX_UPLOAD_BYTES, create_router},
        outbound::storage::{ApacheObjectStoreAdapter, create_s3_store},
    },
    domain::{errors::GatewayError, models::StoreConfig},
    ports::storage::ObjectStore,
    services::{
        DEFAULT_STORE_TIMEOUT, ImageServiceBuilder, ImageServiceImpl, JwtAuthenticator, JwtConfig,
    },
};

pub const ENV_STORAGE_BACKEND: &str = "STORAGE_BACKEND";
pub const ENV_JWT_SECRET: &str = "JWT_SECRET";
pub const ENV_STORE_TIMEOUT_SECS: &str = "STORE_TIMEOUT_SECS";
pub const ENV_MAX_UPLOAD_BYTES: &str = "MAX_UPLOAD_BYTES";

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    pub store: StoreConfig,
    pub jwt: JwtConfig,
    pub store_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Configuration with default timeout and upload cap
    pub fn new(storage_backend: StorageBackend, store: StoreConfig, jwt: JwtConfig) -> Self {
        Self {
            storage_backend,
            store,
            jwt,
            store_timeout: DEFAULT_STORE_TIMEOUT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Resolve the whole configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let storage_backend = match non_blank(ENV_STORAGE_BACKEND) {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };
        let store = StoreConfig::from_lookup(&lookup)?;
        let secret = non_blank(ENV_JWT_SECRET).ok_or_else(|| AppError::Configuration {
            message: format!("{ENV_JWT_SECRET} environment variable required"),
        })?;

        let mut config = Self::new(storage_backend, store, JwtConfig::new(secret));
        if let Some(secs) = non_blank(ENV_STORE_TIMEOUT_SECS) {
            config.store_timeout =
                Duration::from_secs(parse_number(ENV_STORE_TIMEOUT_SECS, &secs)?);
        }
        if let Some(bytes) = non_blank(ENV_MAX_UPLOAD_BYTES) {
            config.max_upload_bytes = parse_number(ENV_MAX_UPLOAD_BYTES, &bytes)?;
        }
        Ok(config)
    }
}

fn parse_number<T: FromStr>(name: &str, value: &str) -> Result<T, AppError> {
    value.trim().parse().map_err(|_| AppError::Configuration {
        message: format!("{name} must be a non-negative integer, got '{value}'"),
    })
}

/// Storage backend configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local store, for development and tests
    InMemory,
    /// S3-compatible store described by the `StoreConfig`
    S3,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StorageBackend::InMemory),
            "s3" | "minio" => Ok(StorageBackend::S3),
            other => Err(AppError::Configuration {
                message: format!("Unknown storage backend: {other}"),
            }),
        }
    }
}

/// Application dependencies container
pub struct AppDependencies {
    pub object_store: Arc<dyn ObjectStore>,
}

/// Application services container
pub struct AppServices {
    pub image_service: Arc<ImageServiceImpl>,
    pub authenticator: Arc<JwtAuthenticator>,
    pub max_upload_bytes: usize,
}

impl AppServices {
    pub fn app_state(&self) -> AppState {
        AppState {
            image_service: self.image_service.clone(),
            authenticator: self.authenticator.clone(),
            max_upload_bytes: self.max_upload_bytes,
        }
    }

    /// The complete HTTP application
    pub fn router(&self) -> Router {
        create_router(self.app_state())
    }
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Build the application dependencies
    pub fn build_dependencies(&self) -> Result<AppDependencies, AppError> {
        let object_store = self.create_storage_adapter()?;
        Ok(AppDependencies { object_store })
    }

    /// Build the complete application with services
    pub fn build(self) -> Result<AppServices, AppError> {
        if self.config.jwt.secret.trim().is_empty() {
            return Err(AppError::Configuration {
                message: "JWT secret must not be empty".to_string(),
            });
        }

        let deps = self.build_dependencies()?;
        let config = self.config;

        let image_service = ImageServiceBuilder::new()
            .store(deps.object_store)
            .config(config.store.clone())
            .store_timeout(config.store_timeout)
            .build()?;

        info!(
            backend = ?config.storage_backend,
            bucket = %config.store.bucket,
            url_style = config.store.url_style.as_str(),
            store_timeout = ?config.store_timeout,
            max_upload_bytes = config.max_upload_bytes,
            "Application services ready"
        );

        Ok(AppServices {
            image_service: Arc::new(image_service),
            authenticator: Arc::new(JwtAuthenticator::new(config.jwt)),
            max_upload_bytes: config.max_upload_bytes,
        })
    }

    /// Create the storage adapter for the configured backend
    fn create_storage_adapter(&self) -> Result<Arc<dyn ObjectStore>, AppError> {
        let backend: Arc<dyn object_store::ObjectStore> = match self.config.storage_backend {
            StorageBackend::InMemory => Arc::new(InMemory::new()),
            StorageBackend::S3 => create_s3_store(&self.config.store)?,
        };
        Ok(Arc::new(ApacheObjectStoreAdapter::new(backend)))
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Configuration { message } => AppError::Configuration { message },
            other => AppError::StorageInit {
                message: other.to_string(),
            },
        }
    }
}

/// Create an in-memory application for testing and development
pub fn create_in_memory_app(store: StoreConfig, jwt: JwtConfig) -> Result<AppServices, AppError> {
    AppBuilder::new(AppConfig::new(StorageBackend::InMemory, store, jwt)).build()
}
