use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{
    handlers::{delete_image, get_session, health, list_images, upload_image},
    middleware::BearerAuthLayer,
};
use crate::{ports::services::ImageService, services::JwtAuthenticator};

/// Default cap on upload request bodies (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub image_service: Arc<dyn ImageService>,
    pub authenticator: Arc<JwtAuthenticator>,
    pub max_upload_bytes: usize,
}

/// Create the main application router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(create_protected_router(&state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create a router with the routes that need a bearer token
pub fn create_protected_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/session", get(get_session))
        .route("/images", get(list_images).post(upload_image))
        .route("/images/{key}", delete(delete_image))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .route_layer(BearerAuthLayer::new(state.authenticator.clone()))
}
