mod auth_service_impl;
mod image_service_impl;

pub use auth_service_impl::{Claims, DEFAULT_TOKEN_TTL_DAYS, JwtAuthenticator, JwtConfig};
pub use image_service_impl::{
    DEFAULT_STORE_TIMEOUT, ImageServiceBuilder, ImageServiceImpl, MAX_LIST_KEYS,
};
