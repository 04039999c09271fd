mod auth;

pub use auth::{BearerAuth, BearerAuthLayer};
