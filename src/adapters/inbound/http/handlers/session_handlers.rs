use axum::{Extension, Json};

use crate::services::Claims;

/// Claims of the verified bearer token
pub async fn get_session(Extension(claims): Extension<Claims>) -> Json<Claims> {
    Json(claims)
}
