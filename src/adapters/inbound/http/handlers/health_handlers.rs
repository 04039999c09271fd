use axum::Json;

use crate::adapters::inbound::http::dto::HealthResponseDto;

/// Liveness check; never touches the store
pub async fn health() -> Json<HealthResponseDto> {
    Json(HealthResponseDto {
        status: "ok".to_string(),
    })
}
