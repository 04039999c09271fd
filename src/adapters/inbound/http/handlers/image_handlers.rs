use axum::{
    Json,
    extract::{Multipart, Query, RawPathParams, State, multipart::MultipartError},
    http::StatusCode,
};
use tracing::warn;

use crate::{
    adapters::inbound::http::{
        dto::{
            DeleteImageResponseDto, ErrorResponseDto, ListImagesQuery, ListImagesResponseDto,
            UploadImageResponseDto,
        },
        router::AppState,
    },
    domain::{
        errors::{GatewayError, ValidationError},
        models::UploadImageRequest,
    },
};

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "image";

type ApiError = (StatusCode, Json<ErrorResponseDto>);

fn gateway_error(err: GatewayError) -> ApiError {
    (
        StatusCode::from(&err),
        Json(ErrorResponseDto::from_gateway_error(&err)),
    )
}

fn multipart_error(err: MultipartError) -> ApiError {
    warn!(error = %err, "Rejected malformed multipart body");
    (
        err.status(),
        Json(ErrorResponseDto::bad_request(&err.body_text())),
    )
}

/// Handle image listing
pub async fn list_images(
    State(app_state): State<AppState>,
    Query(params): Query<ListImagesQuery>,
) -> Result<Json<ListImagesResponseDto>, ApiError> {
    let page = app_state
        .image_service
        .list_images(params.page_request())
        .await
        .map_err(gateway_error)?;

    Ok(Json(ListImagesResponseDto::from(page)))
}

/// Handle image upload from the `image` multipart field
pub async fn upload_image(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadImageResponseDto>, ApiError> {
    let mut request = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_filename = field.file_name().map(str::to_string);
        let declared_mime_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(multipart_error)?;

        request = Some(UploadImageRequest {
            data,
            declared_mime_type,
            original_filename,
        });
        break;
    }

    let request = request.ok_or_else(|| {
        warn!("Upload without an image field");
        gateway_error(ValidationError::MissingField(UPLOAD_FIELD.to_string()).into())
    })?;

    let uploaded = app_state
        .image_service
        .upload_image(request)
        .await
        .map_err(gateway_error)?;

    Ok(Json(UploadImageResponseDto {
        success: true,
        url: uploaded.url,
        file_name: uploaded.key.into_string(),
    }))
}

/// Handle image deletion.
///
/// The key is taken undecoded from the path and decoded exactly once by the
/// service.
pub async fn delete_image(
    State(app_state): State<AppState>,
    params: RawPathParams,
) -> Result<Json<DeleteImageResponseDto>, ApiError> {
    let raw_key = params
        .iter()
        .find_map(|(name, value)| (name == "key").then_some(value))
        .unwrap_or_default();

    let key = app_state
        .image_service
        .delete_image(raw_key)
        .await
        .map_err(gateway_error)?;

    Ok(Json(DeleteImageResponseDto {
        success: true,
        message: "Image deleted".to_string(),
        key: key.into_string(),
    }))
}
