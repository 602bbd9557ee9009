use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use pictor_core::models::ImageResponse;
use pictor_core::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Image bytes and filename pulled out of a multipart body
struct UploadForm {
    data: Bytes,
    filename: String,
}

/// Read the `file` part and the optional `filename` override.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, HttpAppError> {
    let mut data: Option<Bytes> = None;
    let mut part_filename: Option<String> = None;
    let mut filename_override: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                if data.is_some() {
                    return Err(HttpAppError(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    )));
                }
                part_filename = field.file_name().map(str::to_string);
                data = Some(field.bytes().await?);
            }
            Some("filename") => {
                filename_override = Some(field.text().await?);
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| {
        HttpAppError(AppError::InvalidInput("No file provided".to_string()))
    })?;
    let filename = filename_override
        .filter(|name| !name.trim().is_empty())
        .or(part_filename)
        .unwrap_or_default();

    Ok(UploadForm { data, filename })
}

/// Upload an image
///
/// Stores the file, derives its metadata and thumbnail, and persists the record.
#[utoipa::path(
    post,
    path = "/api/v0/images",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 422, description = "Not a decodable image", body = ErrorResponse),
        (status = 504, description = "Derivation exceeded its deadline", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_upload_form(multipart).await?;
    let id = state.images.upload(form.data, &form.filename).await?;
    Ok((StatusCode::CREATED, Json(UploadResponse { id })))
}

/// List images, newest first
#[utoipa::path(
    get,
    path = "/api/v0/images",
    tag = "images",
    responses(
        (status = 200, description = "All images", body = [ImageResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_images"))]
pub async fn list_images(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ImageResponse>>, HttpAppError> {
    let images = state.images.list().await?;
    Ok(Json(images.into_iter().map(ImageResponse::from).collect()))
}

/// Get image metadata
#[utoipa::path(
    get,
    path = "/api/v0/images/{id}",
    tag = "images",
    params(
        ("id" = i64, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image metadata", body = ImageResponse),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_image", image_id = id))]
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ImageResponse>, HttpAppError> {
    let record = state.images.metadata(id).await?;
    Ok(Json(ImageResponse::from(record)))
}

/// Download the stored image
#[utoipa::path(
    get,
    path = "/api/v0/images/{id}/file",
    tag = "images",
    params(
        ("id" = i64, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Image or file not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download_image", image_id = id))]
pub async fn download_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (data, record) = state.images.get(id).await?;
    Ok(([(header::CONTENT_TYPE, record.mime_type)], data))
}

/// Delete an image and its files
#[utoipa::path(
    delete,
    path = "/api/v0/images/{id}",
    tag = "images",
    params(
        ("id" = i64, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image deleted", body = DeleteResponse),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_image", image_id = id))]
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    let deleted = state.images.delete(id).await?;
    Ok(Json(DeleteResponse { deleted }))
}
