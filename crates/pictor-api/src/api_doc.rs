//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use pictor_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pictor API",
        version = "0.1.0",
        description = "Image ingestion API (v0): upload images, read their derived metadata, download and delete them. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::images::upload_image,
        handlers::images::list_images,
        handlers::images::get_image,
        handlers::images::download_image,
        handlers::images::delete_image,
    ),
    components(
        schemas(
            models::ImageResponse,
            handlers::images::UploadResponse,
            handlers::images::DeleteResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "images", description = "Image upload, retrieval and deletion")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_image_routes() {
        let doc = get_openapi_spec();
        assert!(doc.paths.paths.contains_key("/api/v0/images"));
        assert!(doc.paths.paths.contains_key("/api/v0/images/{id}"));
        assert!(doc.paths.paths.contains_key("/api/v0/images/{id}/file"));
    }
}
