//! Image route group.

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn image_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/images", API_PREFIX),
            post(handlers::images::upload_image).get(handlers::images::list_images),
        )
        .route(
            &format!("{}/images/{{id}}", API_PREFIX),
            get(handlers::images::get_image).delete(handlers::images::delete_image),
        )
        .route(
            &format!("{}/images/{{id}}/file", API_PREFIX),
            get(handlers::images::download_image),
        )
}
