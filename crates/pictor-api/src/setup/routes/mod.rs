//! Route configuration and setup.
//!
//! Image routes live in [domains](domains); health checks in [health](health).

mod domains;
mod health;

use crate::api_doc::get_openapi_spec;
use crate::constants::{MULTIPART_OVERHEAD_BYTES, OPENAPI_PATH};
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use pictor_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let request_timeout = Duration::from_secs(config.request_timeout_secs().max(1));
    let body_limit = config.max_upload_size_bytes() + MULTIPART_OVERHEAD_BYTES;
    tracing::info!(
        request_timeout_secs = request_timeout.as_secs(),
        body_limit_bytes = body_limit,
        "HTTP limits configured"
    );

    let app = Router::new()
        .merge(domains::image_routes())
        .route("/health", get(health::health_check))
        .route(OPENAPI_PATH, get(|| async { Json(get_openapi_spec()) }))
        .merge(utoipa_rapidoc::RapiDoc::new(OPENAPI_PATH).path("/docs"))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(body_limit))
                .layer(TimeoutLayer::new(request_timeout))
                .layer(DefaultBodyLimit::disable()),
        )
        .with_state(state);

    Ok(app)
}
