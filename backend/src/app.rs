//! HTTP router assembly
//!
//! Wires upload and route-guard handlers, static serving of stored files and
//! the request tracing middleware into one `Router`.

use crate::api;
use crate::state::SharedState;
use crate::upload::category::MAX_REQUEST_BYTES;
use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::time::Instant;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    message: String,
}

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Backend is healthy".to_string(),
    })
}

/// Build the application router
pub fn build_router(state: SharedState) -> Router {
    let upload_routes = Router::new()
        .route(
            "/api/uploads/working-photos",
            post(api::uploads::upload_working_photo),
        )
        .route("/api/uploads/gp-letters", post(api::uploads::upload_gp_letter))
        // Per-file ceiling is enforced while streaming; this caps the whole
        // form, text fields included
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES as usize));

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/route-guard", post(api::guard::check_route))
        .merge(upload_routes)
        .nest_service("/uploads", ServeDir::new(state.upload_root()))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive()) // Frontend is served from another origin
        .with_state(state)
}
