//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /              - Lookup page (both forms, no result)
//! POST /              - Look up one certificate, append its row, show the result
//! POST /batch-upload  - Look up and append every cert_number row of a CSV, redirect to /
//! GET  /health        - Liveness check
//! ```

pub mod batch;
pub mod lookup;

use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the page routes.
///
/// `max_upload_bytes` bounds the batch upload body.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(lookup::index).post(lookup::lookup))
        .route(
            "/batch-upload",
            post(batch::batch_upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

/// Build the complete application router with middleware.
pub fn app(state: AppState) -> Router {
    let max_upload_bytes = state.config().max_upload_bytes;

    Router::new()
        .route("/health", get(health))
        .merge(routes(max_upload_bytes))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the grading site
/// or the spreadsheet.
async fn health() -> &'static str {
    "ok"
}
