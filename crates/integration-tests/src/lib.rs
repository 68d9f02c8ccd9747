//! Integration tests for the certificate lookup service.
//!
//! Every test runs entirely in-process: a fake grading site serves fixture
//! certificate pages on an ephemeral port, and the web app is started against
//! it with a [`MemorySink`] standing in for the spreadsheet.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cert-lookup-integration-tests
//! ```
//!
//! # Fixture Certificates
//!
//! - `12345678` - Complete certificate page
//! - `00000000` - Page without a title
//! - anything else - 404 from the grading site

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, extract::Path, http::StatusCode, routing::get};
use cert_lookup_web::config::AppConfig;
use cert_lookup_web::routes;
use cert_lookup_web::services::MemorySink;
use cert_lookup_web::state::AppState;
use reqwest::Client;

/// Certificate page with every field present.
pub const CHARIZARD_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <div class="cert-details-title">
    1998 Pokemon Base Set Charizard
  </div>
  <div class="cert-grade">GEM MT 10</div>
  <div class="cert-details-subtitle">1998 Pokemon Base Set #4</div>
  <div class="cert-data-item">
    <div class="cert-data-label">Card Number</div>
    <div class="cert-data-value">4</div>
  </div>
  <div class="cert-data-item">
    <div class="cert-data-label">Population</div>
    <div class="cert-data-value">312</div>
  </div>
  <img class="cert-image" src="https://images.example/charizard.jpg">
</body></html>"#;

/// Certificate page the grading site returns for an unknown certificate.
pub const UNTITLED_PAGE: &str = "<html><body><p>Certificate not found</p></body></html>";

async fn cert_page(Path(cert): Path<String>) -> (StatusCode, &'static str) {
    match cert.as_str() {
        "12345678" => (StatusCode::OK, CHARIZARD_PAGE),
        "00000000" => (StatusCode::OK, UNTITLED_PAGE),
        _ => (StatusCode::NOT_FOUND, "not found"),
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });
    addr
}

/// Start the fake grading site and return its base URL.
pub async fn spawn_grading_site() -> String {
    let addr = serve(Router::new().route("/cert/{cert}", get(cert_page))).await;
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// A running app plus the sink it writes to.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub sink: Arc<MemorySink>,
}

impl TestContext {
    /// Start the app against the fake grading site with an empty sink.
    pub async fn new() -> Self {
        let grading_site = spawn_grading_site().await;
        Self::with(&grading_site, MemorySink::new()).await
    }

    /// Start the app against `grading_site` writing to `sink`.
    pub async fn with(grading_site: &str, sink: MemorySink) -> Self {
        let config = AppConfig::from_vars(|key| match key {
            "CERT_LOOKUP_BASE_URL" => Some(grading_site.to_string()),
            "CERT_LOOKUP_TIMEOUT_SECS" => Some("5".to_string()),
            "SHEETS_SPREADSHEET_ID" => Some("test-spreadsheet".to_string()),
            "MAX_UPLOAD_BYTES" => Some("4096".to_string()),
            _ => None,
        })
        .expect("Failed to build test config");

        let sink = Arc::new(sink);
        let state = AppState::new(config, sink.clone()).expect("Failed to build app state");
        let addr = serve(routes::app(state)).await;

        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            sink,
        }
    }

    /// Absolute URL for `path` on the app.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
