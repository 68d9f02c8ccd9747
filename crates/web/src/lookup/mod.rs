//! Certificate lookup pipeline.
//!
//! # Architecture
//!
//! - [`LookupClient`] fetches the certificate page over HTTP
//! - [`extract`] turns the page into a [`CertificateRecord`]
//! - [`CertLookup`] runs both in sequence
//!
//! Per call the pipeline moves `Fetching -> Extracting -> Done`, or
//! `Fetching -> Failed -> Done` when the fetch or extraction fails.
//! [`CertLookup::try_lookup`] keeps the failure as a typed [`LookupError`];
//! [`CertLookup::lookup`] folds it into the error-shaped record so callers
//! at the presentation edge always get a well-formed value.
//!
//! # Example
//!
//! ```rust,ignore
//! use cert_lookup_web::lookup::CertLookup;
//!
//! let lookup = CertLookup::new(&config.lookup)?;
//! let record = lookup.lookup(&CertNumber::parse("12345678")?).await;
//! ```

mod client;
pub mod extract;

pub use client::LookupClient;
pub use extract::{ExtractError, extract};

use cert_lookup_core::{CertNumber, CertificateRecord};
use thiserror::Error;
use tracing::instrument;

use crate::config::LookupConfig;

/// Errors that can occur while looking up a certificate.
#[derive(Debug, Error)]
pub enum LookupError {
    /// HTTP request failed (DNS, connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The grading site answered with a non-success status.
    #[error("Unexpected HTTP status {status}")]
    Status { status: u16 },

    /// The page did not contain a required block.
    #[error("{0}")]
    Extract(#[from] ExtractError),

    /// The configured base URL cannot be used to build a page URL.
    #[error("Invalid lookup URL: {0}")]
    InvalidUrl(String),
}

/// Fetch-then-extract pipeline for certificate numbers.
#[derive(Clone)]
pub struct CertLookup {
    client: LookupClient,
}

impl CertLookup {
    /// Create a new lookup pipeline.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        Ok(Self {
            client: LookupClient::new(config)?,
        })
    }

    /// Look up a certificate, keeping any failure typed.
    ///
    /// # Errors
    ///
    /// Returns the transport or extraction failure for this certificate.
    pub async fn try_lookup(&self, cert: &CertNumber) -> Result<CertificateRecord, LookupError> {
        let page = self.client.fetch(cert).await?;
        Ok(extract(&page)?)
    }

    /// Look up a certificate, never failing.
    ///
    /// Failures are logged and converted into
    /// [`CertificateRecord::lookup_failed`] with the error text as the grade.
    #[instrument(skip_all, fields(cert = %cert))]
    pub async fn lookup(&self, cert: &CertNumber) -> CertificateRecord {
        match self.try_lookup(cert).await {
            Ok(record) => {
                tracing::info!(card_name = %record.card_name, grade = %record.grade, "Certificate found");
                record
            }
            Err(e) => {
                tracing::warn!(error = %e, "Certificate lookup failed");
                CertificateRecord::lookup_failed(e)
            }
        }
    }
}
