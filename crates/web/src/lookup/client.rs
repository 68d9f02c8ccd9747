//! HTTP client for the grading site's certificate pages.

use std::time::Duration;

use cert_lookup_core::CertNumber;
use url::Url;

use super::LookupError;
use crate::config::LookupConfig;

/// Fetches raw certificate pages, one GET per certificate number.
#[derive(Clone)]
pub struct LookupClient {
    client: reqwest::Client,
    base_url: Url,
}

impl LookupClient {
    /// Create a new lookup client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Build the page URL for a certificate.
    ///
    /// The certificate number becomes a single, percent-encoded path segment.
    /// URL parsing resolves `.` and `..` segments (encoded or not), so those
    /// two certificate numbers have no URL of their own and are refused.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidUrl`] if the base URL cannot carry a path
    /// or the certificate number is `.` or `..`.
    pub fn cert_url(&self, cert: &CertNumber) -> Result<Url, LookupError> {
        if matches!(cert.as_str(), "." | "..") {
            return Err(LookupError::InvalidUrl(format!(
                "certificate number \"{cert}\" is not a usable path segment"
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| LookupError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("cert")
            .push(cert.as_str());
        Ok(url)
    }

    /// Fetch the raw page for a certificate.
    ///
    /// # Errors
    ///
    /// Returns error on network failure, timeout, or a non-success status.
    pub async fn fetch(&self, cert: &CertNumber) -> Result<String, LookupError> {
        let url = self.cert_url(cert)?;
        tracing::debug!(%url, "Fetching certificate page");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
