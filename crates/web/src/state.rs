//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::lookup::{CertLookup, LookupError};
use crate::services::RecordSink;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Nothing in it is mutated
/// after startup, so concurrent requests share no mutable state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    lookup: CertLookup,
    sink: Arc<dyn RecordSink>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Service configuration
    /// * `sink` - Destination for lookup rows
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup HTTP client cannot be built.
    pub fn new(config: AppConfig, sink: Arc<dyn RecordSink>) -> Result<Self, LookupError> {
        let lookup = CertLookup::new(&config.lookup)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                lookup,
                sink,
            }),
        })
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the lookup pipeline.
    #[must_use]
    pub fn lookup(&self) -> &CertLookup {
        &self.inner.lookup
    }

    /// Get a reference to the record sink.
    #[must_use]
    pub fn sink(&self) -> &dyn RecordSink {
        self.inner.sink.as_ref()
    }
}
