//! CLI subcommands.

pub mod batch;
pub mod lookup;

use cert_lookup_core::CertNumberError;
use cert_lookup_web::batch::BatchError;
use cert_lookup_web::config::{ConfigError, SheetsConfig};
use cert_lookup_web::lookup::LookupError;
use cert_lookup_web::services::{SheetsSink, SinkError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Lookup setup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Persistence error: {0}")]
    Sink(#[from] SinkError),

    #[error("Batch file error: {0}")]
    Batch(#[from] BatchError),

    #[error("Invalid certificate number: {0}")]
    InvalidCert(#[from] CertNumberError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Connect to the spreadsheet configured in the environment.
async fn sheets_sink() -> Result<SheetsSink, CommandError> {
    let config = SheetsConfig::from_env()?;
    tracing::info!(spreadsheet_id = %config.spreadsheet_id, "Connecting to spreadsheet...");
    Ok(SheetsSink::new(&config).await?)
}
