//! Persistence services for lookup results.
//!
//! # Services
//!
//! - [`RecordSink`] - Append contract: one spreadsheet row per lookup
//! - [`SheetsSink`] - Google Sheets implementation (`values.append`)
//! - [`MemorySink`] - In-process sink that records rows, for tests and dry runs

pub mod memory;
pub mod sheets;

pub use memory::MemorySink;
pub use sheets::SheetsSink;

use async_trait::async_trait;
use cert_lookup_core::SheetRow;
use thiserror::Error;

/// Errors that can occur when persisting a row.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The service-account key could not be read.
    #[error("Credentials error: {0}")]
    Credentials(#[from] std::io::Error),

    /// The spreadsheet API rejected or failed the append.
    #[error("Spreadsheet API error: {0}")]
    Api(String),

    /// The sink refused the row.
    #[error("Rejected row for cert {0}")]
    Rejected(String),
}

/// Destination for lookup rows.
///
/// Each call appends exactly one row; appends are assumed atomic per row but
/// nothing groups several rows into a transaction.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Append one row.
    async fn append_row(&self, row: SheetRow) -> Result<(), SinkError>;
}
