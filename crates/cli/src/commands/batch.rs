//! Batch lookups from a CSV file.
//!
//! # Usage
//!
//! ```bash
//! # Dry run: look everything up and print the rows as CSV
//! cert-cli batch certs.csv
//!
//! # Append every row to the spreadsheet
//! cert-cli batch certs.csv --persist
//! ```
//!
//! Rows are processed in file order with the same semantics as the web
//! upload: a failed append is logged and the batch moves on.

use std::path::Path;

use cert_lookup_core::SHEET_HEADER;
use cert_lookup_web::batch::{BatchSummary, read_cert_numbers, run_batch};
use cert_lookup_web::config::LookupConfig;
use cert_lookup_web::lookup::CertLookup;
use cert_lookup_web::services::MemorySink;

use super::{CommandError, sheets_sink};

/// Run a batch file.
///
/// Without `persist`, rows are collected in memory and written to stdout as
/// CSV instead of being appended to the spreadsheet.
pub async fn run(path: &Path, persist: bool) -> Result<BatchSummary, CommandError> {
    let data = std::fs::read(path)?;
    let column = read_cert_numbers(&data)?;
    tracing::info!(
        path = %path.display(),
        rows = column.certs.len(),
        skipped = column.skipped,
        "Batch file loaded"
    );

    let lookup = CertLookup::new(&LookupConfig::from_env()?)?;

    if persist {
        let sink = sheets_sink().await?;
        return Ok(run_batch(&lookup, &sink, &column).await);
    }

    let sink = MemorySink::new();
    let summary = run_batch(&lookup, &sink, &column).await;

    let mut writer = csv::Writer::from_writer(std::io::stdout().lock());
    writer.write_record(SHEET_HEADER)?;
    for row in sink.rows() {
        writer.write_record(row.values())?;
    }
    writer.flush()?;

    Ok(summary)
}
