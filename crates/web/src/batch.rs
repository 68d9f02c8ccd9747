//! Batch processing of certificate numbers from CSV uploads.
//!
//! A batch file is a CSV with a header row containing a `cert_number`
//! column; other columns are ignored. Rows are processed strictly in file
//! order, one full lookup-then-persist cycle at a time.
//!
//! A failed append does not stop the batch: the failure is logged and
//! counted and the next row is processed. Lookup failures are persisted as
//! error-shaped rows like any other record.

use cert_lookup_core::{CertNumber, CertificateRecord, SheetRow};
use thiserror::Error;
use tracing::instrument;

use crate::lookup::CertLookup;
use crate::services::{RecordSink, SinkError};

/// Header of the column holding certificate numbers.
pub const CERT_COLUMN: &str = "cert_number";

/// Errors that can occur when reading a batch file.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The file is not readable as CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row has no certificate column.
    #[error("CSV has no '{0}' column")]
    MissingColumn(&'static str),
}

/// Certificate numbers read from a batch file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertColumn {
    /// Certificate numbers in file order.
    pub certs: Vec<CertNumber>,
    /// Rows whose certificate cell was blank or absent.
    pub skipped: usize,
}

/// Outcome counters for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Certificates looked up.
    pub processed: usize,
    /// Rows successfully appended to the sink.
    pub persisted: usize,
    /// Lookups that produced an error-shaped record.
    pub failed_lookups: usize,
    /// Appends rejected by the sink.
    pub failed_persists: usize,
    /// Blank rows skipped while reading the file.
    pub skipped: usize,
}

/// Read the `cert_number` column from CSV bytes.
///
/// Cells are trimmed; blank cells and short rows are skipped and counted.
///
/// # Errors
///
/// Returns [`BatchError::MissingColumn`] if no header matches
/// [`CERT_COLUMN`], or [`BatchError::Csv`] if the data is malformed.
pub fn read_cert_numbers(data: &[u8]) -> Result<CertColumn, BatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let column = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == CERT_COLUMN)
        .ok_or(BatchError::MissingColumn(CERT_COLUMN))?;

    let mut parsed = CertColumn::default();
    for record in reader.records() {
        let record = record?;
        match record.get(column).map(CertNumber::parse) {
            Some(Ok(cert)) => parsed.certs.push(cert),
            _ => parsed.skipped += 1,
        }
    }

    Ok(parsed)
}

/// Look up one certificate and append its row.
///
/// The lookup itself never fails; only the append can.
///
/// # Errors
///
/// Returns the sink's error if the row could not be appended.
pub async fn lookup_and_persist(
    lookup: &CertLookup,
    sink: &dyn RecordSink,
    cert: &CertNumber,
) -> Result<CertificateRecord, SinkError> {
    let record = lookup.lookup(cert).await;
    sink.append_row(SheetRow::new(cert, &record)).await?;
    Ok(record)
}

/// Process certificates sequentially, continuing past failed appends.
#[instrument(skip_all, fields(rows = column.certs.len()))]
pub async fn run_batch(
    lookup: &CertLookup,
    sink: &dyn RecordSink,
    column: &CertColumn,
) -> BatchSummary {
    let mut summary = BatchSummary {
        skipped: column.skipped,
        ..BatchSummary::default()
    };

    for cert in &column.certs {
        summary.processed += 1;
        let record = match lookup.try_lookup(cert).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(cert = %cert, error = %e, "Certificate lookup failed");
                summary.failed_lookups += 1;
                CertificateRecord::lookup_failed(e)
            }
        };

        match sink.append_row(SheetRow::new(cert, &record)).await {
            Ok(()) => summary.persisted += 1,
            Err(e) => {
                tracing::error!(cert = %cert, error = %e, "Failed to persist batch row");
                summary.failed_persists += 1;
            }
        }
    }

    tracing::info!(
        processed = summary.processed,
        persisted = summary.persisted,
        failed_lookups = summary.failed_lookups,
        failed_persists = summary.failed_persists,
        skipped = summary.skipped,
        "Batch finished"
    );
    summary
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;
    use crate::config::LookupConfig;
    use crate::services::MemorySink;

    fn certs(column: &CertColumn) -> Vec<&str> {
        column.certs.iter().map(CertNumber::as_str).collect()
    }

    #[test]
    fn test_read_single_column() {
        let column = read_cert_numbers(b"cert_number\n12345678\n 87654321 \n").unwrap();
        assert_eq!(certs(&column), ["12345678", "87654321"]);
        assert_eq!(column.skipped, 0);
    }

    #[test]
    fn test_read_picks_column_by_name() {
        let data = b"owner,cert_number,notes\nann,111,x\nbob,222,y\n";
        let column = read_cert_numbers(data).unwrap();
        assert_eq!(certs(&column), ["111", "222"]);
    }

    #[test]
    fn test_read_skips_blank_and_short_rows() {
        let data = b"owner,cert_number\nann,111\nbob,\ncarl\ndee,  \neve,555\n";
        let column = read_cert_numbers(data).unwrap();
        assert_eq!(certs(&column), ["111", "555"]);
        assert_eq!(column.skipped, 3);
    }

    #[test]
    fn test_read_keeps_duplicates_in_order() {
        let column = read_cert_numbers(b"cert_number\n3\n1\n3\n").unwrap();
        assert_eq!(certs(&column), ["3", "1", "3"]);
    }

    #[test]
    fn test_read_missing_column() {
        let err = read_cert_numbers(b"cert\n123\n").unwrap_err();
        assert!(matches!(err, BatchError::MissingColumn("cert_number")));
    }

    #[test]
    fn test_read_empty_file_is_missing_column() {
        let err = read_cert_numbers(b"").unwrap_err();
        assert!(matches!(err, BatchError::MissingColumn(_)));
    }

    /// A pipeline aimed at a closed port: every lookup fails fast.
    async fn unreachable_lookup() -> CertLookup {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        CertLookup::new(&LookupConfig {
            base_url: Url::parse(&format!("http://{addr}")).unwrap(),
            timeout_secs: 2,
            ..LookupConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_batch_persists_every_row_in_order() {
        let lookup = unreachable_lookup().await;
        let sink = MemorySink::new();
        let column = read_cert_numbers(b"cert_number\n1\n  \n2\n3\n").unwrap();

        let summary = run_batch(&lookup, &sink, &column).await;

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.persisted, 3);
        assert_eq!(summary.failed_lookups, 3);
        let rows: Vec<String> = sink.rows().iter().map(|r| r.cert().to_owned()).collect();
        assert_eq!(rows, ["1", "2", "3"]);
        assert!(
            sink.rows()
                .iter()
                .all(|r| r.values()[1] == "Error fetching data")
        );
    }

    #[tokio::test]
    async fn test_run_batch_continues_after_failed_append() {
        let lookup = unreachable_lookup().await;
        let sink = MemorySink::failing_on(["2"]);
        let column = read_cert_numbers(b"cert_number\n1\n2\n3\n").unwrap();

        let summary = run_batch(&lookup, &sink, &column).await;

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.persisted, 2);
        assert_eq!(summary.failed_persists, 1);
        let rows: Vec<String> = sink.rows().iter().map(|r| r.cert().to_owned()).collect();
        assert_eq!(rows, ["1", "3"]);
    }

    #[tokio::test]
    async fn test_lookup_and_persist_surfaces_sink_error() {
        let lookup = unreachable_lookup().await;
        let sink = MemorySink::failing_on(["9"]);
        let cert = CertNumber::parse("9").unwrap();

        let err = lookup_and_persist(&lookup, &sink, &cert).await.unwrap_err();
        assert!(matches!(err, SinkError::Rejected(_)));
        assert!(sink.rows().is_empty());
    }

    /// A card whose scraped fields happen to look like the failure record.
    const LOOKALIKE_PAGE: &str = r#"<html><body>
        <div class="cert-details-title">Error fetching data</div>
        <div class="cert-grade">NM 7</div>
        <div class="cert-details-subtitle">-</div>
    </body></html>"#;

    async fn lookalike_lookup() -> CertLookup {
        use axum::{Router, routing::get};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/cert/{cert}", get(|| async { LOOKALIKE_PAGE }));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        CertLookup::new(&LookupConfig {
            base_url: Url::parse(&format!("http://{addr}")).unwrap(),
            ..LookupConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_batch_counts_failures_by_outcome_not_text() {
        let lookup = lookalike_lookup().await;
        let sink = MemorySink::new();
        let column = read_cert_numbers(b"cert_number\n7\n").unwrap();

        let summary = run_batch(&lookup, &sink, &column).await;

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed_lookups, 0);
        assert_eq!(summary.persisted, 1);
        assert_eq!(sink.rows()[0].values()[2], "NM 7");
    }
}
