//! Single certificate lookups from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Print records for one or more certificates
//! cert-cli lookup 12345678 87654321
//!
//! # Print JSON and append each row to the spreadsheet
//! cert-cli lookup 12345678 --json --persist
//! ```
//!
//! # Environment Variables
//!
//! - `CERT_LOOKUP_*` - Lookup settings, see the web service configuration
//! - `SHEETS_SPREADSHEET_ID`, `GOOGLE_SERVICE_ACCOUNT_KEY` - Needed with `--persist`

use std::io::Write;

use cert_lookup_core::{CertNumber, CertificateRecord, SheetRow};
use cert_lookup_web::config::LookupConfig;
use cert_lookup_web::lookup::CertLookup;
use cert_lookup_web::services::RecordSink;
use serde::Serialize;

use super::{CommandError, sheets_sink};

/// One printed lookup result.
#[derive(Debug, Serialize)]
struct LookupOutput<'a> {
    cert: &'a str,
    #[serde(flatten)]
    record: &'a CertificateRecord,
}

/// Look up each certificate in order and print the records.
///
/// With `persist`, each row is appended as soon as its lookup finishes and
/// the first failed append stops the command.
pub async fn run(certs: &[String], json: bool, persist: bool) -> Result<(), CommandError> {
    let certs = certs
        .iter()
        .map(|c| CertNumber::parse(c))
        .collect::<Result<Vec<_>, _>>()?;

    let lookup = CertLookup::new(&LookupConfig::from_env()?)?;
    let sink = if persist { Some(sheets_sink().await?) } else { None };

    let mut stdout = std::io::stdout().lock();
    for cert in &certs {
        let record = lookup.lookup(cert).await;

        if let Some(sink) = &sink {
            sink.append_row(SheetRow::new(cert, &record)).await?;
            tracing::info!(cert = %cert, "Row appended");
        }

        if json {
            serde_json::to_writer_pretty(
                &mut stdout,
                &LookupOutput {
                    cert: cert.as_str(),
                    record: &record,
                },
            )?;
            writeln!(stdout)?;
        } else {
            write_record(&mut stdout, cert, &record)?;
        }
    }

    Ok(())
}

fn write_record(
    out: &mut impl Write,
    cert: &CertNumber,
    record: &CertificateRecord,
) -> std::io::Result<()> {
    writeln!(out, "Result for Cert #{cert}")?;
    writeln!(out, "  Card Name:   {}", record.card_name)?;
    writeln!(out, "  Grade:       {}", record.grade)?;
    writeln!(out, "  Set:         {}", record.set)?;
    writeln!(out, "  Card Number: {}", record.card_number)?;
    writeln!(out, "  Population:  {}", record.population)?;
    writeln!(out, "  Image:       {}", record.image_link)?;
    Ok(())
}
