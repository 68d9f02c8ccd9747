//! Google Sheets record sink.
//!
//! Appends each lookup as one row through the Sheets v4 `values.append`
//! call, authenticated with a service-account key. The target spreadsheet
//! must already exist and be shared with the service account.

use async_trait::async_trait;
use cert_lookup_core::SheetRow;
use google_sheets4::{
    Sheets,
    api::ValueRange,
    hyper_rustls, hyper_util,
    yup_oauth2::{ServiceAccountAuthenticator, read_service_account_key},
};

use super::{RecordSink, SinkError};
use crate::config::SheetsConfig;

type Connector = hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;

/// Values are stored exactly as given, without formula or number parsing.
const VALUE_INPUT_OPTION: &str = "RAW";

/// New rows are inserted rather than overwriting whatever follows the table.
const INSERT_DATA_OPTION: &str = "INSERT_ROWS";

/// Record sink backed by a Google spreadsheet.
pub struct SheetsSink {
    hub: Sheets<Connector>,
    spreadsheet_id: String,
    range: String,
}

impl std::fmt::Debug for SheetsSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsSink")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

impl SheetsSink {
    /// Create a sink from configuration.
    ///
    /// Reads the service-account key and prepares the authenticator; no
    /// request is made to the spreadsheet until the first append.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Credentials`] if the key cannot be read or the
    /// TLS roots cannot be loaded.
    pub async fn new(config: &SheetsConfig) -> Result<Self, SinkError> {
        let key = read_service_account_key(&config.service_account_key).await?;
        let auth = ServiceAccountAuthenticator::builder(key).build().await?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()?
            .https_only()
            .enable_http1()
            .build();
        let client = hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
            .build(connector);

        tracing::info!(
            spreadsheet_id = %config.spreadsheet_id,
            range = %config.range,
            "Sheets sink ready"
        );

        Ok(Self {
            hub: Sheets::new(client, auth),
            spreadsheet_id: config.spreadsheet_id.clone(),
            range: config.range.clone(),
        })
    }
}

#[async_trait]
impl RecordSink for SheetsSink {
    async fn append_row(&self, row: SheetRow) -> Result<(), SinkError> {
        let cert = row.cert().to_owned();

        self.hub
            .spreadsheets()
            .values_append(value_range(row), &self.spreadsheet_id, &self.range)
            .value_input_option(VALUE_INPUT_OPTION)
            .insert_data_option(INSERT_DATA_OPTION)
            .doit()
            .await
            .map_err(|e| SinkError::Api(e.to_string()))?;

        tracing::debug!(cert = %cert, "Row appended to spreadsheet");
        Ok(())
    }
}

/// Wrap a row as a single-row `ValueRange` request body.
fn value_range(row: SheetRow) -> ValueRange {
    ValueRange {
        major_dimension: Some("ROWS".to_string()),
        values: Some(vec![row.into_values().into_iter().map(Into::into).collect()]),
        ..Default::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cert_lookup_core::{CertNumber, CertificateRecord};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_value_range_is_one_row_in_column_order() {
        let record = CertificateRecord {
            card_name: "1998 Pokemon Base Set Charizard".to_string(),
            grade: "GEM MT 10".to_string(),
            set: "1998 Pokemon Base Set #4".to_string(),
            card_number: "4".to_string(),
            population: "312".to_string(),
            image_link: "https://img/x.jpg".to_string(),
        };
        let row = SheetRow::new(&CertNumber::parse("12345678").unwrap(), &record);

        let range = value_range(row);
        assert_eq!(range.major_dimension.as_deref(), Some("ROWS"));
        assert!(range.range.is_none());
        assert_eq!(
            serde_json::to_value(range.values).unwrap(),
            json!([[
                "12345678",
                "1998 Pokemon Base Set Charizard",
                "GEM MT 10",
                "1998 Pokemon Base Set #4",
                "4",
                "312",
                "https://img/x.jpg"
            ]])
        );
    }

    #[tokio::test]
    async fn test_missing_key_file_is_credentials_error() {
        let config = SheetsConfig {
            spreadsheet_id: "sheet-123".to_string(),
            range: "A1".to_string(),
            service_account_key: "/nonexistent/credentials.json".into(),
        };
        let err = SheetsSink::new(&config).await.unwrap_err();
        assert!(matches!(err, SinkError::Credentials(_)));
    }
}
