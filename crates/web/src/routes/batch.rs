//! Batch CSV upload.

use axum::{
    body::Bytes,
    extract::{Multipart, State, multipart::MultipartRejection},
    response::Redirect,
};
use tracing::instrument;

use crate::batch::{read_cert_numbers, run_batch};
use crate::error::add_breadcrumb;
use crate::state::AppState;

/// Multipart field carrying the CSV file.
const FILE_FIELD: &str = "file";

/// Process an uploaded CSV of certificate numbers.
///
/// POST /batch-upload
///
/// Every row of the `cert_number` column is looked up and appended in file
/// order. The response is a redirect to `/` whatever happened; uploads that
/// cannot be processed are logged and dropped.
#[instrument(skip_all)]
pub async fn batch_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Redirect {
    let upload = match multipart {
        Ok(multipart) => read_upload(multipart).await,
        Err(rejection) => Err(rejection.body_text()),
    };

    let (filename, data) = match upload {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            tracing::warn!(field = FILE_FIELD, "Batch upload without a file field");
            add_breadcrumb("batch", "Batch upload without file", None);
            return Redirect::to("/");
        }
        Err(reason) => {
            tracing::warn!(error = %reason, "Unreadable batch upload");
            add_breadcrumb("batch", "Unreadable batch upload", Some(&[("error", reason.as_str())]));
            return Redirect::to("/");
        }
    };

    if data.is_empty() {
        tracing::info!(filename = %filename, "Empty batch upload ignored");
        return Redirect::to("/");
    }

    let column = match read_cert_numbers(&data) {
        Ok(column) => column,
        Err(e) => {
            tracing::warn!(filename = %filename, error = %e, "Batch file rejected");
            add_breadcrumb(
                "batch",
                "Batch file rejected",
                Some(&[("filename", filename.as_str()), ("error", e.to_string().as_str())]),
            );
            return Redirect::to("/");
        }
    };

    tracing::info!(
        filename = %filename,
        rows = column.certs.len(),
        skipped = column.skipped,
        "Batch upload received"
    );
    add_breadcrumb("batch", "Batch upload", Some(&[("filename", filename.as_str())]));

    run_batch(state.lookup(), state.sink(), &column).await;

    Redirect::to("/")
}

/// Pull the file field out of the multipart body.
///
/// Returns `Ok(None)` when the body has no file field, and the rejection
/// text when the body cannot be read.
async fn read_upload(mut multipart: Multipart) -> Result<Option<(String, Bytes)>, String> {
    while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
        if field.name() == Some(FILE_FIELD) {
            let filename = field.file_name().unwrap_or_default().to_owned();
            let data = field.bytes().await.map_err(|e| e.body_text())?;
            return Ok(Some((filename, data)));
        }
    }
    Ok(None)
}
