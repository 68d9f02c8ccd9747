//! In-memory record sink.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use cert_lookup_core::SheetRow;

use super::{RecordSink, SinkError};

/// Sink that keeps appended rows in memory.
///
/// Rows whose certificate is listed via [`MemorySink::failing_on`] are
/// rejected with [`SinkError::Rejected`] instead of being stored.
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: Mutex<Vec<SheetRow>>,
    reject: HashSet<String>,
}

impl MemorySink {
    /// Create an empty sink that accepts every row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that rejects rows for the given certificates.
    #[must_use]
    pub fn failing_on<I, S>(certs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: Mutex::default(),
            reject: certs.into_iter().map(Into::into).collect(),
        }
    }

    /// Snapshot of the rows appended so far, in append order.
    #[must_use]
    pub fn rows(&self) -> Vec<SheetRow> {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn append_row(&self, row: SheetRow) -> Result<(), SinkError> {
        if self.reject.contains(row.cert()) {
            return Err(SinkError::Rejected(row.cert().to_owned()));
        }
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(row);
        Ok(())
    }
}
