//! Core types for certificate lookups.
//!
//! This module provides the domain types shared by the web service and CLI.

pub mod cert_number;
pub mod record;
pub mod sheet_row;

pub use cert_number::{CertNumber, CertNumberError};
pub use record::{CertificateRecord, LOOKUP_FAILED_CARD_NAME, LOOKUP_FAILED_PLACEHOLDER};
pub use sheet_row::{SHEET_COLUMNS, SHEET_HEADER, SheetRow};
