//! Certificate Lookup Core - Shared types library.
//!
//! This crate provides the types used across all certificate lookup components:
//! - `web` - Form and batch-upload service that looks up and persists records
//! - `cli` - Command-line lookups against the same pipeline
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no HTML
//! parsing. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Certificate numbers, normalized records, spreadsheet rows

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
