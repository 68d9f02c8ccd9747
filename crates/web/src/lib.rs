//! Certificate Lookup web service library.
//!
//! Looks up graded-card certificates on the grading site, one at a time via
//! a form or in bulk via CSV upload, and appends each result to a shared
//! spreadsheet. Exposed as a library so the CLI and tests reuse the same
//! pipeline and router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod batch;
pub mod config;
pub mod error;
pub mod lookup;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
