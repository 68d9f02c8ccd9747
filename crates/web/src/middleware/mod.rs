//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans, `request_id` field)
//! 3. Request ID (records the ID on the span and Sentry scope)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
