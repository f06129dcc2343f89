//! Structured logging for AccessiBridge.
//!
//! Console plus optional NDJSON file output, and scrubbing of API credentials
//! from anything that may end up in a log line or a response body.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
