//! Utility modules.

/// Date/time serialization helpers shared by record types.
pub mod datetime;

/// Log sanitization utilities to keep request/response logs bounded.
pub mod log_sanitizer;
