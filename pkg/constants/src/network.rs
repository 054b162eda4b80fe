//! Network-related constants.

/// Default API server address (HTTP).
pub const DEFAULT_API_ADDR: &str = "http://127.0.0.1:6443";

/// Per-request timeout for single-shot API calls, in seconds.
/// Watch streams are long-lived and never carry this timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connect timeout applied to every API connection, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
