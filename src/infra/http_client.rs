//! HTTP client factory with consistent timeout configuration.
//!
//! The registration gateway and anything else talking HTTP should get its
//! client from here rather than constructing `reqwest::Client` directly.

use reqwest::Client;
use std::time::Duration;

/// Default connect timeout (TCP handshake + TLS).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default request timeout (total request/response time).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build an HTTP client with default timeouts.
///
/// Panics if the client cannot be built (e.g., TLS misconfiguration).
/// Startup code should prefer `try_build_client()`.
pub fn build_client() -> Client {
    try_build_client().expect("Failed to build HTTP client")
}

/// Build an HTTP client with default timeouts, returning Result for use in
/// fallible contexts.
pub fn try_build_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .build()
}
