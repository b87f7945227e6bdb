//! HTTP transport
//!
//! Retry, backoff, and rate limiting live here; the fetch loop issues one
//! logical GET per page and never retries on its own.

mod client;
mod rate_limit;

pub use client::{BackoffType, HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
