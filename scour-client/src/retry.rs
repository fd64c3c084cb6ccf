//! Rate-limit detection and retry policy
//!
//! GitHub throttles in two distinct ways: the primary quota (requests per
//! hour, signalled by `x-ratelimit-remaining: 0`) and secondary/abuse
//! detection (burst protection, signalled by a `retry-after` header). The
//! transport classifies every response and asks a [`RetryPolicy`] whether to
//! retry; the policy decides and logs, the transport sleeps and re-issues.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use tracing::{error, info};

/// Wait applied when a primary rate limit carries no usable reset timestamp.
const DEFAULT_RATE_LIMIT_WAIT_SECS: u64 = 60;

/// The request being rate limited, for logging.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub method: &'a str,
    pub url: &'a str,
}

/// Which throttling mechanism triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitKind {
    /// Request quota exhausted.
    Primary,
    /// Abuse/burst detection.
    Secondary,
}

/// A detected rate-limit condition and how long the service asked us to wait.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    pub kind: RateLimitKind,
    pub retry_after: Duration,
}

impl RateLimit {
    /// Classifies a response as a rate-limit condition, if it is one.
    ///
    /// `now` is passed in so the primary-limit wait (reset timestamp minus
    /// current time) is computable deterministically in tests. Responses that
    /// are 403/429 without rate-limit markers are not rate limits; they fall
    /// through to ordinary error handling.
    pub fn classify(status: StatusCode, headers: &HeaderMap, now: DateTime<Utc>) -> Option<Self> {
        if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
            return None;
        }

        if header_value(headers, "x-ratelimit-remaining") == Some("0") {
            let retry_after = header_value(headers, "x-ratelimit-reset")
                .and_then(|v| v.parse::<i64>().ok())
                .map(|reset| Duration::from_secs(reset.saturating_sub(now.timestamp()).max(0) as u64))
                .unwrap_or(Duration::from_secs(DEFAULT_RATE_LIMIT_WAIT_SECS));

            return Some(Self {
                kind: RateLimitKind::Primary,
                retry_after,
            });
        }

        if let Some(secs) = header_value(headers, "retry-after").and_then(|v| v.parse::<u64>().ok())
        {
            return Some(Self {
                kind: RateLimitKind::Secondary,
                retry_after: Duration::from_secs(secs),
            });
        }

        None
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Decision hook invoked by the transport on every detected rate limit.
///
/// Implementations decide whether the request should be retried after the
/// indicated wait. The transport owns the retry-count ceiling; the policy is
/// a pure decision callback, injectable so tests can simulate rate-limit
/// storms without real delays.
pub trait RetryPolicy: Send + Sync {
    /// Invoked when the primary request quota is exhausted.
    fn on_rate_limit(
        &self,
        retry_after: Duration,
        request: &RequestContext<'_>,
        retry_count: u32,
    ) -> bool;

    /// Invoked when secondary (abuse/burst) rate limiting is detected.
    fn on_secondary_rate_limit(
        &self,
        retry_after: Duration,
        request: &RequestContext<'_>,
        retry_count: u32,
    ) -> bool;
}

/// Default policy: always retry, log the wait and the cumulative retry count.
pub struct AlwaysRetry;

impl RetryPolicy for AlwaysRetry {
    fn on_rate_limit(
        &self,
        retry_after: Duration,
        request: &RequestContext<'_>,
        retry_count: u32,
    ) -> bool {
        error!(
            "Request quota exhausted for request {} {}, number of total retries: {}",
            request.method, request.url, retry_count
        );
        info!("Rate limit: retrying after {} seconds", retry_after.as_secs());
        true
    }

    fn on_secondary_rate_limit(
        &self,
        retry_after: Duration,
        request: &RequestContext<'_>,
        retry_count: u32,
    ) -> bool {
        error!(
            "Secondary rate limit detected for request {} {}, retry count: {}",
            request.method, request.url, retry_count
        );
        info!(
            "Secondary rate limit: retrying after {} seconds",
            retry_after.as_secs()
        );
        true
    }
}
