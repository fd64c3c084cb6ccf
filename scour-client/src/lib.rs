//! Scour GitHub Client
//!
//! A typed HTTP client for the subset of the GitHub REST API the retention
//! engine consumes: repository tags, workflow runs, workflow run artifacts,
//! and artifact deletion.
//!
//! Every request goes through a transport loop that detects primary and
//! secondary rate limiting and consults an injectable [`RetryPolicy`] before
//! waiting and retrying. List endpoints are exposed page by page (page size
//! 100) so callers control pagination and can stop early.
//!
//! # Example
//!
//! ```no_run
//! use scour_client::GithubClient;
//! use scour_core::domain::RepoId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), scour_client::ClientError> {
//!     let repo = RepoId::parse("octocat/hello-world").unwrap();
//!     let client = GithubClient::new("https://api.github.com", "ghp_token", repo);
//!
//!     let tags = client.list_tags(1).await?;
//!     println!("first page has {} tag(s)", tags.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod retry;

mod artifacts;
mod runs;
mod tags;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use retry::{AlwaysRetry, RateLimit, RateLimitKind, RequestContext, RetryPolicy};

use std::sync::Arc;

use chrono::Utc;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;

use scour_core::domain::RepoId;

/// Page size used for every list endpoint.
pub const PER_PAGE: u32 = 100;

/// Ceiling on rate-limit retries per request, owned by the transport.
///
/// The retry policy decides whether to retry at all; this bounds how often it
/// gets the chance.
pub const MAX_RATE_LIMIT_RETRIES: u32 = 10;

const ACCEPT_HEADER: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("scour/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the GitHub REST API, scoped to one repository.
#[derive(Clone)]
pub struct GithubClient {
    /// API base URL (e.g., "https://api.github.com")
    api_url: String,
    /// Repository all requests are scoped to
    repo: RepoId,
    /// Bearer token
    token: String,
    /// HTTP client instance
    client: Client,
    /// Decision hook consulted on every detected rate limit
    retry_policy: Arc<dyn RetryPolicy>,
}

impl GithubClient {
    /// Create a new client for one repository
    ///
    /// # Arguments
    /// * `api_url` - API base URL (e.g., "https://api.github.com")
    /// * `token` - Bearer token used for every request
    /// * `repo` - Repository all requests are scoped to
    pub fn new(api_url: impl Into<String>, token: impl Into<String>, repo: RepoId) -> Self {
        let api_url = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            repo,
            token: token.into(),
            client: Client::new(),
            retry_policy: Arc::new(AlwaysRetry),
        }
    }

    /// Replace the rate-limit retry policy
    ///
    /// Tests use this to simulate rate-limit handling deterministically.
    pub fn with_retry_policy(mut self, policy: Arc<dyn RetryPolicy>) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Get the API base URL
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Get the repository this client is scoped to
    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    // =============================================================================
    // Transport
    // =============================================================================

    /// Issues a request, transparently retrying through rate limits.
    ///
    /// Rate-limit conditions never surface to callers unless the retry
    /// ceiling is reached or the policy declines; they are waited out here.
    pub(crate) async fn execute(&self, method: Method, url: String) -> Result<Response> {
        let mut retry_count = 0u32;

        loop {
            let response = self
                .client
                .request(method.clone(), &url)
                .bearer_auth(&self.token)
                .header("accept", ACCEPT_HEADER)
                .header("x-github-api-version", API_VERSION)
                .header("user-agent", USER_AGENT)
                .send()
                .await?;

            let Some(limit) = RateLimit::classify(response.status(), response.headers(), Utc::now())
            else {
                return Ok(response);
            };

            let request = RequestContext {
                method: method.as_str(),
                url: &url,
            };

            let retry = match limit.kind {
                RateLimitKind::Primary => {
                    self.retry_policy
                        .on_rate_limit(limit.retry_after, &request, retry_count)
                }
                RateLimitKind::Secondary => {
                    self.retry_policy
                        .on_secondary_rate_limit(limit.retry_after, &request, retry_count)
                }
            };

            if !retry || retry_count >= MAX_RATE_LIMIT_RETRIES {
                return Err(ClientError::RetriesExhausted {
                    method: method.to_string(),
                    url,
                    retries: retry_count,
                });
            }

            tokio::time::sleep(limit.retry_after).await;
            retry_count += 1;
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content (e.g., DELETE operations)
    async fn handle_empty_response(&self, response: Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token deliberately omitted.
        f.debug_struct("GithubClient")
            .field("api_url", &self.api_url)
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepoId {
        RepoId::parse("octocat/hello-world").unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = GithubClient::new("https://api.github.com", "token", repo());
        assert_eq!(client.api_url(), "https://api.github.com");
        assert_eq!(client.repo().to_string(), "octocat/hello-world");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = GithubClient::new("https://api.github.com/", "token", repo());
        assert_eq!(client.api_url(), "https://api.github.com");
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let client = GithubClient::new("https://api.github.com", "ghp_secret", repo());
        let debug = format!("{:?}", client);
        assert!(!debug.contains("ghp_secret"));
    }
}
