//! HTTP transport used by the search and enrichment clients.
//!
//! The clients only need "GET this URL with these query parameters and give
//! me the status and body", so that is all [`Transport`] exposes. The real
//! implementation is a blocking `reqwest` client; tests substitute scripted
//! transports that replay canned responses.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use std::time::Duration;

use crate::config::GithubConfig;

/// Status and body of one completed request.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A blocking GET transport.
///
/// `Err` means the request never produced a response (connect failure,
/// timeout). A response with a non-success status is still `Ok`.
pub trait Transport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<ApiResponse>;
}

/// Transport backed by `reqwest::blocking` with GitHub's headers preset.
pub struct GitHubTransport {
    client: reqwest::blocking::Client,
}

impl GitHubTransport {
    /// Build a client with a bounded per-request timeout and, when the
    /// configured token variable is set, a bearer `Authorization` header.
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid github.user_agent")?,
        );
        match config.token() {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .with_context(|| format!("Invalid token in ${}", config.token_env))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            None => {
                tracing::warn!(
                    env = %config.token_env,
                    "no API token set; requests are unauthenticated and heavily rate limited"
                );
            }
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

impl Transport for GitHubTransport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<ApiResponse> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .with_context(|| format!("GET {} failed", url))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .with_context(|| format!("Failed to read response body from {}", url))?;

        Ok(ApiResponse { status, body })
    }
}
