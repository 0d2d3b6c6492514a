//! HTTP transport seam.
//!
//! The fetcher only needs "GET this URL, give me status + body". Keeping that
//! behind a trait lets tests swap in a canned response without a network.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;

use crate::error::EasyDataError;

/// Status code and body text of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a single blocking GET.
///
/// Implementations report connection-level failures as
/// [`EasyDataError::Transport`]; any HTTP status (including errors) is a
/// successful transport result.
pub trait Transport {
    fn get(&self, url: &Url) -> Result<HttpResponse, EasyDataError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &Url) -> Result<HttpResponse, EasyDataError> {
        (**self).get(url)
    }
}

/// `reqwest` blocking client. No retries; timeouts only if configured.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, EasyDataError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EasyDataError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, EasyDataError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| EasyDataError::Transport(e.without_url().to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| EasyDataError::Transport(format!("Failed to read response body: {}", e.without_url())))?;

        Ok(HttpResponse { status, body })
    }
}
