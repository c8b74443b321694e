//! HTTP transport used by the data client
//!
//! The client talks to the network only through [`Transport`], so the retry
//! and cache logic can be driven by a scripted transport in tests.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::RequestError;

/// A completed HTTP exchange: status code plus raw body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a single GET request
///
/// Implementations report transport failures as [`RequestError::Network`] (or
/// [`RequestError::Timeout`] if they time out on their own). Any received
/// response, whatever its status, is returned as `Ok`; the caller decides
/// what counts as success.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse, RequestError>;
}

/// Production transport backed by `reqwest`
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with a default `reqwest` client
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport around a preconfigured `reqwest` client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, RequestError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(request_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(request_error)?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn request_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        RequestError::Timeout(std::time::Duration::ZERO)
    } else {
        RequestError::Network(err.to_string())
    }
}
