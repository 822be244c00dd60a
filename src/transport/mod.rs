//! HTTP transport abstraction.
//!
//! Every network call in the crate goes through [`HttpTransport`], so
//! providers, discovery, the download engine and the artwork fetcher can be
//! tested against [`mocks::MockTransport`] instead of live services.
//!
//! Production code uses [`ReqwestTransport`].

mod client;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::de::DeserializeOwned;

pub use client::ReqwestTransport;

/// Errors raised by the transport itself (not HTTP error statuses).
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode body: {0}")]
    Decode(String),
}

/// A fully buffered response.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    /// `Location` header, if any
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body decoded as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_slice(&self.body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// A streamed response body.
pub struct BodyStream {
    pub status: u16,
    /// Declared `Content-Length`, if present
    pub content_length: Option<u64>,
    pub chunks: BoxStream<'static, Result<Vec<u8>, TransportError>>,
}

/// The network capability the pipeline needs.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET, following redirects.
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;

    /// GET without following redirects.
    async fn get_no_redirect(&self, url: &str) -> Result<HttpResponse, TransportError>;

    /// HEAD, returning only the status code.
    async fn head(&self, url: &str) -> Result<u16, TransportError>;

    /// GET with a streamed body.
    async fn stream(&self, url: &str) -> Result<BodyStream, TransportError>;
}
