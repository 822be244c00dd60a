//! reqwest-backed transport.
//!
//! Two clients share one configuration: the default one follows redirects,
//! the other stops at the first response so redirect targets can be read
//! from the `Location` header. No request timeout is set.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{CONTENT_LENGTH, LOCATION};
use reqwest::redirect::Policy;

use super::{BodyStream, HttpResponse, HttpTransport, TransportError};

/// Production transport
pub struct ReqwestTransport {
    http_client: reqwest::Client,
    no_redirect_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport sending `user_agent` and accepting gzip responses.
    pub fn new(user_agent: &str) -> Result<Self, TransportError> {
        let build = |policy: Policy| {
            reqwest::Client::builder()
                .gzip(true)
                .user_agent(user_agent)
                .redirect(policy)
                .build()
                .map_err(|e| TransportError::Network(e.to_string()))
        };

        Ok(Self {
            http_client: build(Policy::default())?,
            no_redirect_client: build(Policy::none())?,
        })
    }

    async fn buffered(
        client: &reqwest::Client,
        url: &str,
    ) -> Result<HttpResponse, TransportError> {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?
            .to_vec();

        Ok(HttpResponse {
            status,
            location,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        Self::buffered(&self.http_client, url).await
    }

    async fn get_no_redirect(&self, url: &str) -> Result<HttpResponse, TransportError> {
        Self::buffered(&self.no_redirect_client, url).await
    }

    async fn head(&self, url: &str) -> Result<u16, TransportError> {
        let response = self
            .http_client
            .head(url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(response.status().as_u16())
    }

    async fn stream(&self, url: &str) -> Result<BodyStream, TransportError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        // Read the declared header; the decoded length may differ under gzip
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());

        let chunks = response
            .bytes_stream()
            .map(|chunk| {
                chunk
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| TransportError::Network(e.to_string()))
            })
            .boxed();

        Ok(BodyStream {
            status,
            content_length,
            chunks,
        })
    }
}
