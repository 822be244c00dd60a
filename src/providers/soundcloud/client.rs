//! SoundCloud API client
//!
//! Every call carries the configured `client_id`. The API answers resolved
//! listings either as a bare JSON array or wrapped in a `collection` object,
//! depending on the endpoint; both are accepted.

use std::sync::Arc;

use serde_json::Value;

use super::dto;
use crate::config::Credentials;
use crate::providers::domain::ProviderError;
use crate::transport::{HttpResponse, HttpTransport};

/// Page size requested from listing endpoints.
const PAGE_LIMIT: u32 = 200;

/// SoundCloud API client
pub struct SoundCloudClient {
    transport: Arc<dyn HttpTransport>,
    credentials: Credentials,
    base_url: String,
}

impl SoundCloudClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credentials: Credentials,
        base_url: &str,
    ) -> Self {
        Self {
            transport,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the resolve call for a public page URL.
    pub fn resolve_url(&self, page_url: &str) -> String {
        format!(
            "{}/resolve?url={}&client_id={}&limit={}",
            self.base_url,
            urlencoding::encode(page_url),
            urlencoding::encode(&self.credentials.client_id),
            PAGE_LIMIT
        )
    }

    fn listing_url(&self, path: &str) -> String {
        format!(
            "{}{}?client_id={}&limit={}",
            self.base_url,
            path,
            urlencoding::encode(&self.credentials.client_id),
            PAGE_LIMIT
        )
    }

    /// Resolve a public page URL into whatever resource it names.
    pub async fn resolve(&self, page_url: &str) -> Result<Value, ProviderError> {
        self.get_json(&self.resolve_url(page_url)).await
    }

    /// All tracks uploaded by a user.
    pub async fn user_tracks(&self, user_id: u64) -> Result<Value, ProviderError> {
        self.get_json(&self.listing_url(&format!("/users/{user_id}/tracks")))
            .await
    }

    /// All tracks posted to a group.
    pub async fn group_tracks(&self, group_id: u64) -> Result<Value, ProviderError> {
        self.get_json(&self.listing_url(&format!("/groups/{group_id}/tracks")))
            .await
    }

    /// Append the client identifier unless the URL already carries one.
    pub fn with_client_id(&self, url: &str) -> String {
        append_client_id(url, &self.credentials.client_id)
    }

    /// Best-effort stream URL for records that carry no `stream_url` at all.
    ///
    /// Older API responses omitted the field; this endpoint shape and the
    /// fallback identifier are not guaranteed to keep working.
    pub fn fallback_stream_url(&self, track_id: u64) -> String {
        format!(
            "{}/tracks/{}/stream?client_id={}",
            self.base_url,
            track_id,
            urlencoding::encode(&self.credentials.fallback_client_id)
        )
    }

    /// Perform the redirect hop from a stream reference to the media URL.
    ///
    /// Checks the `Location` header first, then a JSON body with `location`
    /// or `url`.
    pub async fn resolve_stream(&self, reference: &str) -> Result<String, ProviderError> {
        let url = self.with_client_id(reference);
        let response = self.transport.get_no_redirect(&url).await?;

        if response.is_redirect()
            && let Some(location) = response.location.as_deref().filter(|l| !l.is_empty())
        {
            return Ok(location.to_string());
        }

        if response.is_success()
            && let Ok(body) = response.json::<dto::StreamLocation>()
            && let Some(target) = body.location.or(body.url).filter(|u| !u.is_empty())
        {
            return Ok(target);
        }

        tracing::debug!(
            "Stream reference {} answered {} without a location",
            reference,
            response.status
        );
        Err(ProviderError::Unresolvable(reference.to_string()))
    }

    async fn get_json(&self, url: &str) -> Result<Value, ProviderError> {
        tracing::debug!("GET {}", url);
        let response = self.transport.get(url).await?;
        check_status(&response, url)?;
        Ok(response.json::<Value>()?)
    }
}

fn check_status(response: &HttpResponse, url: &str) -> Result<(), ProviderError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(ProviderError::Status {
            status: response.status,
            url: url.to_string(),
        })
    }
}

/// Append `client_id` as a query parameter unless one is already present.
pub(crate) fn append_client_id(url: &str, client_id: &str) -> String {
    if url.contains("client_id=") {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}client_id={}", urlencoding::encode(client_id))
}
