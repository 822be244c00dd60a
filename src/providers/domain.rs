//! Types shared by every provider adapter.
//!
//! Raw source data enters as a [`SourceRecord`] (whatever shape the provider
//! hands back) and leaves as a normalized [`Track`](crate::model::Track) or a
//! [`TrackSkip`] explaining why it was dropped.

use serde_json::Value;

use crate::jsobject::ParseError;
use crate::model::SkipReason;
use crate::transport::TransportError;

/// One raw entry from a provider, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord(pub Value);

impl SourceRecord {
    /// The record's title, if it has a readable one.
    pub fn title_hint(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }
}

/// A record that normalization refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSkip {
    /// Title for reporting, when the record had one
    pub title: Option<String>,
    pub reason: SkipReason,
}

impl TrackSkip {
    pub fn new(title: Option<&str>, reason: SkipReason) -> Self {
        Self {
            title: title.map(str::to_string),
            reason,
        }
    }
}

/// Errors raised while talking to a provider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Stream reference could not be resolved: {0}")]
    Unresolvable(String),

    #[error("No stream server answered for {0}")]
    DiscoveryExhausted(String),
}

impl From<TransportError> for ProviderError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Network(msg) => ProviderError::Network(msg),
            TransportError::Decode(msg) => ProviderError::Parse(msg),
        }
    }
}

impl From<ParseError> for ProviderError {
    fn from(err: ParseError) -> Self {
        ProviderError::Parse(err.to_string())
    }
}

/// Trimmed, non-empty text or `None`.
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
