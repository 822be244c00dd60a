//! Mixcloud page scraping
//!
//! A mix page names exactly one track. Its audio location is not on the
//! page; [`discovery`] finds it at stream time.

pub mod discovery;
mod page;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

pub use page::{MixPage, parse_page};

use super::domain::{ProviderError, SourceRecord, TrackSkip, non_empty};
use super::traits::Provider;
use crate::model::{ProviderKind, ResolutionTarget, SkipReason, StreamSource, Track};
use crate::transport::HttpTransport;

/// Genre written to every mix.
pub const MIX_GENRE: &str = "Mix";

/// Mixcloud provider
pub struct MixcloudProvider {
    transport: Arc<dyn HttpTransport>,
}

impl MixcloudProvider {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Provider for MixcloudProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Mixcloud
    }

    async fn resolve(&self, target: &ResolutionTarget) -> Result<Vec<SourceRecord>, ProviderError> {
        let url = target.url();
        tracing::debug!("GET {}", url);

        let response = self.transport.get(url).await?;
        if !response.is_success() {
            return Err(ProviderError::Status {
                status: response.status,
                url: url.to_string(),
            });
        }

        let page = parse_page(&response.text())?;
        if let Some(ref hint) = page.host_hint {
            tracing::debug!("Page previews from {}", hint);
        }

        Ok(vec![SourceRecord(json!({
            "title": page.title,
            "artist": page.artist,
            "artwork_url": page.artwork_url,
            "waveform_url": page.waveform_url,
        }))])
    }

    fn normalize(&self, record: SourceRecord) -> Result<Track, TrackSkip> {
        let fields = &record.0;
        let skip = |detail: &str| {
            TrackSkip::new(record.title_hint(), SkipReason::Malformed(detail.to_string()))
        };

        let title = non_empty(fields["title"].as_str()).ok_or_else(|| skip("no title"))?;
        let artist = non_empty(fields["artist"].as_str()).ok_or_else(|| skip("no artist"))?;
        let waveform_url =
            non_empty(fields["waveform_url"].as_str()).ok_or_else(|| skip("no waveform"))?;

        Ok(Track {
            artist,
            title,
            album: None,
            track_number: None,
            release_year: None,
            genre: Some(MIX_GENRE.to_string()),
            artwork_url: non_empty(fields["artwork_url"].as_str()),
            stream: StreamSource::ResolvableReference(waveform_url),
            downloadable: false,
        })
    }

    async fn resolve_stream(&self, track: &Track) -> Result<String, ProviderError> {
        match &track.stream {
            StreamSource::DirectUrl(url) => Ok(url.clone()),
            StreamSource::ResolvableReference(waveform_url) => {
                discovery::discover(self.transport.as_ref(), waveform_url).await
            }
        }
    }
}
