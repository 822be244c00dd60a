//! Bandcamp page scraping
//!
//! Album and track pages embed their data as a JavaScript object literal
//! assigned to `TralbumData`. It is not valid JSON, so it goes through the
//! tolerant [`jsobject`](crate::jsobject) parser.

mod adapter;

use std::sync::Arc;

use async_trait::async_trait;

pub use adapter::{to_records, to_track};

use super::domain::{ProviderError, SourceRecord, TrackSkip};
use super::traits::Provider;
use crate::jsobject;
use crate::model::{ProviderKind, ResolutionTarget, Track};
use crate::organizer::NamingScheme;
use crate::transport::HttpTransport;

/// Text preceding the embedded album object.
pub const TRALBUM_MARKER: &str = "var TralbumData = ";

/// Bandcamp provider
pub struct BandcampProvider {
    transport: Arc<dyn HttpTransport>,
}

impl BandcampProvider {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

/// Parse the embedded album object out of a page.
pub fn album_from_page(html: &str) -> Result<serde_json::Value, ProviderError> {
    let literal = jsobject::extract_assignment(html, TRALBUM_MARKER)?;
    Ok(jsobject::parse(literal)?)
}

#[async_trait]
impl Provider for BandcampProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Bandcamp
    }

    fn naming(&self) -> NamingScheme {
        NamingScheme::AlbumTrack
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

        let album = album_from_page(&response.text())?;
        let records = to_records(&album)?;
        tracing::info!("Found {} Bandcamp tracks at {}", records.len(), url);
        Ok(records)
    }

    fn normalize(&self, record: SourceRecord) -> Result<Track, TrackSkip> {
        to_track(record)
    }
}
