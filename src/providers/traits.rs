//! The capability every track source implements.
//!
//! One implementation is chosen at startup (see
//! [`build_provider`](super::build_provider)) and driven by the pipeline:
//! `resolve` once, `normalize` per record, `resolve_stream` per track that
//! survives normalization.

use async_trait::async_trait;

use super::domain::{ProviderError, SourceRecord, TrackSkip};
use crate::model::{ProviderKind, ResolutionTarget, StreamSource, Track};
use crate::organizer::NamingScheme;

/// A source of tracks.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Which source this is.
    fn kind(&self) -> ProviderKind;

    /// How downloaded files are named.
    fn naming(&self) -> NamingScheme {
        NamingScheme::ArtistTitle
    }

    /// Fetch the raw records the target names, in source order.
    async fn resolve(&self, target: &ResolutionTarget) -> Result<Vec<SourceRecord>, ProviderError>;

    /// Turn one raw record into a track, or explain why not.
    fn normalize(&self, record: SourceRecord) -> Result<Track, TrackSkip>;

    /// Produce a fetchable URL for the track's stream.
    async fn resolve_stream(&self, track: &Track) -> Result<String, ProviderError> {
        match &track.stream {
            StreamSource::DirectUrl(url) => Ok(url.clone()),
            StreamSource::ResolvableReference(reference) => {
                Err(ProviderError::Unresolvable(reference.clone()))
            }
        }
    }
}
