//! SoundCloud API integration
//!
//! Resolves public page URLs through the API's `resolve` endpoint, lists
//! user or group uploads, and performs the one redirect hop that turns a
//! stream reference into a media URL.

mod adapter;
mod client;
pub mod dto;

use std::sync::Arc;

use async_trait::async_trait;

pub use adapter::{Resource, classify_resource, to_track};
pub use client::SoundCloudClient;

use super::domain::{ProviderError, SourceRecord, TrackSkip};
use super::traits::Provider;
use crate::config::Credentials;
use crate::model::{ProviderKind, ResolutionTarget, StreamSource, Track};
use crate::transport::HttpTransport;

/// SoundCloud provider
pub struct SoundCloudProvider {
    client: SoundCloudClient,
    downloadable_only: bool,
}

impl SoundCloudProvider {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credentials: Credentials,
        api_base: &str,
        downloadable_only: bool,
    ) -> Self {
        Self {
            client: SoundCloudClient::new(transport, credentials, api_base),
            downloadable_only,
        }
    }
}

#[async_trait]
impl Provider for SoundCloudProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::SoundCloud
    }

    async fn resolve(&self, target: &ResolutionTarget) -> Result<Vec<SourceRecord>, ProviderError> {
        let resolved = self.client.resolve(target.url()).await?;

        let tracks = match classify_resource(resolved) {
            Resource::Tracks(tracks) => tracks,
            Resource::User(id) => adapter::flatten_listing(self.client.user_tracks(id).await?),
            Resource::Group(id) => adapter::flatten_listing(self.client.group_tracks(id).await?),
        };

        tracing::info!("Found {} SoundCloud tracks at {}", tracks.len(), target.url());
        Ok(tracks.into_iter().map(SourceRecord).collect())
    }

    fn normalize(&self, record: SourceRecord) -> Result<Track, TrackSkip> {
        to_track(record, &self.client, self.downloadable_only)
    }

    async fn resolve_stream(&self, track: &Track) -> Result<String, ProviderError> {
        match &track.stream {
            StreamSource::DirectUrl(url) => Ok(url.clone()),
            StreamSource::ResolvableReference(reference) => {
                self.client.resolve_stream(reference).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::soundcloud_track_json;
    use crate::transport::mocks::{Method, MockTransport};
    use serde_json::json;

    const RESOLVE_ARTIST: &str = "https://api.test/resolve?url=https%3A%2F%2Fsoundcloud.com%2Fartist&client_id=cid&limit=200";

    fn provider(mock: MockTransport) -> (Arc<MockTransport>, SoundCloudProvider) {
        let mock = Arc::new(mock);
        let credentials = Credentials {
            client_id: "cid".to_string(),
            fallback_client_id: "fid".to_string(),
        };
        let provider = SoundCloudProvider::new(mock.clone(), credentials, "https://api.test", false);
        (mock, provider)
    }

    fn user_target() -> ResolutionTarget {
        ResolutionTarget::UserLibrary {
            url: "https://soundcloud.com/artist".to_string(),
            likes: false,
        }
    }

    #[tokio::test]
    async fn test_user_resolves_to_uploads() {
        let (mock, provider) = provider(
            MockTransport::new()
                .with_json(RESOLVE_ARTIST, &json!({"kind": "user", "id": 42}))
                .with_json(
                    "https://api.test/users/42/tracks?client_id=cid&limit=200",
                    &json!([
                        soundcloud_track_json(1, "One", false),
                        soundcloud_track_json(2, "Two", false)
                    ]),
                ),
        );

        let records = provider.resolve(&user_target()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title_hint(), Some("One"));
        assert_eq!(mock.count(Method::Get), 2);
    }

    #[tokio::test]
    async fn test_group_listing() {
        let (_, provider) = provider(
            MockTransport::new()
                .with_json(
                    "https://api.test/resolve?url=https%3A%2F%2Fsoundcloud.com%2Fgroups%2Fdeep&client_id=cid&limit=200",
                    &json!({"kind": "group", "id": 8}),
                )
                .with_json(
                    "https://api.test/groups/8/tracks?client_id=cid&limit=200",
                    &json!({"collection": [soundcloud_track_json(3, "Three", false)]}),
                ),
        );

        let target = ResolutionTarget::Group("https://soundcloud.com/groups/deep".to_string());
        let records = provider.resolve(&target).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_resolve_is_an_error() {
        let (_, provider) = provider(MockTransport::new().with_failure(RESOLVE_ARTIST));
        let result = provider.resolve(&user_target()).await;
        assert!(matches!(result, Err(ProviderError::Network(_))));
    }

    #[tokio::test]
    async fn test_resolve_stream_for_reference() {
        let (_, provider) = provider(MockTransport::new().with_redirect(
            "https://api.test/tracks/2/stream?client_id=cid",
            "https://cdn.test/2.mp3",
        ));

        let track = provider
            .normalize(SourceRecord(soundcloud_track_json(2, "Two", false)))
            .unwrap();
        let url = provider.resolve_stream(&track).await.unwrap();
        assert_eq!(url, "https://cdn.test/2.mp3");
    }
}
