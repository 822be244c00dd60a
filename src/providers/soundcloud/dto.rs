//! SoundCloud API Data Transfer Objects
//!
//! These types match what the public API returns for the fields we read.
//! DO NOT use these types outside the soundcloud module - convert to
//! [`Track`](crate::model::Track) in the adapter.
//!
//! Example track:
//! ```json
//! {
//!   "kind": "track",
//!   "id": 123,
//!   "title": "Song Title",
//!   "user": {"id": 7, "username": "Artist"},
//!   "downloadable": false,
//!   "download_url": null,
//!   "stream_url": "https://api.soundcloud.com/tracks/123/stream",
//!   "release_year": 2014,
//!   "genre": "House",
//!   "artwork_url": "https://i1.sndcdn.com/artworks-000-large.jpg"
//! }
//! ```

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Just enough of a resolved resource to decide what it is.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolvedResource {
    pub kind: Option<String>,
    pub id: Option<u64>,
}

/// A single track record
#[derive(Debug, Clone, Deserialize)]
pub struct TrackRecord {
    pub id: u64,
    pub title: String,
    pub user: User,
    pub downloadable: bool,
    #[serde(default)]
    pub download_url: Option<String>,
    /// Outer `None`: key absent. `Some(None)`: key present but null.
    #[serde(default, deserialize_with = "present")]
    pub stream_url: Option<Option<String>>,
    /// Number or numeric string, depending on the record's age
    #[serde(default)]
    pub release_year: Option<Value>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub artwork_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub username: String,
}

/// Body of a stream-endpoint answer that did not redirect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamLocation {
    pub location: Option<String>,
    pub url: Option<String>,
}

/// Keep "present but null" distinct from "absent".
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
