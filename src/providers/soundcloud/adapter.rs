//! Adapter layer: SoundCloud JSON to domain models.
//!
//! This is the ONLY place SoundCloud records become [`Track`]s, and the
//! only place resolved resources are classified.

use serde_json::Value;

use super::client::SoundCloudClient;
use super::dto;
use crate::model::{SkipReason, StreamSource, Track};
use crate::providers::domain::{SourceRecord, TrackSkip, non_empty};

/// What a resolve call pointed at.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// Tracks already in hand
    Tracks(Vec<Value>),
    /// A user or artist whose uploads must be listed
    User(u64),
    Group(u64),
}

/// Classify a resolved resource by its `kind` field.
///
/// Unknown kinds are treated as users. Objects without a usable `kind`
/// fall back to a best-effort flat listing: a bare array, or the
/// `collection` member of a paged answer. Likes pages wrap each entry as
/// `{"track": {...}}`, which is unwrapped here.
pub fn classify_resource(resolved: Value) -> Resource {
    if resolved.is_array() {
        return Resource::Tracks(flatten_listing(resolved));
    }

    let head: dto::ResolvedResource = match serde_json::from_value(resolved.clone()) {
        Ok(head) => head,
        Err(_) => return Resource::Tracks(flatten_listing(resolved)),
    };

    match (head.kind.as_deref(), head.id) {
        (Some("track"), _) => Resource::Tracks(vec![resolved]),
        (Some("playlist"), _) => Resource::Tracks(flatten_listing(resolved["tracks"].clone())),
        (Some("group"), Some(id)) => Resource::Group(id),
        (Some(kind), Some(id)) => {
            if kind != "user" && kind != "artist" {
                tracing::debug!("Unknown resource kind {:?}, listing as a user", kind);
            }
            Resource::User(id)
        }
        _ => Resource::Tracks(flatten_listing(resolved)),
    }
}

/// Track objects out of a listing answer, in order.
pub fn flatten_listing(listing: Value) -> Vec<Value> {
    let items = match listing {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("collection") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(mut map) if !map.contains_key("title") && map.contains_key("track") => {
                map.remove("track").unwrap_or(Value::Null)
            }
            other => other,
        })
        .filter(|item| item.is_object())
        .collect()
}

/// Normalize one track record.
pub fn to_track(
    record: SourceRecord,
    client: &SoundCloudClient,
    downloadable_only: bool,
) -> Result<Track, TrackSkip> {
    let title_hint = record.title_hint().map(str::to_string);
    let skip = |reason: SkipReason| TrackSkip::new(title_hint.as_deref(), reason);

    let dto: dto::TrackRecord =
        serde_json::from_value(record.0).map_err(|e| skip(SkipReason::Malformed(e.to_string())))?;

    let artist = non_empty(Some(dto.user.username.as_str()))
        .ok_or_else(|| skip(SkipReason::Malformed("empty username".to_string())))?;
    let title = non_empty(Some(dto.title.as_str()))
        .ok_or_else(|| skip(SkipReason::Malformed("empty title".to_string())))?;

    let stream = if dto.downloadable {
        match non_empty(dto.download_url.as_deref()) {
            Some(url) => StreamSource::DirectUrl(client.with_client_id(&url)),
            None => return Err(skip(SkipReason::NotDownloadable)),
        }
    } else if downloadable_only {
        return Err(skip(SkipReason::DownloadableOnly));
    } else {
        match dto.stream_url {
            Some(Some(url)) if !url.trim().is_empty() => StreamSource::ResolvableReference(url),
            Some(_) => return Err(skip(SkipReason::NotDownloadable)),
            None => {
                tracing::debug!("No stream_url on {:?}, trying the fallback endpoint", title);
                StreamSource::ResolvableReference(client.fallback_stream_url(dto.id))
            }
        }
    };

    Ok(Track {
        artist,
        title,
        album: None,
        track_number: None,
        release_year: dto.release_year.as_ref().and_then(parse_year),
        genre: non_empty(dto.genre.as_deref()),
        artwork_url: non_empty(dto.artwork_url.as_deref()),
        stream,
        downloadable: dto.downloadable,
    })
}

fn parse_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|year| *year > 0)
}
