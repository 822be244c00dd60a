//! Adapter layer: the embedded album object to domain models.

use chrono::{Datelike, NaiveDateTime};
use serde_json::{Value, json};

use crate::model::{SkipReason, StreamSource, Track};
use crate::providers::domain::{ProviderError, SourceRecord, TrackSkip, non_empty};

/// Format of `album_release_date`, e.g. `"01 Jan 2014 00:00:00 GMT"`.
pub const RELEASE_DATE_FORMAT: &str = "%d %b %Y %H:%M:%S GMT";

/// Key of the file map entry that is freely streamable.
pub const PREFERRED_FORMAT: &str = "mp3-128";

/// Split an album object into one record per track.
///
/// Album-level fields are copied onto every record so each one normalizes
/// on its own.
pub fn to_records(album: &Value) -> Result<Vec<SourceRecord>, ProviderError> {
    let tracks = album
        .get("trackinfo")
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::Parse("album object has no trackinfo".to_string()))?;

    let shared = json!({
        "artist": album.get("artist").cloned().unwrap_or(Value::Null),
        "album": album.pointer("/current/title").cloned().unwrap_or(Value::Null),
        "release_date": album.get("album_release_date").cloned().unwrap_or(Value::Null),
        "artwork_url": album.get("artFullsizeUrl").cloned().unwrap_or(Value::Null),
    });

    Ok(tracks
        .iter()
        .map(|track| {
            let mut record = shared.clone();
            record["title"] = track.get("title").cloned().unwrap_or(Value::Null);
            record["track_num"] = track.get("track_num").cloned().unwrap_or(Value::Null);
            record["file"] = track.get("file").cloned().unwrap_or(Value::Null);
            SourceRecord(record)
        })
        .collect())
}

/// Normalize one per-track record.
pub fn to_track(record: SourceRecord) -> Result<Track, TrackSkip> {
    let fields = &record.0;
    let title_hint = record.title_hint();
    let skip = |reason: SkipReason| TrackSkip::new(title_hint, reason);

    let artist = non_empty(fields["artist"].as_str())
        .ok_or_else(|| skip(SkipReason::Malformed("album has no artist".to_string())))?;
    let title = non_empty(fields["title"].as_str())
        .ok_or_else(|| skip(SkipReason::Malformed("track has no title".to_string())))?;

    let file_url = non_empty(fields["file"][PREFERRED_FORMAT].as_str())
        .ok_or_else(|| skip(SkipReason::UnavailableForScraping))?;

    Ok(Track {
        artist,
        title,
        album: non_empty(fields["album"].as_str()),
        track_number: fields["track_num"]
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0),
        release_year: fields["release_date"].as_str().and_then(release_year),
        genre: None,
        artwork_url: non_empty(fields["artwork_url"].as_str()),
        stream: StreamSource::DirectUrl(file_url),
        downloadable: false,
    })
}

fn release_year(date: &str) -> Option<i32> {
    match NaiveDateTime::parse_from_str(date.trim(), RELEASE_DATE_FORMAT) {
        Ok(parsed) => Some(parsed.year()),
        Err(e) => {
            tracing::debug!("Unreadable release date {:?}: {}", date, e);
            None
        }
    }
}
