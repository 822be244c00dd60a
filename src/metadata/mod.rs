//! Tag writing for downloaded files.
//!
//! Uses the lofty crate, writing into the file's primary tag type (ID3v2
//! for MP3). Optional fields are written only when present and non-empty;
//! artwork is embedded as the front cover.

use anyhow::{Context, Result};
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag, TagExt};
use std::path::Path;

use crate::cover::CoverArt;
use crate::model::Track;

/// Description stored with embedded artwork.
const COVER_DESCRIPTION: &str = "Cover";

/// The text fields written to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFields {
    pub artist: String,
    pub title: String,
    pub album: Option<String>,
    pub track_number: Option<u32>,
    pub year: Option<i32>,
    pub genre: Option<String>,
}

impl From<&Track> for TagFields {
    fn from(track: &Track) -> Self {
        Self {
            artist: track.artist.clone(),
            title: track.title.clone(),
            album: track.album.clone(),
            track_number: track.track_number,
            year: track.release_year,
            genre: track.genre.clone(),
        }
    }
}

/// Write `fields` and optional artwork into the file at `path`.
pub fn write_tags(path: &Path, fields: &TagFields, cover: Option<&CoverArt>) -> Result<()> {
    let mut tagged_file = Probe::open(path)
        .context("Failed to open file for tagging")?
        .read()
        .context("Failed to read file for tag writing")?;

    let tag_type = tagged_file.primary_tag_type();
    if tagged_file.tag(tag_type).is_none() {
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged_file
        .tag_mut(tag_type)
        .context("File has no writable tag")?;

    tag.set_artist(fields.artist.clone());
    tag.set_title(fields.title.clone());

    if let Some(album) = fields.album.as_deref().filter(|a| !a.is_empty()) {
        tag.set_album(album.to_string());
    }
    if let Some(track_number) = fields.track_number.filter(|n| *n > 0) {
        tag.set_track(track_number);
    }
    if let Some(year) = fields.year.and_then(|y| u32::try_from(y).ok()) {
        tag.set_year(year);
    }
    if let Some(genre) = fields.genre.as_deref().filter(|g| !g.is_empty()) {
        tag.set_genre(genre.to_string());
    }

    if let Some(cover) = cover {
        tracing::debug!("Embedding artwork from {}", cover.url);
        tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(mime_type(&cover.mime_type)),
            Some(COVER_DESCRIPTION.to_string()),
            cover.data.clone(),
        ));
    }

    tag.save_to_path(path, WriteOptions::default())
        .context("Failed to save tags")?;

    Ok(())
}

fn mime_type(mime: &str) -> MimeType {
    match mime {
        "image/png" => MimeType::Png,
        _ => MimeType::Jpeg,
    }
}
