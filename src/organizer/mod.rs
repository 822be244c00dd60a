//! Destination paths for downloaded tracks.
//!
//! Two layouts exist:
//! - [`NamingScheme::ArtistTitle`]: `{Artist} - {Title}.{ext}`, nested under
//!   `{Artist}/` in folder mode
//! - [`NamingScheme::AlbumTrack`]: `{TrackNum} - {Title}.{ext}`, nested under
//!   `{Artist} - {Album}/` in folder mode, prefixed with `{Artist} - ` otherwise
//!
//! Every path component is passed through [`sanitize_filename`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::{StreamSource, Track};

/// Extension used when the stream URL does not name a known container.
pub const DEFAULT_EXTENSION: &str = "mp3";

/// Only files with this extension get tags written.
pub const TAGGABLE_EXTENSION: &str = "mp3";

/// Containers recognized from a stream URL.
const KNOWN_EXTENSIONS: &[&str] = &["mp3", "m4a"];

/// How a provider lays out its files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingScheme {
    ArtistTitle,
    AlbumTrack,
}

/// Replace characters that are invalid in file names with `-`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            _ => c,
        })
        .collect()
}

/// File extension implied by a stream URL, defaulting to mp3.
pub fn extension_for_url(url: &str) -> &'static str {
    let absolute = match url.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    };

    let Ok(parsed) = url::Url::parse(&absolute) else {
        return DEFAULT_EXTENSION;
    };

    let ext = Path::new(parsed.path())
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    KNOWN_EXTENSIONS
        .iter()
        .find(|known| ext.as_deref() == Some(**known))
        .copied()
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Best guess at a track's extension before its stream is resolved.
pub fn extension_hint(track: &Track) -> &'static str {
    match &track.stream {
        StreamSource::DirectUrl(url) => extension_for_url(url),
        StreamSource::ResolvableReference(_) => DEFAULT_EXTENSION,
    }
}

/// Compose the destination path for a track under `root`.
pub fn destination(
    root: &Path,
    track: &Track,
    scheme: NamingScheme,
    folders: bool,
    ext: &str,
) -> PathBuf {
    let artist = sanitize_filename(&track.artist);

    match scheme {
        NamingScheme::ArtistTitle => {
            let file_name = format!("{} - {}.{}", artist, sanitize_filename(&track.title), ext);
            if folders {
                root.join(&artist).join(file_name)
            } else {
                root.join(file_name)
            }
        }
        NamingScheme::AlbumTrack => {
            let track_num = track
                .track_number
                .map(|n| format!("{:02}", n))
                .unwrap_or_else(|| "00".to_string());
            let file_name = sanitize_filename(&format!("{} - {}.{}", track_num, track.title, ext));

            if folders {
                let album = track.album.as_deref().unwrap_or("Unknown Album");
                let directory = sanitize_filename(&format!("{} - {}", track.artist, album));
                root.join(directory).join(file_name)
            } else {
                root.join(format!("{} - {}", artist, file_name))
            }
        }
    }
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent)
        }
        _ => Ok(()),
    }
}

/// Whether tags should be written to this file.
pub fn is_taggable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(TAGGABLE_EXTENSION))
}
