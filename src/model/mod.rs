//! Core data models shared by every provider.
//!
//! Defines the normalized [`Track`] all providers converge to, the
//! [`ResolutionTarget`] built from the command line, and the per-track
//! [`DownloadResult`] handed back to the caller.

use std::fmt;
use std::path::PathBuf;

/// The three track sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    SoundCloud,
    Bandcamp,
    Mixcloud,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::SoundCloud => "SoundCloud",
            ProviderKind::Bandcamp => "Bandcamp",
            ProviderKind::Mixcloud => "Mixcloud",
        };
        f.write_str(name)
    }
}

/// Where a track's audio can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSource {
    /// Immediately fetchable URL
    DirectUrl(String),
    /// Opaque reference needing one more provider call before a URL is known
    ResolvableReference(String),
}

/// A track normalized from any provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub artist: String,
    pub title: String,
    pub album: Option<String>,
    /// 1-based position within the album
    pub track_number: Option<u32>,
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    /// Absolute or protocol-relative
    pub artwork_url: Option<String>,
    pub stream: StreamSource,
    /// True only for a stable, licensed download link
    pub downloadable: bool,
}

/// What the command-line input names.
///
/// Built once per invocation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionTarget {
    SingleTrack(String),
    Collection(String),
    UserLibrary { url: String, likes: bool },
    Group(String),
}

impl ResolutionTarget {
    /// The URL handed to the provider.
    pub fn url(&self) -> &str {
        match self {
            ResolutionTarget::SingleTrack(url)
            | ResolutionTarget::Collection(url)
            | ResolutionTarget::Group(url) => url,
            ResolutionTarget::UserLibrary { url, .. } => url,
        }
    }
}

/// Why a track was not downloaded. Each variant has its own user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Destination exists in folder mode
    AlreadyDownloaded,
    /// No usable stream or download link
    NotDownloadable,
    /// Filtered out by the downloadable-only option
    DownloadableOnly,
    /// Scraped page lists the track without a file
    UnavailableForScraping,
    /// The provider record could not be read
    Malformed(String),
    /// The redirect hop or endpoint discovery failed
    StreamUnresolved(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyDownloaded => write!(f, "Track already downloaded"),
            SkipReason::NotDownloadable => write!(f, "is not downloadable"),
            SkipReason::DownloadableOnly => write!(f, "Skipping (no downloadable link)"),
            SkipReason::UnavailableForScraping => write!(f, "Track unavailable for scraping"),
            SkipReason::Malformed(detail) => write!(f, "is not downloadable ({detail})"),
            SkipReason::StreamUnresolved(detail) => {
                write!(f, "stream could not be resolved ({detail})")
            }
        }
    }
}

/// Outcome of one attempted track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadStatus {
    Success,
    Skipped(SkipReason),
    /// Download failed; the file on disk may be partial
    Failed(String),
}

/// One per attempted track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    /// Display label for reporting
    pub title: String,
    /// Destination path (empty when no destination was ever composed)
    pub path: PathBuf,
    pub bytes_written: u64,
    pub status: DownloadStatus,
}

impl DownloadResult {
    pub fn skipped(title: impl Into<String>, path: impl Into<PathBuf>, reason: SkipReason) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            bytes_written: 0,
            status: DownloadStatus::Skipped(reason),
        }
    }

    pub fn failed(
        title: impl Into<String>,
        path: impl Into<PathBuf>,
        bytes_written: u64,
        cause: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            bytes_written,
            status: DownloadStatus::Failed(cause.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == DownloadStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_url() {
        let target = ResolutionTarget::UserLibrary {
            url: "https://soundcloud.com/foo/likes".to_string(),
            likes: true,
        };
        assert_eq!(target.url(), "https://soundcloud.com/foo/likes");
        assert_eq!(
            ResolutionTarget::Group("https://soundcloud.com/groups/x".to_string()).url(),
            "https://soundcloud.com/groups/x"
        );
    }

    #[test]
    fn test_skip_reasons_are_distinct() {
        assert_eq!(SkipReason::NotDownloadable.to_string(), "is not downloadable");
        assert_eq!(
            SkipReason::UnavailableForScraping.to_string(),
            "Track unavailable for scraping"
        );
        assert_ne!(
            SkipReason::NotDownloadable.to_string(),
            SkipReason::UnavailableForScraping.to_string()
        );
    }

    #[test]
    fn test_download_result_helpers() {
        let skipped = DownloadResult::skipped("T", "a.mp3", SkipReason::AlreadyDownloaded);
        assert!(!skipped.is_success());
        assert_eq!(skipped.bytes_written, 0);

        let failed = DownloadResult::failed("T", "a.mp3", 12, "reset");
        assert_eq!(failed.status, DownloadStatus::Failed("reset".to_string()));
        assert_eq!(failed.bytes_written, 12);
    }
}
