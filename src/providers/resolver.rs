//! Map the command-line handle and flags onto a provider and a target.
//!
//! First match wins at every step. The only input that cannot be classified
//! is an empty handle; anything else lands somewhere, and the provider sorts
//! out what the target really is.

use crate::error::{Error, Result};
use crate::model::{ProviderKind, ResolutionTarget};

const SOUNDCLOUD_HOST: &str = "soundcloud.com";
const BANDCAMP_HOST: &str = "bandcamp.com";
const MIXCLOUD_HOST: &str = "mixcloud.com";

/// Second path segments that list a user's tracks rather than name one.
const USER_SUBPAGES: &[&str] = &["tracks", "reposts", "albums", "popular-tracks"];

/// Flags that shape classification.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Provider forced by a command-line flag
    pub provider: Option<ProviderKind>,
    pub as_group: bool,
    pub likes_only: bool,
    /// Track name under a bare handle; empty means "whole library"
    pub single_track_name: String,
    pub max_tracks: Option<usize>,
}

/// Result of classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub kind: ProviderKind,
    pub target: ResolutionTarget,
    /// Maximum number of tracks to attempt
    pub limit: Option<usize>,
}

/// Classify `handle` under `options`.
pub fn classify(handle: &str, options: &ResolveOptions) -> Result<Resolution> {
    let handle = handle.trim();
    if handle.is_empty() {
        return Err(Error::classification("no artist handle or URL given"));
    }

    let kind = provider_for(handle, options.provider);
    let target = match kind {
        ProviderKind::SoundCloud => soundcloud_target(handle, options),
        ProviderKind::Bandcamp => bandcamp_target(handle),
        ProviderKind::Mixcloud => mixcloud_target(handle),
    };

    let limit = match target {
        ResolutionTarget::SingleTrack(_) => Some(options.max_tracks.map_or(1, |n| n.min(1))),
        _ => options.max_tracks,
    };

    tracing::debug!("Classified {:?} as {} {:?} (limit {:?})", handle, kind, target, limit);

    Ok(Resolution {
        kind,
        target,
        limit,
    })
}

fn provider_for(handle: &str, forced: Option<ProviderKind>) -> ProviderKind {
    let lower = handle.to_lowercase();
    if lower.contains(BANDCAMP_HOST) || forced == Some(ProviderKind::Bandcamp) {
        ProviderKind::Bandcamp
    } else if lower.contains(MIXCLOUD_HOST) || forced == Some(ProviderKind::Mixcloud) {
        ProviderKind::Mixcloud
    } else {
        ProviderKind::SoundCloud
    }
}

fn soundcloud_target(handle: &str, options: &ResolveOptions) -> ResolutionTarget {
    if !handle.to_lowercase().contains("soundcloud") {
        let handle = handle.to_lowercase();
        let track_name = options.single_track_name.trim().to_lowercase();

        if options.as_group {
            return ResolutionTarget::Group(format!("https://{SOUNDCLOUD_HOST}/groups/{handle}"));
        }
        if !track_name.is_empty() {
            return ResolutionTarget::SingleTrack(format!(
                "https://{SOUNDCLOUD_HOST}/{handle}/{track_name}"
            ));
        }

        let mut url = format!("https://{SOUNDCLOUD_HOST}/{handle}");
        if options.likes_only {
            url.push_str("/likes");
        }
        return ResolutionTarget::UserLibrary {
            url,
            likes: options.likes_only,
        };
    }

    let url = with_scheme(handle);
    let segments = path_segments(&url);

    if segments.first().is_some_and(|s| s == "groups") {
        ResolutionTarget::Group(url)
    } else if segments.iter().any(|s| s == "sets") {
        ResolutionTarget::Collection(url)
    } else if segments.last().is_some_and(|s| s == "likes") {
        ResolutionTarget::UserLibrary { url, likes: true }
    } else if segments.len() == 2 && !USER_SUBPAGES.contains(&segments[1].as_str()) {
        ResolutionTarget::SingleTrack(url)
    } else {
        ResolutionTarget::UserLibrary { url, likes: false }
    }
}

fn bandcamp_target(handle: &str) -> ResolutionTarget {
    if !handle.to_lowercase().contains(BANDCAMP_HOST) {
        return ResolutionTarget::Collection(format!(
            "https://{}.{BANDCAMP_HOST}",
            handle.to_lowercase()
        ));
    }

    let url = with_scheme(handle);
    if path_segments(&url).first().is_some_and(|s| s == "track") {
        ResolutionTarget::SingleTrack(url)
    } else {
        ResolutionTarget::Collection(url)
    }
}

fn mixcloud_target(handle: &str) -> ResolutionTarget {
    if handle.to_lowercase().contains(MIXCLOUD_HOST) {
        ResolutionTarget::SingleTrack(with_scheme(handle))
    } else {
        ResolutionTarget::SingleTrack(format!("https://{MIXCLOUD_HOST}/{handle}"))
    }
}

fn with_scheme(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{}", url.trim_start_matches('/'))
    }
}

/// Non-empty path segments of `url`; empty if it does not parse.
fn path_segments(url: &str) -> Vec<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed.path_segments().map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> ResolveOptions {
        ResolveOptions::default()
    }

    #[test]
    fn test_empty_handle_is_rejected() {
        assert!(matches!(classify("   ", &opts()), Err(Error::Classification(_))));
        assert!(classify("", &opts()).is_err());
    }

    #[test]
    fn test_bare_soundcloud_handle() {
        let resolution = classify("Artist", &opts()).unwrap();
        assert_eq!(resolution.kind, ProviderKind::SoundCloud);
        assert_eq!(
            resolution.target,
            ResolutionTarget::UserLibrary {
                url: "https://soundcloud.com/artist".to_string(),
                likes: false
            }
        );
        assert_eq!(resolution.limit, None);
    }

    #[test]
    fn test_bare_handle_flags() {
        let group = classify("Crew", &ResolveOptions { as_group: true, ..opts() }).unwrap();
        assert_eq!(
            group.target,
            ResolutionTarget::Group("https://soundcloud.com/groups/crew".to_string())
        );

        let likes = classify("artist", &ResolveOptions { likes_only: true, ..opts() }).unwrap();
        assert_eq!(
            likes.target,
            ResolutionTarget::UserLibrary {
                url: "https://soundcloud.com/artist/likes".to_string(),
                likes: true
            }
        );

        let single = classify(
            "artist",
            &ResolveOptions {
                single_track_name: "My-Song".to_string(),
                max_tracks: Some(10),
                ..opts()
            },
        )
        .unwrap();
        assert_eq!(
            single.target,
            ResolutionTarget::SingleTrack("https://soundcloud.com/artist/my-song".to_string())
        );
        assert_eq!(single.limit, Some(1));
    }

    #[test]
    fn test_group_beats_track_name() {
        let options = ResolveOptions {
            as_group: true,
            single_track_name: "song".to_string(),
            ..opts()
        };
        let resolution = classify("crew", &options).unwrap();
        assert!(matches!(resolution.target, ResolutionTarget::Group(_)));
    }

    #[test]
    fn test_full_soundcloud_urls() {
        let cases = [
            (
                "https://soundcloud.com/groups/deep",
                ResolutionTarget::Group("https://soundcloud.com/groups/deep".to_string()),
            ),
            (
                "https://soundcloud.com/artist/sets/ep",
                ResolutionTarget::Collection("https://soundcloud.com/artist/sets/ep".to_string()),
            ),
            (
                "https://soundcloud.com/artist/likes",
                ResolutionTarget::UserLibrary {
                    url: "https://soundcloud.com/artist/likes".to_string(),
                    likes: true,
                },
            ),
            (
                "https://soundcloud.com/artist/song",
                ResolutionTarget::SingleTrack("https://soundcloud.com/artist/song".to_string()),
            ),
            (
                "soundcloud.com/artist",
                ResolutionTarget::UserLibrary {
                    url: "https://soundcloud.com/artist".to_string(),
                    likes: false,
                },
            ),
        ];

        for (input, expected) in cases {
            let resolution = classify(input, &opts()).unwrap();
            assert_eq!(resolution.kind, ProviderKind::SoundCloud, "{input}");
            assert_eq!(resolution.target, expected, "{input}");
        }
    }

    #[test]
    fn test_user_subpages_are_not_single_tracks() {
        let options = ResolveOptions {
            max_tracks: Some(50),
            ..opts()
        };

        for page in ["tracks", "reposts", "albums", "popular-tracks"] {
            let url = format!("https://soundcloud.com/artist/{page}");
            let resolution = classify(&url, &options).unwrap();
            assert_eq!(
                resolution.target,
                ResolutionTarget::UserLibrary { url, likes: false }
            );
            assert_eq!(resolution.limit, Some(50));
        }
    }

    #[test]
    fn test_bandcamp_classification() {
        let album = classify("https://band.bandcamp.com/album/lp", &opts()).unwrap();
        assert_eq!(album.kind, ProviderKind::Bandcamp);
        assert_eq!(
            album.target,
            ResolutionTarget::Collection("https://band.bandcamp.com/album/lp".to_string())
        );

        let track = classify("https://band.bandcamp.com/track/one", &opts()).unwrap();
        assert!(matches!(track.target, ResolutionTarget::SingleTrack(_)));
        assert_eq!(track.limit, Some(1));

        let flagged = classify(
            "Band",
            &ResolveOptions {
                provider: Some(ProviderKind::Bandcamp),
                ..opts()
            },
        )
        .unwrap();
        assert_eq!(
            flagged.target,
            ResolutionTarget::Collection("https://band.bandcamp.com".to_string())
        );
    }

    #[test]
    fn test_mixcloud_classification() {
        let full = classify("https://www.mixcloud.com/dj/set-1/", &opts()).unwrap();
        assert_eq!(full.kind, ProviderKind::Mixcloud);
        assert_eq!(
            full.target,
            ResolutionTarget::SingleTrack("https://www.mixcloud.com/dj/set-1/".to_string())
        );

        let flagged = classify(
            "dj/set-1",
            &ResolveOptions {
                provider: Some(ProviderKind::Mixcloud),
                max_tracks: Some(0),
                ..opts()
            },
        )
        .unwrap();
        assert_eq!(
            flagged.target,
            ResolutionTarget::SingleTrack("https://mixcloud.com/dj/set-1".to_string())
        );
        assert_eq!(flagged.limit, Some(0));
    }

    #[test]
    fn test_url_substring_beats_other_flag() {
        let options = ResolveOptions {
            provider: Some(ProviderKind::Mixcloud),
            ..opts()
        };
        let resolution = classify("https://band.bandcamp.com/album/x", &options).unwrap();
        assert_eq!(resolution.kind, ProviderKind::Bandcamp);
    }
}
