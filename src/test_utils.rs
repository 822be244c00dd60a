//! Test fixtures shared across soundscrape's test modules.
//!
//! Provides a ready-made [`Track`], a SoundCloud track record, and
//! trimmed-down Bandcamp and Mixcloud pages carrying just the markup the
//! scrapers read.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::mock_track;
//!
//! let track = Track {
//!     title: "Custom Title".to_string(),
//!     ..mock_track()
//! };
//! ```

use serde_json::{Value, json};

use crate::model::{StreamSource, Track};

/// Creates a mock Track with sensible defaults.
///
/// Customize using struct update syntax.
pub fn mock_track() -> Track {
    Track {
        artist: "Test Artist".to_string(),
        title: "Test Track".to_string(),
        album: Some("Test Album".to_string()),
        track_number: Some(1),
        release_year: Some(2014),
        genre: Some("House".to_string()),
        artwork_url: None,
        stream: StreamSource::DirectUrl("https://cdn.test/track.mp3".to_string()),
        downloadable: true,
    }
}

/// A few silent MPEG-1 Layer III frames (128 kbps, 44.1 kHz).
///
/// Small enough to serve from a mock transport, real enough for lofty to
/// probe and tag.
pub fn silent_mp3() -> Vec<u8> {
    let mut frame = vec![0xFF, 0xFB, 0x90, 0x00];
    frame.resize(417, 0);
    frame.repeat(20)
}

/// A SoundCloud track record as the API returns it.
///
/// Stream and download links point at `https://api.test`. The download
/// link is null unless `downloadable` is set.
pub fn soundcloud_track_json(id: u64, title: &str, downloadable: bool) -> Value {
    let download_url = if downloadable {
        json!(format!("https://api.test/tracks/{id}/download"))
    } else {
        Value::Null
    };

    json!({
        "kind": "track",
        "id": id,
        "title": title,
        "user": {"username": "Test Artist"},
        "downloadable": downloadable,
        "download_url": download_url,
        "stream_url": format!("https://api.test/tracks/{id}/stream"),
        "release_year": 2014,
        "genre": "House",
        "artwork_url": null
    })
}

/// A Bandcamp album page.
///
/// The embedded literal uses single quotes, unquoted keys, a split string
/// and trailing commas. The third track has no file.
pub fn bandcamp_page() -> String {
    r#"<!DOCTYPE html>
<html>
<head><title>First LP | The Band</title></head>
<body>
<script type="text/javascript">
    var SiteData = { siteroot: "https://bandcamp.com" };
    var TralbumData = {
        current: {
            title: 'First LP',
            release_date: '05 Mar 2013 00:00:00 GMT',
        },
        // page furniture
        artist: 'The Band',
        album_release_date: "05 Mar 2013 " + "00:00:00 GMT",
        artFullsizeUrl: 'https://f4.bcbits.com/img/a1_10.jpg',
        trackinfo: [
            {title: 'Opener', track_num: 1, file: {'mp3-128': 'https://t4.bcbits.com/stream/one'}},
            {title: "Second", track_num: 2, file: {"mp3-128": "https://t4.bcbits.com/stream/two"}},
            {title: 'Hidden Track', track_num: 3, file: null},
        ],
        url: "https://band.bandcamp.com" + "/album/first-lp",
    };
    var EmbedData = { tralbum_param: { name: "album" } };
</script>
</body>
</html>
"#
    .to_string()
}

/// A Mixcloud mix page for "Deep Session" by "DJ Someone".
pub fn mixcloud_page() -> String {
    r#"<!DOCTYPE html>
<html>
<head>
<title>Deep Session by DJ Someone | Mixcloud</title>
</head>
<body>
<div class="player"
     m-waveform="https://waveforms-mix.netdna-ssl.com/2/4/a/b/deep-session.json"
     m-preview="https://preview14.mixcloud.com/previews/2/4/a/b/deep-session.mp3"
     m-thumbnail-url="//images-mix.netdna-ssl.com/w/60/h/60/q/85/upload/images/extaudio/abc.jpg">
</div>
</body>
</html>
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_track_defaults() {
        let track = mock_track();
        assert_eq!(track.artist, "Test Artist");
        assert_eq!(track.title, "Test Track");
        assert_eq!(track.track_number, Some(1));
        assert!(matches!(track.stream, StreamSource::DirectUrl(_)));
    }

    #[test]
    fn test_soundcloud_record_links() {
        let open = soundcloud_track_json(7, "Open", true);
        assert_eq!(open["download_url"], "https://api.test/tracks/7/download");

        let locked = soundcloud_track_json(8, "Locked", false);
        assert!(locked["download_url"].is_null());
        assert_eq!(locked["stream_url"], "https://api.test/tracks/8/stream");
    }

    #[test]
    fn test_pages_carry_scraped_markers() {
        assert!(bandcamp_page().contains(crate::providers::bandcamp::TRALBUM_MARKER));
        assert!(mixcloud_page().contains("m-waveform="));
    }
}
