//! Extraction of mix metadata from a Mixcloud page.
//!
//! The page carries everything as HTML attributes on the player element,
//! plus the `<title>` tag for the name and artist.

use std::sync::OnceLock;

use regex::Regex;

use crate::providers::domain::{ProviderError, non_empty};

/// Suffix Mixcloud appends to every page title.
const TITLE_SUFFIX: &str = " | Mixcloud";

/// Separator between the mix name and the uploader in the title.
const BY_SEPARATOR: &str = " by ";

/// Thumbnail size segment on the page, and the one we fetch instead.
const THUMBNAIL_SMALL: &str = "60/";
const THUMBNAIL_LARGE: &str = "300/";

/// Metadata scraped from a mix page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixPage {
    pub waveform_url: String,
    /// Preview host prefix, informational only
    pub host_hint: Option<String>,
    pub title: String,
    pub artist: String,
    pub artwork_url: Option<String>,
}

static RE_WAVEFORM: OnceLock<Regex> = OnceLock::new();
static RE_PREVIEW: OnceLock<Regex> = OnceLock::new();
static RE_TITLE: OnceLock<Regex> = OnceLock::new();
static RE_THUMBNAIL: OnceLock<Regex> = OnceLock::new();

fn waveform_regex() -> &'static Regex {
    RE_WAVEFORM.get_or_init(|| Regex::new(r#"m-waveform="([^"]+)""#).expect("compile RE_WAVEFORM"))
}

fn preview_regex() -> &'static Regex {
    RE_PREVIEW.get_or_init(|| {
        Regex::new(r#"m-preview="([^"]*?)\.mixcloud\.com"#).expect("compile RE_PREVIEW")
    })
}

fn title_regex() -> &'static Regex {
    RE_TITLE.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("compile RE_TITLE"))
}

fn thumbnail_regex() -> &'static Regex {
    RE_THUMBNAIL
        .get_or_init(|| Regex::new(r#"m-thumbnail-url="([^"]+)""#).expect("compile RE_THUMBNAIL"))
}

/// Scrape a mix page.
pub fn parse_page(html: &str) -> Result<MixPage, ProviderError> {
    let waveform_url = capture(waveform_regex(), html)
        .ok_or_else(|| ProviderError::Parse("page has no m-waveform attribute".to_string()))?;

    let host_hint = capture(preview_regex(), html);

    let raw_title = capture(title_regex(), html)
        .ok_or_else(|| ProviderError::Parse("page has no <title>".to_string()))?;
    let (title, artist) = split_title(&decode_entities(&raw_title))?;

    let artwork_url = capture(thumbnail_regex(), html).map(|url| upgrade_thumbnail(&url));

    Ok(MixPage {
        waveform_url: decode_entities(&waveform_url),
        host_hint,
        title,
        artist,
        artwork_url,
    })
}

fn capture(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// `"Name by Artist | Mixcloud"` into `("Name", "Artist")`.
fn split_title(raw: &str) -> Result<(String, String), ProviderError> {
    let head = raw.split(TITLE_SUFFIX).next().unwrap_or_default();
    let mut parts = head.split(BY_SEPARATOR);

    let title = non_empty(parts.next());
    let artist = non_empty(parts.next());

    match (title, artist) {
        (Some(title), Some(artist)) => Ok((title, artist)),
        _ => Err(ProviderError::Parse(format!(
            "page title {raw:?} does not name an artist"
        ))),
    }
}

/// Ask for the large thumbnail and give protocol-relative URLs a scheme.
pub fn upgrade_thumbnail(url: &str) -> String {
    let url = url.replace(THUMBNAIL_SMALL, THUMBNAIL_LARGE);
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => url,
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mixcloud_page;

    #[test]
    fn test_parse_page() {
        let page = parse_page(&mixcloud_page()).unwrap();
        assert_eq!(
            page.waveform_url,
            "https://waveforms-mix.netdna-ssl.com/2/4/a/b/deep-session.json"
        );
        assert_eq!(page.host_hint.as_deref(), Some("https://preview14"));
        assert_eq!(page.title, "Deep Session");
        assert_eq!(page.artist, "DJ Someone");
        assert_eq!(
            page.artwork_url.as_deref(),
            Some("https://images-mix.netdna-ssl.com/w/300/h/300/q/85/upload/images/extaudio/abc.jpg")
        );
    }

    #[test]
    fn test_missing_waveform() {
        let html = "<title>Mix by DJ | Mixcloud</title>";
        assert!(matches!(parse_page(html), Err(ProviderError::Parse(_))));
    }

    #[test]
    fn test_title_without_artist() {
        let html = r#"<div m-waveform="https://w/x.json"></div><title>Just a mix | Mixcloud</title>"#;
        assert!(matches!(parse_page(html), Err(ProviderError::Parse(_))));
    }

    #[test]
    fn test_split_title_takes_second_segment() {
        let (title, artist) = split_title("Live by Night by The Crew by Guest | Mixcloud").unwrap();
        assert_eq!(title, "Live");
        assert_eq!(artist, "Night");
    }

    #[test]
    fn test_title_entities_are_decoded() {
        let (title, artist) = split_title(&decode_entities("Drum &amp; Bass by A &amp; B | Mixcloud")).unwrap();
        assert_eq!(title, "Drum & Bass");
        assert_eq!(artist, "A & B");
    }

    #[test]
    fn test_upgrade_thumbnail() {
        assert_eq!(
            upgrade_thumbnail("//images.mixcloud.com/w/60/h/60/x.jpg"),
            "https://images.mixcloud.com/w/300/h/300/x.jpg"
        );
        assert_eq!(upgrade_thumbnail("https://a/b.jpg"), "https://a/b.jpg");
    }
}
