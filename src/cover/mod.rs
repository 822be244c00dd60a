//! Cover artwork fetching for tag embedding.
//!
//! Artwork is optional everywhere: a failed fetch yields `None` and a log
//! line, never an error. URLs carrying the `-large` size token are first
//! tried at the bigger `-t500x500` size, falling back to the URL as given.

use crate::transport::HttpTransport;

/// Size token on thumbnail URLs that has a larger sibling.
const LARGE_TOKEN: &str = "-large";

/// The larger sibling tried first.
const T500_TOKEN: &str = "-t500x500";

/// Downloaded cover art
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    /// Raw image data
    pub data: Vec<u8>,
    /// MIME type (image/jpeg or image/png)
    pub mime_type: String,
    /// URL the bytes came from
    pub url: String,
}

/// MIME type implied by an artwork URL.
pub fn mime_for_url(url: &str) -> &'static str {
    if url.contains(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}

/// Rewrite the scheme to plain `http`.
pub fn force_http(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("https://") {
        format!("http://{rest}")
    } else if let Some(rest) = url.strip_prefix("//") {
        format!("http://{rest}")
    } else {
        url.to_string()
    }
}

/// Fetch artwork, trying the larger variant first when one exists.
pub async fn fetch_artwork(transport: &dyn HttpTransport, artwork_url: &str) -> Option<CoverArt> {
    let url = force_http(artwork_url);

    if url.contains(LARGE_TOKEN) {
        let larger = url.replace(LARGE_TOKEN, T500_TOKEN);
        match fetch_image(transport, &larger).await {
            Ok(cover) => return Some(cover),
            Err(e) => tracing::debug!("No large artwork at {}: {}, using {}", larger, e, url),
        }
    }

    match fetch_image(transport, &url).await {
        Ok(cover) => Some(cover),
        Err(e) => {
            tracing::warn!("Could not fetch artwork {}: {}", url, e);
            None
        }
    }
}

async fn fetch_image(transport: &dyn HttpTransport, url: &str) -> Result<CoverArt, String> {
    let response = transport.get(url).await.map_err(|e| e.to_string())?;

    if !response.is_success() {
        return Err(format!("HTTP {}", response.status));
    }
    if response.body.is_empty() {
        return Err("empty body".to_string());
    }

    Ok(CoverArt {
        mime_type: mime_for_url(url).to_string(),
        data: response.body,
        url: url.to_string(),
    })
}
