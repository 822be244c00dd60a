//! Stream endpoint discovery.
//!
//! Mixcloud serves audio from a pool of numbered CDN hosts and gives no hint
//! which one holds a given mix. Discovery rebuilds the media path from the
//! waveform URL and probes each host with HEAD: every host for the original
//! upload first, then every host for the transcoded fallback. The first 200
//! wins. Probes run one at a time and are never retried.

use std::ops::RangeInclusive;

use crate::providers::domain::ProviderError;
use crate::transport::HttpTransport;

/// Numbered stream hosts to probe, in order.
pub const STREAM_SERVERS: RangeInclusive<u16> = 14..=23;

/// Domain the numbered stream hosts live under.
pub const CDN_DOMAIN: &str = "mixcloud.com";

/// Suffix stripped from the waveform path to get the media path.
const WAVEFORM_SUFFIX: &str = ".json";

/// One encoding the CDN may hold a mix in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingTier {
    pub name: &'static str,
    pub path_prefix: &'static str,
    pub extension: &'static str,
}

/// The original upload.
pub const ORIGINAL: EncodingTier = EncodingTier {
    name: "original",
    path_prefix: "c/originals",
    extension: "mp3",
};

/// Low-bitrate transcode, present for most mixes.
pub const TRANSCODED: EncodingTier = EncodingTier {
    name: "transcoded",
    path_prefix: "c/m4a/64",
    extension: "m4a",
};

/// Tiers in probe order.
pub const TIERS: [EncodingTier; 2] = [ORIGINAL, TRANSCODED];

/// Most HEAD requests one discovery can make.
pub fn max_probes() -> usize {
    STREAM_SERVERS.count() * TIERS.len()
}

/// Media path of a waveform URL, without extension.
///
/// `https://waveforms.example/2/a/b.json` gives `/2/a/b`.
pub fn media_path(waveform_url: &str) -> Result<String, ProviderError> {
    let absolute = match waveform_url.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => waveform_url.to_string(),
    };

    let parsed = url::Url::parse(&absolute)
        .map_err(|e| ProviderError::Parse(format!("bad waveform URL {waveform_url:?}: {e}")))?;

    let path = parsed.path();
    let path = path.strip_suffix(WAVEFORM_SUFFIX).unwrap_or(path);
    if path.is_empty() || path == "/" {
        return Err(ProviderError::Parse(format!(
            "waveform URL {waveform_url:?} has no path"
        )));
    }
    Ok(path.to_string())
}

/// Candidate URL for one host and tier.
pub fn candidate_url(server: u16, tier: &EncodingTier, media_path: &str) -> String {
    format!(
        "https://stream{server}.{CDN_DOMAIN}/{}{media_path}.{}",
        tier.path_prefix, tier.extension
    )
}

/// Find a host serving the mix behind `waveform_url`.
pub async fn discover(
    transport: &dyn HttpTransport,
    waveform_url: &str,
) -> Result<String, ProviderError> {
    let path = media_path(waveform_url)?;

    for tier in &TIERS {
        for server in STREAM_SERVERS {
            let url = candidate_url(server, tier, &path);
            match transport.head(&url).await {
                Ok(200) => {
                    tracing::debug!("Found {} stream at {}", tier.name, url);
                    return Ok(url);
                }
                Ok(status) => tracing::trace!("Probe {} answered {}", url, status),
                Err(e) => tracing::trace!("Probe {} failed: {}", url, e),
            }
        }
        tracing::debug!("No {} stream on any host", tier.name);
    }

    tracing::debug!("Discovery gave up after {} probes", max_probes());
    Err(ProviderError::DiscoveryExhausted(waveform_url.to_string()))
}
