//! The per-run flow from a resolved target to files on disk.
//!
//! Tracks are handled one at a time in source order. Only the initial
//! `resolve` can fail the run; everything after it is reported per track
//! as a [`DownloadResult`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cover;
use crate::download::Downloader;
use crate::error::{Result, ResultExt};
use crate::metadata::{self, TagFields};
use crate::model::{DownloadResult, ResolutionTarget, SkipReason, Track};
use crate::organizer::{self, extension_for_url, extension_hint};
use crate::providers::Provider;
use crate::transport::HttpTransport;

/// How a run behaves.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Maximum number of records to attempt
    pub limit: Option<usize>,
    /// Nest files in per-artist (or per-album) folders and skip existing ones
    pub folders: bool,
    pub output_dir: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            limit: None,
            folders: false,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Everything a run needs besides the provider.
pub struct Pipeline {
    transport: Arc<dyn HttpTransport>,
    downloader: Downloader,
}

impl Pipeline {
    pub fn new(transport: Arc<dyn HttpTransport>, downloader: Downloader) -> Self {
        Self {
            transport,
            downloader,
        }
    }

    /// Resolve `target` with `provider` and process every track.
    pub async fn run(
        &self,
        provider: &dyn Provider,
        target: &ResolutionTarget,
        options: &RunOptions,
    ) -> Result<Vec<DownloadResult>> {
        let records = provider
            .resolve(target)
            .await
            .with_context(format!("Failed to resolve {}", target.url()))?;

        let limit = options.limit.unwrap_or(usize::MAX);
        if records.len() > limit {
            tracing::info!("Limiting to the first {} of {} tracks", limit, records.len());
        }

        let mut results = Vec::new();
        for record in records.into_iter().take(limit) {
            let result = match provider.normalize(record) {
                Ok(track) => self.process(provider, &track, options).await,
                Err(skip) => {
                    let title = skip.title.unwrap_or_else(|| "(untitled)".to_string());
                    tracing::info!("Skipping {}: {}", title, skip.reason);
                    DownloadResult::skipped(title, PathBuf::new(), skip.reason)
                }
            };
            results.push(result);
        }

        Ok(results)
    }

    async fn process(
        &self,
        provider: &dyn Provider,
        track: &Track,
        options: &RunOptions,
    ) -> DownloadResult {
        let label = format!("{} - {}", track.artist, track.title);
        let destination = self.destination(provider, track, options, extension_hint(track));

        if options.folders && destination.exists() {
            tracing::info!("Track already downloaded: {}", track.title);
            return DownloadResult::skipped(label, destination, SkipReason::AlreadyDownloaded);
        }

        let stream_url = match provider.resolve_stream(track).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("{} is not downloadable: {}", track.title, e);
                return DownloadResult::skipped(
                    label,
                    destination,
                    SkipReason::StreamUnresolved(e.to_string()),
                );
            }
        };

        // Discovery may land on a different container than the hint
        let ext = extension_for_url(&stream_url);
        let destination = if destination.extension().and_then(|e| e.to_str()) == Some(ext) {
            destination
        } else {
            self.destination(provider, track, options, ext)
        };

        tracing::info!("Downloading: {}", label);
        let result = self
            .downloader
            .download(&stream_url, &destination, options.folders, &label)
            .await;

        if result.is_success() && organizer::is_taggable(&destination) {
            self.tag(track, &destination).await;
        }

        result
    }

    fn destination(
        &self,
        provider: &dyn Provider,
        track: &Track,
        options: &RunOptions,
        ext: &str,
    ) -> PathBuf {
        organizer::destination(&options.output_dir, track, provider.naming(), options.folders, ext)
    }

    /// Tag a finished file. Failures are logged, never returned.
    async fn tag(&self, track: &Track, path: &Path) {
        let artwork = match track.artwork_url.as_deref() {
            Some(url) => cover::fetch_artwork(self.transport.as_ref(), url).await,
            None => None,
        };

        if let Err(e) = metadata::write_tags(path, &TagFields::from(track), artwork.as_ref()) {
            tracing::warn!("Could not tag {:?}: {:#}", path, e);
        }
    }
}
