//! Streamed downloads to disk.
//!
//! One file at a time: the body is written in fixed-size slices, each
//! flushed before the next, under an `indicatif` progress bar. A failure
//! part way leaves the partial file where it is; nothing is resumed or
//! cleaned up.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::DownloadConfig;
use crate::model::{DownloadResult, DownloadStatus, SkipReason};
use crate::organizer::ensure_parent_dir;
use crate::transport::{HttpTransport, TransportError};

const BAR_TEMPLATE: &str = "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})";
const SPINNER_TEMPLATE: &str = "{spinner} {msg} {bytes}";

/// Why a download stopped.
#[derive(Debug, thiserror::Error)]
enum DownloadError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// Download engine
pub struct Downloader {
    transport: Arc<dyn HttpTransport>,
    chunk_size: usize,
    show_progress: bool,
}

impl Downloader {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &DownloadConfig) -> Self {
        Self {
            transport,
            chunk_size: settings.chunk_size.max(1),
            show_progress: settings.progress,
        }
    }

    /// Download `url` to `destination`.
    ///
    /// In folder mode an existing destination is skipped without touching
    /// the network. Never returns an error: every outcome is a
    /// [`DownloadResult`].
    pub async fn download(
        &self,
        url: &str,
        destination: &Path,
        folders: bool,
        label: &str,
    ) -> DownloadResult {
        if folders && destination.exists() {
            return DownloadResult::skipped(label, destination, SkipReason::AlreadyDownloaded);
        }

        let url = absolute_url(url);
        let mut written = 0u64;

        match self.fetch(&url, destination, label, &mut written).await {
            Ok(()) => DownloadResult {
                title: label.to_string(),
                path: destination.to_path_buf(),
                bytes_written: written,
                status: DownloadStatus::Success,
            },
            Err(e) => {
                tracing::warn!("Problem downloading {} from {}: {}", label, url, e);
                DownloadResult::failed(label, destination, written, e.to_string())
            }
        }
    }

    async fn fetch(
        &self,
        url: &str,
        destination: &Path,
        label: &str,
        written: &mut u64,
    ) -> Result<(), DownloadError> {
        let mut body = self.transport.stream(url).await?;
        if !(200..300).contains(&body.status) {
            return Err(DownloadError::Status(body.status));
        }

        ensure_parent_dir(destination)?;
        let mut file = File::create(destination)?;

        let bar = self.progress_bar(body.content_length.unwrap_or(0), label);

        while let Some(chunk) = body.chunks.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    bar.abandon();
                    return Err(e.into());
                }
            };

            for slice in chunk.chunks(self.chunk_size) {
                file.write_all(slice)?;
                file.flush()?;
                *written += slice.len() as u64;
                bar.inc(slice.len() as u64);
            }
        }

        bar.finish_and_clear();
        tracing::debug!("Wrote {} bytes to {:?}", written, destination);
        Ok(())
    }

    fn progress_bar(&self, total: u64, label: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let (bar, template) = if total > 0 {
            (ProgressBar::new(total), BAR_TEMPLATE)
        } else {
            (ProgressBar::new_spinner(), SPINNER_TEMPLATE)
        };

        if let Ok(style) = ProgressStyle::with_template(template) {
            bar.set_style(style.progress_chars("##-"));
        }
        bar.set_message(label.to_string());
        bar
    }
}

/// Give protocol-relative URLs an https scheme.
pub fn absolute_url(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}
