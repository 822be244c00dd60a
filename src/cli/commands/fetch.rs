//! The fetch command: classify, resolve, download, tag, report.

use std::sync::Arc;
use tokio::runtime::Runtime;

use super::Cli;
use crate::config::Config;
use crate::download::Downloader;
use crate::model::{DownloadResult, DownloadStatus, SkipReason};
use crate::pipeline::{Pipeline, RunOptions};
use crate::providers::{self, ResolveOptions};
use crate::transport::{HttpTransport, ReqwestTransport};

/// Fetch everything the command line names and print a report.
pub fn cmd_fetch(rt: &Runtime, args: &Cli, config: &Config) -> anyhow::Result<Vec<DownloadResult>> {
    let options = ResolveOptions {
        provider: args.forced_provider(),
        as_group: args.group,
        likes_only: args.likes,
        single_track_name: args.track.clone(),
        max_tracks: args.num_tracks,
    };
    let resolution = providers::classify(args.artist_url.as_deref().unwrap_or_default(), &options)?;

    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(&config.http.user_agent)?);
    let provider = providers::build_provider(
        resolution.kind,
        config,
        Arc::clone(&transport),
        args.downloadable,
    );
    let pipeline = Pipeline::new(
        Arc::clone(&transport),
        Downloader::new(transport, &config.download),
    );

    let run_options = RunOptions {
        limit: resolution.limit,
        folders: args.folders,
        output_dir: args.dir.clone(),
    };

    println!("Fetching {} from {}", resolution.target.url(), resolution.kind);
    let results = rt.block_on(pipeline.run(provider.as_ref(), &resolution.target, &run_options))?;

    for result in &results {
        match result.status {
            DownloadStatus::Failed(_) => eprintln!("{}", describe(result)),
            _ => println!("{}", describe(result)),
        }
    }
    println!("\n{}", summarize(&results));

    Ok(results)
}

/// One report line for a result.
pub(crate) fn describe(result: &DownloadResult) -> String {
    match &result.status {
        DownloadStatus::Success => {
            format!("Downloaded: {} ({})", result.title, result.path.display())
        }
        DownloadStatus::Skipped(
            reason @ (SkipReason::NotDownloadable
            | SkipReason::Malformed(_)
            | SkipReason::StreamUnresolved(_)),
        ) => format!("Skipping: {} {}", result.title, reason),
        DownloadStatus::Skipped(reason) => format!("{}: {}", reason, result.title),
        DownloadStatus::Failed(cause) => format!("Problem downloading {}: {}", result.title, cause),
    }
}

/// Closing summary line.
pub(crate) fn summarize(results: &[DownloadResult]) -> String {
    let downloaded = results.iter().filter(|r| r.is_success()).count();
    let skipped = results
        .iter()
        .filter(|r| matches!(r.status, DownloadStatus::Skipped(_)))
        .count();
    let failed = results.len() - downloaded - skipped;

    format!("{downloaded} downloaded, {skipped} skipped, {failed} failed")
}
