//! CLI definition and dispatch.
//!
//! The work is split into submodules:
//! - `fetch`: resolve, download and tag, then report
//! - `open`: hand finished files to the host's opener

mod fetch;
mod open;

use clap::Parser;
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config;
use crate::model::ProviderKind;

pub use fetch::cmd_fetch;
pub use open::open_files;

/// Scrape tracks from SoundCloud, Bandcamp and Mixcloud
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Artist handle or full URL
    pub artist_url: Option<String>,

    /// Maximum number of tracks to download
    #[arg(short = 'n', long)]
    pub num_tracks: Option<usize>,

    /// Treat the handle as a SoundCloud group
    #[arg(short, long)]
    pub group: bool,

    /// Scrape from Bandcamp
    #[arg(short, long, conflicts_with = "mixcloud")]
    pub bandcamp: bool,

    /// Scrape from Mixcloud
    #[arg(short, long)]
    pub mixcloud: bool,

    /// Download the artist's likes instead of uploads
    #[arg(short, long)]
    pub likes: bool,

    /// Only download tracks with a licensed download link
    #[arg(short, long)]
    pub downloadable: bool,

    /// A single track name under the artist handle
    #[arg(short, long, default_value = "")]
    pub track: String,

    /// Organize files into per-artist folders and skip existing ones
    #[arg(short, long)]
    pub folders: bool,

    /// Open the downloaded files when done
    #[arg(short, long)]
    pub open: bool,

    /// SoundCloud client ID (or set SOUNDSCRAPE_CLIENT_ID env var)
    #[arg(long, env = "SOUNDSCRAPE_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Directory to download into
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Write the effective configuration to the config file
    #[arg(long)]
    pub save_config: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Provider forced by a flag, if any.
    pub fn forced_provider(&self) -> Option<ProviderKind> {
        if self.bandcamp {
            Some(ProviderKind::Bandcamp)
        } else if self.mixcloud {
            Some(ProviderKind::Mixcloud)
        } else {
            None
        }
    }
}

/// Run the command described by `args`.
///
/// Fails only when the handle cannot be classified or the top-level target
/// cannot be resolved; per-track problems are reported and the run
/// still succeeds.
pub fn run_command(args: &Cli) -> anyhow::Result<()> {
    let mut config = config::load();
    if let Some(ref client_id) = args.client_id {
        config.credentials.client_id = client_id.clone();
    }

    if args.save_config {
        let path = config::save(&config)?;
        println!("Saved config to {}", path.display());
        if args.artist_url.is_none() {
            return Ok(());
        }
    }

    let rt = Runtime::new()?;
    let results = cmd_fetch(&rt, args, &config)?;

    if args.open {
        let finished: Vec<PathBuf> = results
            .iter()
            .filter(|r| r.is_success())
            .map(|r| r.path.clone())
            .collect();
        open_files(&finished);
    }

    Ok(())
}
