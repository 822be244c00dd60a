//! soundscrape - download an artist's tracks from SoundCloud, Bandcamp
//! and Mixcloud.
//!
//! Give it a handle or URL; it resolves the tracks, streams each one to
//! disk and tags the MP3s it can.

pub mod cli;
pub mod config;
pub mod cover;
pub mod download;
pub mod error;
pub mod jsobject;
pub mod metadata;
pub mod model;
pub mod organizer;
pub mod pipeline;
pub mod providers;
#[cfg(test)]
pub mod test_utils;
pub mod transport;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let directive = if args.verbose {
        "soundscrape=debug"
    } else {
        "soundscrape=info"
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    cli::run_command(&args)
}
