//! Command-line interface for soundscrape.
//!
//! Parses the handle and flags, then drives one fetch run and prints a
//! per-track report.

mod commands;

pub use commands::{Cli, run_command};
