//! Hand downloaded files to the host's default application.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, ResultExt};

/// Open each path with the platform opener. Failures are logged.
pub fn open_files(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = open_one(path) {
            tracing::warn!("{}", e);
        }
    }
}

fn open_one(path: &Path) -> Result<()> {
    let mut command = opener_command();
    let status = command
        .arg(path)
        .status()
        .with_context(format!("Failed to open {}", path.display()))?;

    if !status.success() {
        tracing::warn!("Opener exited with {} for {:?}", status, path);
    }
    Ok(())
}

fn opener_command() -> Command {
    if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        Command::new("xdg-open")
    }
}
