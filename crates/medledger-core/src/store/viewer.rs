//! Opening the data file in the host's default application.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;

/// External launch errors.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Error opening file {path}: {source}", path = path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Build the platform command that opens `path` with its associated program.
pub fn default_app_command(path: &Path) -> Command {
    let mut command = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        // Empty title argument so `start` does not treat a quoted path as one.
        c.args(["/C", "start", ""]);
        c
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };
    command
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

/// Spawn the default application for `path` without waiting for it.
pub fn open_with_default_app(path: &Path) -> Result<(), LaunchError> {
    let child = default_app_command(path)
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), pid = child.id(), "launched external viewer");
    Ok(())
}
