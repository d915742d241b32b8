// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening converted meshes with the desktop's default viewer.

use plan3d_processing::BatchReport;
use std::io;
use std::path::Path;
use std::process::Command;

/// Hands a file to some external viewer.
pub trait FileOpener {
    fn open(&self, path: &Path) -> io::Result<()>;
}

/// Uses the operating system's default handler for the file type.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl FileOpener for SystemOpener {
    fn open(&self, path: &Path) -> io::Result<()> {
        // The viewer keeps running on its own; the child handle is dropped.
        system_command(path).spawn().map(|_| ())
    }
}

#[cfg(target_os = "windows")]
fn system_command(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(target_os = "macos")]
fn system_command(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn system_command(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}

/// Open the last file a batch wrote. Returns whether a viewer was launched.
///
/// Launch failures are logged, never returned.
pub fn open_last_output(report: &BatchReport, opener: &dyn FileOpener) -> bool {
    let Some(path) = report.last_output.as_deref() else {
        tracing::info!("Nothing converted, no file to open");
        return false;
    };

    match opener.open(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Opened in default viewer");
            true
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot open default viewer");
            false
        }
    }
}
