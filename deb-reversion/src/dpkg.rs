// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Invocation of the system `dpkg-deb` executable.

`dpkg-deb` is treated as a black box: each call blocks until the child
exits, inherits stdio, and either succeeds or fails the run. There are no
retries.
*/

use {
    crate::error::{ReversionError, Result},
    std::{
        ffi::OsStr,
        path::{Path, PathBuf},
        process::Command,
    },
};

const DPKG_DEB: &str = "dpkg-deb";

fn run_dpkg_deb<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let status = Command::new(DPKG_DEB)
        .args(args)
        .status()
        .map_err(|e| ReversionError::ToolIo(DPKG_DEB, e))?;

    if status.success() {
        Ok(())
    } else {
        Err(ReversionError::ToolStatus(DPKG_DEB, status))
    }
}

/// Extract a package's payload tree into `dest_dir`.
///
/// File paths land relative to `dest_dir` as they would relative to the
/// filesystem root at install time. e.g. `usr/bin/myapp`.
pub fn extract(deb_path: &Path, dest_dir: &Path) -> Result<()> {
    run_dpkg_deb([
        OsStr::new("--extract"),
        deb_path.as_os_str(),
        dest_dir.as_os_str(),
    ])
}

/// Extract a package's control metadata into `dest_dir`.
///
/// `dest_dir` is conventionally the `DEBIAN/` directory inside the staged
/// payload tree, which is where `dpkg-deb --build` expects to find it.
pub fn extract_control(deb_path: &Path, dest_dir: &Path) -> Result<()> {
    run_dpkg_deb([
        OsStr::new("--control"),
        deb_path.as_os_str(),
        dest_dir.as_os_str(),
    ])
}

/// Build a new `.deb` from a staged tree.
///
/// The archive is written next to the tree and its path returned. The
/// staged tree must contain a `DEBIAN/` control directory.
pub fn build(staged_dir: &Path) -> Result<PathBuf> {
    let deb_path = staged_dir.with_extension("deb");

    run_dpkg_deb([
        OsStr::new("--build"),
        staged_dir.as_os_str(),
        deb_path.as_os_str(),
    ])?;

    Ok(deb_path)
}
