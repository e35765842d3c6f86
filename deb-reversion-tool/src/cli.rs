// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use {
    clap::{Arg, Command},
    deb_reversion::{error::ReversionError, reversion},
    std::path::Path,
    thiserror::Error,
};

/// Exit code signalling the privilege precondition was not met.
///
/// 77 is the established "skipped / unmet precondition" convention, so
/// calling automation can tell this apart from a general failure.
pub const EXIT_UNPRIVILEGED: i32 = 77;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("argument parsing error: {0:?}")]
    Clap(#[from] clap::Error),

    #[error("{0:?}")]
    Reversion(#[from] ReversionError),

    #[error("re-versioning requires root privileges")]
    PrivilegeRequired,
}

pub type Result<T> = std::result::Result<T, CliError>;

fn running_as_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

pub fn run_cli() -> Result<()> {
    // The rebuilt archive embeds file owner/group. Run unprivileged,
    // dpkg-deb would silently record the invoking user instead. Checked
    // before argument handling so automation sees the distinguished exit
    // code however it called us.
    if !running_as_root() {
        println!(
            "Please run this as root/fakeroot to ensure proper ownership in the resulting deb archive."
        );
        return Err(CliError::PrivilegeRequired);
    }

    let matches = Command::new("Debian Package Re-versioning Tool")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gregory Szorc <gregory.szorc@gmail.com>")
        .about("Rewrite the version of a built .deb package in place")
        .arg(
            Arg::new("deb_path")
                .required(true)
                .allow_invalid_utf8(true)
                .help("Path to the .deb file to modify"),
        )
        .arg(
            Arg::new("version")
                .required(true)
                .help("New version string to record"),
        )
        .try_get_matches()?;

    let deb_path = matches
        .value_of_os("deb_path")
        .expect("deb_path argument is required");
    let version = matches
        .value_of("version")
        .expect("version argument is required");

    reversion::rewrite_version(Path::new(deb_path), version)?;

    Ok(())
}
