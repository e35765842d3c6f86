// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! In-place re-versioning of built `.deb` packages. */

use {
    crate::{changelog, control, dpkg, error::Result},
    std::path::Path,
};

/// Rewrite a built package's version metadata in place.
///
/// The archive at `deb_path` is exploded into a temporary staging tree, its
/// `DEBIAN/control` version field rewritten to `new_version`, its changelog
/// updated when present, and the tree reassembled over the original path.
///
/// Replacing the original file is the final action: any failure before that
/// point leaves the input archive untouched. The staging tree is removed on
/// every exit path.
///
/// Callers must run as root or under fakeroot so `dpkg-deb` can reproduce
/// the original file ownership in the rebuilt archive.
pub fn rewrite_version(deb_path: &Path, new_version: &str) -> Result<()> {
    let deb_path = std::fs::canonicalize(deb_path)?;

    let temp_dir = tempfile::Builder::new()
        .prefix("deb-reversion-")
        .tempdir()?;
    let package_dir = temp_dir.path().join("package");
    std::fs::create_dir(&package_dir)?;

    dpkg::extract(&deb_path, &package_dir)?;
    dpkg::extract_control(&deb_path, &package_dir.join("DEBIAN"))?;

    let control_path = package_dir.join("DEBIAN/control");
    let control_text = std::fs::read_to_string(&control_path)?;

    // The package name locates the changelog; without it the run cannot
    // proceed.
    let package = control::package_name(&control_text)?.to_string();
    let control_text = control::set_version(&control_text, new_version);

    if let Some(changelog_rel_path) = changelog::find_changelog(&package_dir, &package) {
        match changelog::update_changelog(&package_dir, &changelog_rel_path, new_version) {
            Ok(()) => {}
            Err(err) if err.is_tool_failure() => {
                println!("WARNING: failed to update changelog file: {}", err);
                println!("Leaving the changelog file unchanged.");
            }
            Err(err) => return Err(err),
        }
    }

    std::fs::write(&control_path, control_text)?;
    changelog::remove_staging(&package_dir)?;

    let built = dpkg::build(&package_dir)?;
    replace_file(&built, &deb_path)?;

    Ok(())
}

/// Move `src` over `dest`.
///
/// A rename is attempted first; when the temporary scope lives on a
/// different filesystem than the destination, the content is copied
/// instead. `src` is inside the staging tree either way and is discarded
/// with it.
fn replace_file(src: &Path, dest: &Path) -> Result<()> {
    match std::fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            std::fs::copy(src, dest)?;

            Ok(())
        }
    }
}
