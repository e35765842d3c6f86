// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Updating of compressed changelog files inside unpacked packages.

Binary packages ship their changelog as
`usr/share/doc/<package>/changelog.gz` or `changelog.Debian.gz`. Recording
the new version there means decompressing the file, letting `dch` author
the entry, recompressing over the original path and refreshing the file's
`DEBIAN/md5sums` line.

The `dch` invocation is the one external call in the whole pipeline whose
failure is advisory rather than fatal: version metadata correctness is the
primary contract and changelog cosmetics are secondary, so callers downgrade
a tool failure here to a warning and keep the extracted changelog bytes.
*/

use {
    crate::{
        error::{ReversionError, Result},
        md5sums,
    },
    std::{
        path::{Path, PathBuf},
        process::Command,
    },
};

const DCH: &str = "dch";

/// Changelog file names tried under `usr/share/doc/<package>/`, in order.
const CHANGELOG_CANDIDATES: [&str; 2] = ["changelog.gz", "changelog.Debian.gz"];

/// Boilerplate message recorded in the authored changelog entry.
const ENTRY_MESSAGE: &str = "Bumped version during deb synchronization.";

/// Identity the authored entry is attributed to, passed to `dch` via the
/// environment rather than baked into the changelog text by us.
const AUTHOR_NAME: &str = "github-actions[bot]";
const AUTHOR_EMAIL: &str = "41898282+github-actions[bot]@users.noreply.github.com";

/// Locate a package's compressed changelog within an unpacked payload tree.
///
/// Candidates are probed in a fixed preference order and the first hit wins:
/// once `changelog.gz` exists, `changelog.Debian.gz` is never examined, even
/// if the first file turns out to be empty or corrupt.
///
/// Returns the path relative to the payload root, which is also the path
/// format `DEBIAN/md5sums` uses.
pub fn find_changelog(payload_dir: &Path, package: &str) -> Option<String> {
    for name in CHANGELOG_CANDIDATES {
        let rel_path = format!("usr/share/doc/{}/{}", package, name);

        if payload_dir.join(&rel_path).is_file() {
            return Some(rel_path);
        }
    }

    None
}

/// Author a changelog entry for `version` by invoking `dch`.
///
/// `changelog_path` is the plain-text changelog to mutate in place. The
/// fixed author identity is merged into the inherited environment.
pub fn add_changelog_entry(changelog_path: &Path, version: &str) -> Result<()> {
    let status = Command::new(DCH)
        .arg("-c")
        .arg(changelog_path)
        .arg("-v")
        .arg(version)
        .arg("--")
        .arg(ENTRY_MESSAGE)
        .env("DEBFULLNAME", AUTHOR_NAME)
        .env("DEBEMAIL", AUTHOR_EMAIL)
        .status()
        .map_err(|e| ReversionError::ToolIo(DCH, e))?;

    if status.success() {
        Ok(())
    } else {
        Err(ReversionError::ToolStatus(DCH, status))
    }
}

/// Record `new_version` in a package's compressed changelog.
///
/// `changelog_rel_path` is a path previously returned by [find_changelog],
/// relative to `package_dir` (the staged payload root, which also holds the
/// `DEBIAN/` control directory).
///
/// The decompressed text lives in an auxiliary `debian/` staging directory
/// inside `package_dir` for the duration of the call; callers remove it via
/// [remove_staging] before repacking. The compressed file is only
/// overwritten after `dch` succeeds, so on a tool failure (the error for
/// which [ReversionError::is_tool_failure] returns true) the changelog is
/// byte-for-byte as extracted.
pub fn update_changelog(
    package_dir: &Path,
    changelog_rel_path: &str,
    new_version: &str,
) -> Result<()> {
    let changelog_gz_path = package_dir.join(changelog_rel_path);

    let text_path = staging_dir(package_dir).join("changelog");
    std::fs::create_dir(staging_dir(package_dir))?;

    decompress_gz(&changelog_gz_path, &text_path)?;

    add_changelog_entry(&text_path, new_version)?;

    compress_gz(&text_path, &changelog_gz_path)?;

    // The rewritten file invalidates its manifest line; refresh it in the
    // same step.
    let digest = md5sums::file_digest(&changelog_gz_path)?;
    let manifest_path = package_dir.join("DEBIAN/md5sums");
    let manifest_text = std::fs::read_to_string(&manifest_path)?;
    std::fs::write(
        &manifest_path,
        md5sums::replace_digest(&manifest_text, changelog_rel_path, &digest),
    )?;

    Ok(())
}

/// Remove the auxiliary changelog staging directory.
///
/// The directory is absent whenever no changelog candidate was found, so
/// "not found" is not an error. Any other removal failure propagates.
pub fn remove_staging(package_dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(staging_dir(package_dir)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn staging_dir(package_dir: &Path) -> PathBuf {
    package_dir.join("debian")
}

fn decompress_gz(src: &Path, dest: &Path) -> Result<()> {
    let mut decoder = libflate::gzip::Decoder::new(std::fs::File::open(src)?)?;
    let mut writer = std::fs::File::create(dest)?;

    std::io::copy(&mut decoder, &mut writer)?;

    Ok(())
}

fn compress_gz(src: &Path, dest: &Path) -> Result<()> {
    let header = libflate::gzip::HeaderBuilder::new().finish();

    let mut encoder = libflate::gzip::Encoder::with_options(
        std::fs::File::create(dest)?,
        libflate::gzip::EncodeOptions::new().header(header),
    )?;

    let mut reader = std::fs::File::open(src)?;
    std::io::copy(&mut reader, &mut encoder)?;
    encoder.finish().into_result()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use {super::*, std::io::Write};

    fn write_gz(path: &Path, content: &[u8]) -> Result<()> {
        let header = libflate::gzip::HeaderBuilder::new().finish();
        let mut encoder = libflate::gzip::Encoder::with_options(
            std::fs::File::create(path)?,
            libflate::gzip::EncodeOptions::new().header(header),
        )?;
        encoder.write_all(content)?;
        encoder.finish().into_result()?;

        Ok(())
    }

    #[test]
    fn find_changelog_prefers_plain_name() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let doc_dir = dir.path().join("usr/share/doc/myapp");
        std::fs::create_dir_all(&doc_dir)?;

        std::fs::write(doc_dir.join("changelog.gz"), b"")?;
        std::fs::write(doc_dir.join("changelog.Debian.gz"), b"")?;

        // First hit wins even with both present, and even though the first
        // candidate here is empty.
        assert_eq!(
            find_changelog(dir.path(), "myapp").as_deref(),
            Some("usr/share/doc/myapp/changelog.gz")
        );

        Ok(())
    }

    #[test]
    fn find_changelog_falls_back_to_debian_name() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let doc_dir = dir.path().join("usr/share/doc/myapp");
        std::fs::create_dir_all(&doc_dir)?;

        std::fs::write(doc_dir.join("changelog.Debian.gz"), b"")?;

        assert_eq!(
            find_changelog(dir.path(), "myapp").as_deref(),
            Some("usr/share/doc/myapp/changelog.Debian.gz")
        );

        Ok(())
    }

    #[test]
    fn find_changelog_none_when_absent() -> Result<()> {
        let dir = tempfile::tempdir()?;

        assert_eq!(find_changelog(dir.path(), "myapp"), None);

        Ok(())
    }

    #[test]
    fn find_changelog_ignores_directories() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir_all(dir.path().join("usr/share/doc/myapp/changelog.gz"))?;

        assert_eq!(find_changelog(dir.path(), "myapp"), None);

        Ok(())
    }

    #[test]
    fn gz_round_trips_changelog_text() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let gz_path = dir.path().join("changelog.gz");
        let text_path = dir.path().join("changelog");

        let entry = b"myapp (1.0-1) unstable; urgency=low\n";
        write_gz(&gz_path, entry)?;

        decompress_gz(&gz_path, &text_path)?;
        assert_eq!(std::fs::read(&text_path)?, entry);

        compress_gz(&text_path, &gz_path)?;
        decompress_gz(&gz_path, &text_path)?;
        assert_eq!(std::fs::read(&text_path)?, entry);

        Ok(())
    }

    #[test]
    fn remove_staging_tolerates_missing_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;

        remove_staging(dir.path())?;

        Ok(())
    }

    #[test]
    fn remove_staging_removes_populated_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let staging = dir.path().join("debian");
        std::fs::create_dir(&staging)?;
        std::fs::write(staging.join("changelog"), b"text")?;

        remove_staging(dir.path())?;
        assert!(!staging.exists());

        Ok(())
    }
}
