// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Rewriting of `DEBIAN/md5sums` checksum manifests.

A manifest maps relative payload paths to their MD5 digest, one
`<hex digest><space run><path>` line per file. Whenever a payload file is
rewritten, its manifest line must be refreshed in the same step; a stale
digest is a correctness bug.
*/

use {
    crate::error::Result,
    md5::{Digest, Md5},
    regex::Regex,
    std::{io::Read, path::Path},
};

/// Compute the hex MD5 digest of a file's content.
///
/// MD5 is what the manifest format prescribes; it is used for change
/// detection only, not for anything needing collision resistance.
pub fn file_digest(path: &Path) -> Result<String> {
    let mut reader = std::fs::File::open(path)?;
    let mut context = Md5::new();

    let mut buffer = [0; 32768];

    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }

        context.update(&buffer[0..read]);
    }

    Ok(hex::encode(context.finalize()))
}

/// Replace the digest on the manifest line for `rel_path`.
///
/// The line is matched as start-of-line, a run of non-space characters, a
/// run of spaces, then the exact path at end of line. The space run between
/// digest and path is preserved verbatim. Lines for other paths are left
/// alone; if no line matches, the manifest is returned unchanged.
pub fn replace_digest(manifest_text: &str, rel_path: &str, digest_hex: &str) -> String {
    let re = Regex::new(&format!(r"(?m)^[^ ]*( *){}$", regex::escape(rel_path)))
        .expect("escaped path always forms a valid pattern");

    re.replace_all(manifest_text, |caps: &regex::Captures| {
        format!("{}{}{}", digest_hex, &caps[1], rel_path)
    })
    .into_owned()
}
