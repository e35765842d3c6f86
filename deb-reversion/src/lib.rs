// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Debian package re-versioning primitives.

This crate rewrites the version metadata of an already-built `.deb` package
in place. It exists so a packaging pipeline can republish a binary artifact
under a new version number without rebuilding it from source.

The heavy lifting is delegated to the system packaging tools, invoked as
black-box executables: `dpkg-deb` explodes and reassembles the archive
(preserving file ownership, which is why callers must run as root or under
fakeroot) and `dch` authors the new changelog entry. What this crate owns is
the text surgery in between and the ordering and failure handling around it.

A run is a single linear pipeline, driven by [reversion::rewrite_version]:

1. Extract the package payload and control metadata into a temporary
   staging tree ([dpkg]).
2. Rewrite the `Version:` field in `DEBIAN/control` ([control]).
3. If the package ships a compressed changelog, append an entry for the new
   version and refresh its `DEBIAN/md5sums` line ([changelog], [md5sums]).
   This step is best-effort: a `dch` failure downgrades to a warning and the
   changelog is left exactly as extracted.
4. Rebuild the archive and move it over the original path. The replacement
   is the last action of the run, so a failure anywhere earlier leaves the
   original file untouched.

The staging tree is a [tempfile::TempDir] and is removed on every exit path.
*/

pub mod changelog;
pub mod control;
pub mod dpkg;
pub mod error;
pub mod md5sums;
pub mod reversion;
