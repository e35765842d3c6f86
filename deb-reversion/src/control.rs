// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Editing of `DEBIAN/control` metadata.

Only two fields are of interest: `Package` (read) and `Version`
(rewritten). The fixed field set makes a line-oriented regex rewrite
sufficient; anything stricter would be a behavior change.
*/

use {
    crate::error::{ReversionError, Result},
    once_cell::sync::Lazy,
    regex::{NoExpand, Regex},
};

static RE_PACKAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^Package: (.+)$").unwrap());

static RE_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^Version: .*$").unwrap());

/// Extract the package name from control file text.
///
/// The name is everything after the `Package: ` prefix up to end of line;
/// the first matching line wins. The name is required to locate the
/// package's changelog path, so its absence is a hard error.
pub fn package_name(control_text: &str) -> Result<&str> {
    RE_PACKAGE
        .captures(control_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(ReversionError::PackageNameNotFound)
}

/// Rewrite the `Version:` field to `new_version`.
///
/// Each `Version:` line is replaced wholesale with `Version: <new_version>`,
/// the new value inserted verbatim. Version strings are free text and are
/// not validated. If no `Version:` line is present the text is returned
/// unchanged.
pub fn set_version(control_text: &str, new_version: &str) -> String {
    RE_VERSION
        .replace_all(control_text, NoExpand(&format!("Version: {}", new_version)))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use {super::*, indoc::indoc};

    const CONTROL: &str = indoc! {"
        Package: myapp
        Version: 1.0.0-1
        Architecture: amd64
        Maintainer: Example Maintainer <maintainer@example.com>
        Description: an example package
         Extended description line.
    "};

    #[test]
    fn package_name_simple() -> Result<()> {
        assert_eq!(package_name(CONTROL)?, "myapp");

        Ok(())
    }

    #[test]
    fn package_name_not_at_start_of_text() -> Result<()> {
        let text = "Source: mysource\nPackage: myapp\n";
        assert_eq!(package_name(text)?, "myapp");

        Ok(())
    }

    #[test]
    fn package_name_first_match_wins() -> Result<()> {
        let text = "Package: first\nPackage: second\n";
        assert_eq!(package_name(text)?, "first");

        Ok(())
    }

    #[test]
    fn package_name_missing_is_error() {
        assert!(matches!(
            package_name("Version: 1.0\n"),
            Err(ReversionError::PackageNameNotFound)
        ));
    }

    #[test]
    fn set_version_replaces_line() {
        let rewritten = set_version(CONTROL, "2.0.0-1~republish1");

        assert!(rewritten.contains("Version: 2.0.0-1~republish1\n"));
        assert!(!rewritten.contains("1.0.0-1"));
        // Neighboring fields are untouched.
        assert!(rewritten.contains("Package: myapp\n"));
        assert!(rewritten.contains("Architecture: amd64\n"));
    }

    #[test]
    fn set_version_is_verbatim() {
        // Version strings are free text; characters that are meaningful in
        // regex replacement templates must pass through untouched.
        let rewritten = set_version(CONTROL, "1.0$1+b2");
        assert!(rewritten.contains("Version: 1.0$1+b2\n"));
    }

    #[test]
    fn set_version_noop_without_version_field() {
        let text = "Package: myapp\nArchitecture: amd64\n";
        assert_eq!(set_version(text, "2.0"), text);
    }

    #[test]
    fn set_version_idempotent() {
        let once = set_version(CONTROL, "3.0");
        let twice = set_version(&once, "3.0");
        assert_eq!(once, twice);
        assert_eq!(once.matches("Version: 3.0\n").count(), 1);
    }
}
