// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Error handling. */

use thiserror::Error;

/// Primary crate error type.
#[derive(Debug, Error)]
pub enum ReversionError {
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    #[error("error invoking {0}: {1:?}")]
    ToolIo(&'static str, std::io::Error),

    #[error("{0} exited with {1}")]
    ToolStatus(&'static str, std::process::ExitStatus),

    #[error("could not find the package name in the control file")]
    PackageNameNotFound,
}

impl ReversionError {
    /// Whether this error came from an external tool invocation.
    pub fn is_tool_failure(&self) -> bool {
        matches!(self, Self::ToolIo(..) | Self::ToolStatus(..))
    }
}

/// Result wrapper for this crate.
pub type Result<T> = std::result::Result<T, ReversionError>;
