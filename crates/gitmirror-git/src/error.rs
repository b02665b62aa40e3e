// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Error types for git integration

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type for git operations
pub type GitResult<T> = Result<T, GitError>;

/// Failure of a single git invocation
#[derive(Debug, Error)]
pub enum GitError {
    /// The executable could not be started
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The command ran and exited unsuccessfully
    #[error("Command `{command}` failed ({status})\n{output}")]
    CommandFailed {
        command: String,
        status: String,
        /// Captured stdout followed by stderr
        output: String,
    },

    /// The command exceeded the configured timeout and was killed
    #[error("Command `{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// The command succeeded but printed something we cannot interpret
    #[error("Unexpected output from `{command}`: {detail}")]
    UnexpectedOutput { command: String, detail: String },
}

impl GitError {
    /// Output captured from a failed command, if any
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            GitError::CommandFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Fatal problems while preparing the local directory
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Failed to inspect {}: {source}", path.display())]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to clone {remote}: {source}")]
    Clone {
        remote: String,
        #[source]
        source: GitError,
    },

    #[error("Directory {} is not a git repository", .0.display())]
    NotARepository(PathBuf),

    #[error("Failed to read the registered remote: {0}")]
    RemoteLookup(#[source] GitError),

    #[error("Remote mismatch\n  configured: {configured}\n  actual: {actual}")]
    RemoteMismatch { configured: String, actual: String },

    #[error("Failed to adopt directory during '{step}': {source}")]
    Adopt {
        step: &'static str,
        #[source]
        source: GitError,
    },

    /// git itself could not be run while probing the directory
    #[error(transparent)]
    Git(#[from] GitError),
}
