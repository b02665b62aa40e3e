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
//! Error types for sync ticks

use gitmirror_git::GitError;
use thiserror::Error;

/// Result type for a sync tick
pub type SyncOutcome<T> = Result<T, SyncError>;

/// A tick that could not run to completion.
///
/// Per-path problems never surface here; they are recorded in
/// [`SyncResult::failed_paths`](crate::SyncResult::failed_paths).
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to fetch remote updates: {0}")]
    Fetch(#[source] GitError),

    #[error("Failed to list remote files: {0}")]
    Enumerate(#[source] GitError),

    #[error("Failed to compare working tree with remote: {0}")]
    Diff(#[source] GitError),
}

impl SyncError {
    /// Whether the next tick may succeed where this one failed.
    ///
    /// Every steady-state failure is retried on the next tick.
    pub fn is_transient(&self) -> bool {
        match self {
            SyncError::Fetch(_) | SyncError::Enumerate(_) | SyncError::Diff(_) => true,
        }
    }

    /// The git failure behind this error
    pub fn git_error(&self) -> &GitError {
        match self {
            SyncError::Fetch(err) | SyncError::Enumerate(err) | SyncError::Diff(err) => err,
        }
    }
}
