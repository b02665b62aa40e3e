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
//! # gitmirror git layer
//!
//! Thin, typed wrappers around the `git` command-line client.
//!
//! - [`CommandExecutor`] runs one command in a directory and captures its
//!   output; [`GitCli`] is the real implementation
//! - [`GitRepository`] exposes the handful of git operations a mirror needs,
//!   always against [`REMOTE_HEAD`]
//! - [`RepoInitializer`] clones, adopts or verifies the local path at startup
//! - [`ScriptedExecutor`] stands in for git in tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gitmirror_git::{GitCli, GitRepository, RepoInitializer};
//! use gitmirror_config::InitPolicy;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = GitRepository::new("/srv/mirror", GitCli::new());
//! RepoInitializer::new(&repo, "https://example.com/r.git", InitPolicy::Refuse)
//!     .run()
//!     .await?;
//! repo.fetch().await?;
//! for path in repo.list_files().await? {
//!     if repo.path_differs(&path).await? {
//!         repo.checkout_path(&path).await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod executor;
pub mod init;
pub mod repository;
pub mod scripted;

pub use error::{GitError, GitResult, InitError};
pub use executor::{CommandExecutor, CommandOutput, GitCli};
pub use init::{InitOutcome, RepoInitializer, RepoState};
pub use repository::{GitRepository, REMOTE_HEAD, REMOTE_NAME};
pub use scripted::{tree_listing, RecordedCall, ScriptedExecutor};
