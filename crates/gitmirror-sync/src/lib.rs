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
//! # gitmirror sync engine
//!
//! One-way mirroring of a remote git repository into a local working tree.
//!
//! Each tick fetches `origin`, lists every file in `origin/HEAD`, and
//! overwrites the local copy of any file that differs. Files are never
//! deleted: anything that exists only locally, including files removed
//! upstream, is left alone. When a tick creates files that did not exist
//! before, an optional [`Notifier`](gitmirror_notify::Notifier) receives a
//! message listing them.
//!
//! ```rust,no_run
//! use gitmirror_git::{GitCli, GitRepository};
//! use gitmirror_sync::{Scheduler, SyncEngine};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let engine = SyncEngine::new(GitRepository::new("/srv/mirror", GitCli::new()));
//! Scheduler::new(Duration::from_secs(300))
//!     .run(&engine, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await;
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod scheduler;

pub use engine::{
    format_new_files_message, NotificationStatus, PathFailure, SyncEngine, SyncResult,
    NEW_FILES_HEADER,
};
pub use error::{SyncError, SyncOutcome};
pub use scheduler::Scheduler;
