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
//! One sync pass: fetch, compare, overwrite, notify.
//!
//! The engine only ever moves remote content into the working tree. Paths
//! that exist locally but not in `origin/HEAD` are never listed, compared or
//! touched, so files deleted upstream survive in the mirror.

use crate::error::{SyncError, SyncOutcome};
use gitmirror_config::DiffStrategy;
use gitmirror_git::{CommandExecutor, GitRepository};
use gitmirror_notify::Notifier;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// First line of the new-files notification
pub const NEW_FILES_HEADER: &str = "New files synced:";

/// A path whose sync failed while the rest of the tick continued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFailure {
    pub path: String,
    pub error: String,
}

/// What happened to the new-files notification of a tick
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NotificationStatus {
    /// No new files, or no notifier configured
    #[default]
    NotSent,
    Sent,
    /// Delivery failed; the reason is kept for reporting only
    Failed(String),
}

/// Report of a single tick
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncResult {
    /// Abbreviated commit id of `origin/HEAD` after the fetch, when known
    pub revision: Option<String>,
    /// Paths that existed locally and were overwritten
    pub updated_paths: Vec<String>,
    /// Paths that did not exist locally and were created
    pub newly_created_paths: Vec<String>,
    pub failed_paths: Vec<PathFailure>,
    /// True when at least one path was written
    pub any_change: bool,
    pub notification: NotificationStatus,
}

impl SyncResult {
    /// Nothing was written this tick
    pub fn is_current(&self) -> bool {
        !self.any_change
    }

    fn record(&mut self, path: String, is_new: bool) {
        if is_new {
            self.newly_created_paths.push(path);
        } else {
            self.updated_paths.push(path);
        }
        self.any_change = true;
    }

    fn record_failure(&mut self, path: &str, error: impl fmt::Display) {
        warn!(path = %path, error = %error, "Failed to sync file");
        self.failed_paths.push(PathFailure {
            path: path.to_string(),
            error: error.to_string(),
        });
    }
}

/// What currently sits at a remote file's path in the working tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocalEntry {
    Missing,
    /// A file, symlink (dangling or not) or anything else that is not a directory
    Present,
    /// Checking out a file here would remove everything beneath it
    Directory,
}

/// Message announcing newly created files, one `- path` line each
pub fn format_new_files_message(paths: &[String]) -> String {
    let mut message = String::from(NEW_FILES_HEADER);
    for path in paths {
        message.push_str("\n- ");
        message.push_str(path);
    }
    message
}

/// Drives sync ticks against one working tree.
pub struct SyncEngine<E> {
    repo: GitRepository<E>,
    strategy: DiffStrategy,
    notifier: Option<Arc<dyn Notifier>>,
}

impl<E: CommandExecutor> SyncEngine<E> {
    pub fn new(repo: GitRepository<E>) -> Self {
        Self {
            repo,
            strategy: DiffStrategy::default(),
            notifier: None,
        }
    }

    pub fn with_strategy(mut self, strategy: DiffStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Send a message listing new files after ticks that create any
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn repository(&self) -> &GitRepository<E> {
        &self.repo
    }

    pub fn strategy(&self) -> DiffStrategy {
        self.strategy
    }

    /// Run one tick.
    ///
    /// Fails only when the remote cannot be fetched or enumerated (or, with
    /// [`DiffStrategy::Batched`], compared); the working tree is untouched in
    /// that case.
    #[instrument(skip(self), fields(strategy = ?self.strategy))]
    pub async fn tick(&self) -> SyncOutcome<SyncResult> {
        self.repo.fetch().await.map_err(SyncError::Fetch)?;

        let mut result = SyncResult {
            revision: self.revision().await,
            ..SyncResult::default()
        };

        let remote_files = self.repo.list_files().await.map_err(SyncError::Enumerate)?;
        debug!(files = remote_files.len(), "Listed remote files");

        let candidates = match self.strategy {
            DiffStrategy::PerPath => self.differing_per_path(remote_files, &mut result).await,
            DiffStrategy::Batched => self.differing_batched(remote_files).await?,
        };

        for path in candidates {
            let is_new = match self.local_entry(&path).await {
                LocalEntry::Missing => true,
                LocalEntry::Present => false,
                LocalEntry::Directory => {
                    result.record_failure(&path, "a local directory occupies this path");
                    continue;
                }
            };
            if let Err(err) = self.ensure_parent(&path).await {
                result.record_failure(&path, err);
                continue;
            }
            match self.repo.checkout_path(&path).await {
                Ok(()) => {
                    info!(path = %path, new = is_new, "Synced file");
                    result.record(path, is_new);
                }
                Err(err) => result.record_failure(&path, err),
            }
        }

        if result.is_current() {
            info!("Repository is already current");
        } else {
            info!(
                updated = result.updated_paths.len(),
                created = result.newly_created_paths.len(),
                failed = result.failed_paths.len(),
                "Sync complete"
            );
            result.notification = self.notify(&result.newly_created_paths).await;
        }

        Ok(result)
    }

    async fn revision(&self) -> Option<String> {
        match self.repo.remote_revision().await {
            Ok(revision) if !revision.is_empty() => {
                debug!(revision = %revision, "Fetched remote");
                Some(revision)
            }
            Ok(_) => None,
            Err(err) => {
                debug!(error = %err, "Could not resolve remote revision");
                None
            }
        }
    }

    async fn differing_per_path(
        &self,
        remote_files: Vec<String>,
        result: &mut SyncResult,
    ) -> Vec<String> {
        let mut differing = Vec::new();
        for path in remote_files {
            match self.repo.path_differs(&path).await {
                Ok(true) => differing.push(path),
                Ok(false) => {}
                Err(err) => result.record_failure(&path, err),
            }
        }
        differing
    }

    async fn differing_batched(&self, remote_files: Vec<String>) -> SyncOutcome<Vec<String>> {
        let changed: HashSet<String> = self
            .repo
            .changed_paths()
            .await
            .map_err(SyncError::Diff)?
            .into_iter()
            .collect();
        Ok(remote_files
            .into_iter()
            .filter(|path| changed.contains(path))
            .collect())
    }

    /// Inspect the directory entry itself; symlinks are not followed.
    async fn local_entry(&self, path: &str) -> LocalEntry {
        match tokio::fs::symlink_metadata(self.repo.workdir().join(path)).await {
            Ok(meta) if meta.is_dir() => LocalEntry::Directory,
            Ok(_) => LocalEntry::Present,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => LocalEntry::Missing,
            // Unreadable metadata counts as existing, so the path is reported as updated.
            Err(_) => LocalEntry::Present,
        }
    }

    async fn ensure_parent(&self, path: &str) -> std::io::Result<()> {
        match Path::new(path).parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                tokio::fs::create_dir_all(self.repo.workdir().join(parent)).await
            }
            _ => Ok(()),
        }
    }

    async fn notify(&self, new_paths: &[String]) -> NotificationStatus {
        let Some(notifier) = &self.notifier else {
            return NotificationStatus::NotSent;
        };
        if new_paths.is_empty() {
            return NotificationStatus::NotSent;
        }

        let message = format_new_files_message(new_paths);
        match notifier.send(&message).await {
            Ok(()) => NotificationStatus::Sent,
            Err(err) => {
                warn!(error = %err, "Failed to send notification");
                NotificationStatus::Failed(err.to_string())
            }
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for SyncEngine<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("repo", &self.repo)
            .field("strategy", &self.strategy)
            .field("notifier", &self.notifier)
            .finish()
    }
}
