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
//! Typed git operations over a working directory

use crate::error::{GitError, GitResult};
use crate::executor::{CommandExecutor, CommandOutput};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Name of the upstream remote
pub const REMOTE_NAME: &str = "origin";

/// Reference every comparison and checkout is made against
pub const REMOTE_HEAD: &str = "origin/HEAD";

/// Operations on one local working tree.
///
/// All commands are rooted at `workdir`; nothing here changes the process
/// working directory.
#[derive(Debug, Clone)]
pub struct GitRepository<E> {
    workdir: PathBuf,
    executor: E,
}

impl<E: CommandExecutor> GitRepository<E> {
    pub fn new(workdir: impl Into<PathBuf>, executor: E) -> Self {
        Self {
            workdir: workdir.into(),
            executor,
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    async fn git(&self, args: &[&str]) -> GitResult<CommandOutput> {
        self.executor.run(&self.workdir, args).await
    }

    /// Whether `workdir` is the top level of a git working tree.
    ///
    /// A directory nested inside some other repository is reported as
    /// `false`, as is any directory git refuses to treat as a work tree.
    /// Only failures to run git at all are returned as errors.
    pub async fn is_work_tree(&self) -> GitResult<bool> {
        let output = match self
            .git(&["rev-parse", "--is-inside-work-tree", "--show-prefix"])
            .await
        {
            Ok(output) => output,
            Err(GitError::CommandFailed { .. }) => return Ok(false),
            Err(err) => return Err(err),
        };

        let text = output.stdout_text();
        let mut lines = text.lines();
        let inside = lines.next().map(str::trim) == Some("true");
        let prefix = lines.next().map(str::trim).unwrap_or_default();
        debug!(inside, prefix, "Probed working tree");
        Ok(inside && prefix.is_empty())
    }

    /// URL registered for the upstream remote, trimmed
    pub async fn remote_url(&self) -> GitResult<String> {
        let output = self.git(&["remote", "get-url", REMOTE_NAME]).await?;
        Ok(output.stdout_text().trim().to_string())
    }

    /// Clone `remote` into `workdir` itself, which must exist and be empty
    #[instrument(skip(self), fields(workdir = %self.workdir.display()))]
    pub async fn clone_into_self(&self, remote: &str) -> GitResult<()> {
        self.git(&["clone", remote, "."]).await.map(drop)
    }

    pub async fn init(&self) -> GitResult<()> {
        self.git(&["init"]).await.map(drop)
    }

    pub async fn add_remote(&self, remote: &str) -> GitResult<()> {
        self.git(&["remote", "add", REMOTE_NAME, remote]).await.map(drop)
    }

    /// Update remote-tracking refs; never touches the working tree
    pub async fn fetch(&self) -> GitResult<()> {
        self.git(&["fetch", REMOTE_NAME]).await.map(drop)
    }

    /// Point `origin/HEAD` at the remote's default branch.
    ///
    /// `git fetch` in a freshly initialized repository does not create
    /// `origin/HEAD`, so adoption has to ask for it.
    pub async fn set_remote_head_auto(&self) -> GitResult<()> {
        self.git(&["remote", "set-head", REMOTE_NAME, "--auto"])
            .await
            .map(drop)
    }

    /// Discard local modifications and match `origin/HEAD`
    pub async fn reset_hard(&self) -> GitResult<()> {
        self.git(&["reset", "--hard", REMOTE_HEAD]).await.map(drop)
    }

    /// Abbreviated commit id `origin/HEAD` points at
    pub async fn remote_revision(&self) -> GitResult<String> {
        let output = self
            .git(&["rev-parse", "--short", "--verify", REMOTE_HEAD])
            .await?;
        Ok(output.stdout_text().trim().to_string())
    }

    /// Every file path tracked at `origin/HEAD`, recursively
    pub async fn list_files(&self) -> GitResult<Vec<String>> {
        let output = self.git(&["ls-tree", "-r", "-z", REMOTE_HEAD]).await?;
        parse_tree_listing(&output.stdout)
    }

    /// Whether the working copy of `path` differs from `origin/HEAD`.
    ///
    /// A path missing locally differs. Only the patch on stdout counts;
    /// warnings git writes to stderr (line-ending conversion, for one) do not.
    pub async fn path_differs(&self, path: &str) -> GitResult<bool> {
        let output = self
            .git(&[
                "--literal-pathspecs",
                "diff",
                "--no-ext-diff",
                "--no-renames",
                REMOTE_HEAD,
                "--",
                path,
            ])
            .await?;
        if !output.stderr.is_empty() {
            let warning = String::from_utf8_lossy(&output.stderr);
            debug!(path, warning = %warning.trim(), "git diff wrote to stderr");
        }
        Ok(!output.stdout.is_empty())
    }

    /// Paths whose working copy differs from `origin/HEAD`, in one call.
    ///
    /// Local-only files are not reported. Files missing locally are
    /// reported because the diff sees them as deletions.
    pub async fn changed_paths(&self) -> GitResult<Vec<String>> {
        let output = self
            .git(&[
                "diff",
                "--no-ext-diff",
                "--no-renames",
                "--name-only",
                "-z",
                REMOTE_HEAD,
            ])
            .await?;
        Ok(split_nul(&output.stdout))
    }

    /// Overwrite `path` with its `origin/HEAD` content and stage it
    pub async fn checkout_path(&self, path: &str) -> GitResult<()> {
        self.git(&["--literal-pathspecs", "checkout", REMOTE_HEAD, "--", path])
            .await
            .map(drop)
    }
}

fn split_nul(bytes: &[u8]) -> Vec<String> {
    bytes
        .split(|b| *b == 0)
        .filter(|entry| !entry.is_empty())
        .map(|entry| String::from_utf8_lossy(entry).into_owned())
        .collect()
}

/// Parse `ls-tree -r -z` records (`<mode> <type> <oid>\t<path>`), keeping blobs.
///
/// Submodule entries (`commit`) have no file content to mirror and are skipped.
fn parse_tree_listing(bytes: &[u8]) -> GitResult<Vec<String>> {
    let mut paths = Vec::new();
    for record in bytes.split(|b| *b == 0).filter(|r| !r.is_empty()) {
        let tab = record
            .iter()
            .position(|b| *b == b'\t')
            .ok_or_else(|| GitError::UnexpectedOutput {
                command: "git ls-tree".to_string(),
                detail: format!("record without a path: {}", String::from_utf8_lossy(record)),
            })?;
        let header = String::from_utf8_lossy(&record[..tab]);
        let kind = header.split_whitespace().nth(1);
        if kind != Some("blob") {
            continue;
        }
        paths.push(String::from_utf8_lossy(&record[tab + 1..]).into_owned());
    }
    Ok(paths)
}
