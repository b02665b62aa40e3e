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
//! Local upstream repositories for integration tests.

use crate::git::{git, git_stdout};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Branch every test remote publishes
pub const DEFAULT_BRANCH: &str = "main";

/// A bare upstream repository plus an authoring clone.
///
/// Files are written into the authoring clone and published with
/// [`commit_and_push`](Self::commit_and_push). The remote URL is the bare
/// repository's filesystem path, which git accepts like any other URL.
///
/// # Example
/// ```ignore
/// use gitmirror_test_utils::TestRemote;
///
/// let remote = TestRemote::with_files(&[("a.txt", "1")]);
/// remote.write("b.txt", "2");
/// remote.commit_and_push("Add b");
/// ```
pub struct TestRemote {
    temp_dir: TempDir,
    bare: PathBuf,
    work: PathBuf,
}

impl TestRemote {
    /// Create an upstream with no commits.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let bare = temp_dir.path().join("upstream.git");
        let work = temp_dir.path().join("author");
        fs::create_dir_all(&bare).expect("Failed to create bare repository directory");
        fs::create_dir_all(&work).expect("Failed to create authoring directory");

        let head = format!("refs/heads/{DEFAULT_BRANCH}");
        git(&bare, &["init", "--bare", "--quiet"]);
        git(&bare, &["symbolic-ref", "HEAD", &head]);

        git(&work, &["init", "--quiet"]);
        git(&work, &["symbolic-ref", "HEAD", &head]);
        let url = bare.to_string_lossy().into_owned();
        git(&work, &["remote", "add", "origin", &url]);

        Self {
            temp_dir,
            bare,
            work,
        }
    }

    /// Create an upstream whose first commit contains `files`.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let remote = Self::new();
        for (path, content) in files {
            remote.write(path, content);
        }
        remote.commit_and_push("Initial commit");
        remote
    }

    /// URL to clone from
    pub fn url(&self) -> String {
        self.bare.to_string_lossy().into_owned()
    }

    /// A path next to the upstream where a mirror may be created.
    ///
    /// The path does not exist until something creates it.
    pub fn mirror_path(&self) -> PathBuf {
        self.temp_dir.path().join("mirror")
    }

    /// Root of the authoring clone
    pub fn author_path(&self) -> &Path {
        &self.work
    }

    /// Write a file in the authoring clone, creating parent directories.
    pub fn write(&self, name: &str, content: &str) {
        let path = self.work.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    /// Delete a file from the authoring clone.
    pub fn remove(&self, name: &str) {
        fs::remove_file(self.work.join(name)).expect("Failed to delete file");
    }

    /// Stage everything, commit and publish to the upstream.
    pub fn commit_and_push(&self, message: &str) {
        git(&self.work, &["add", "--all"]);
        git(&self.work, &["commit", "--quiet", "-m", message]);
        git(&self.work, &["push", "--quiet", "origin", DEFAULT_BRANCH]);
    }

    /// Commit id at the tip of the upstream branch
    pub fn head(&self) -> String {
        git_stdout(&self.bare, &["rev-parse", DEFAULT_BRANCH])
    }
}

impl Default for TestRemote {
    fn default() -> Self {
        Self::new()
    }
}
