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
//! CLI command helpers for testing the gitmirror binary.
//!
//! Provides convenient wrappers around assert_cmd.

use assert_cmd::Command;
use std::path::Path;

/// Creates a new gitmirror Command for testing.
///
/// Environment variables that would otherwise leak configuration into the
/// command under test are cleared.
///
/// # Example
/// ```ignore
/// use gitmirror_test_utils::gitmirror;
///
/// gitmirror().arg("--help").assert().success();
/// ```
#[allow(deprecated)] // cargo_bin is deprecated but still works for our use case
pub fn gitmirror() -> Command {
    let mut cmd = Command::cargo_bin("gitmirror").expect("gitmirror binary not found");
    for var in [
        "GITMIRROR_REMOTE_URL",
        "GITMIRROR_LOCAL_PATH",
        "GITMIRROR_CHECK_INTERVAL",
        "GITMIRROR_INIT_POLICY",
        "GITMIRROR_DIFF_STRATEGY",
        "GITMIRROR_NOTIFY_URL",
        "GITMIRROR_NOTIFY_SECRET",
        "GITMIRROR_LOG_LEVEL",
        "GITMIRROR_LOG_FORMAT",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Fluent builder for a mirror invocation.
pub struct GitmirrorCommand {
    cmd: Command,
}

impl GitmirrorCommand {
    /// Start from a bare `gitmirror` command.
    pub fn new() -> Self {
        Self { cmd: gitmirror() }
    }

    /// Set `--url`.
    pub fn url(mut self, url: &str) -> Self {
        self.cmd.arg("--url").arg(url);
        self
    }

    /// Set `--path`.
    pub fn path(mut self, path: &Path) -> Self {
        self.cmd.arg("--path").arg(path);
        self
    }

    /// Set `--interval`.
    pub fn interval(mut self, interval: &str) -> Self {
        self.cmd.arg("--interval").arg(interval);
        self
    }

    /// Add an argument to the command.
    pub fn arg(mut self, arg: &str) -> Self {
        self.cmd.arg(arg);
        self
    }

    /// Execute the command and assert failure.
    pub fn run_failure(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().failure()
    }

    /// Get the underlying Command for custom assertions.
    pub fn into_inner(self) -> Command {
        self.cmd
    }
}

impl Default for GitmirrorCommand {
    fn default() -> Self {
        Self::new()
    }
}
