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
//! Subprocess execution.
//!
//! Every git interaction goes through [`CommandExecutor`], so the sync engine
//! and the initializer can be driven by [`ScriptedExecutor`](crate::scripted::ScriptedExecutor)
//! in tests instead of a real `git` binary.

use crate::error::{GitError, GitResult};
use async_trait::async_trait;
use gitmirror_config::SyncConfig;
use std::fmt::Debug;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, trace};

/// Captured output of a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Output with only stdout populated
    pub fn from_stdout(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    /// stdout followed by stderr
    pub fn combined(&self) -> Vec<u8> {
        let mut merged = Vec::with_capacity(self.stdout.len() + self.stderr.len());
        merged.extend_from_slice(&self.stdout);
        merged.extend_from_slice(&self.stderr);
        merged
    }

    pub fn combined_text(&self) -> String {
        String::from_utf8_lossy(&self.combined()).into_owned()
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Runs one external command rooted at a directory.
///
/// Implementations spawn exactly one short-lived process per call and never
/// retry; callers decide what a failure means.
#[async_trait]
pub trait CommandExecutor: Send + Sync + Debug {
    /// Run the command with `args` against `directory`.
    ///
    /// Fails with [`GitError::CommandFailed`] on a non-zero exit status.
    async fn run(&self, directory: &Path, args: &[&str]) -> GitResult<CommandOutput>;
}

#[async_trait]
impl<E: CommandExecutor + ?Sized> CommandExecutor for Arc<E> {
    async fn run(&self, directory: &Path, args: &[&str]) -> GitResult<CommandOutput> {
        (**self).run(directory, args).await
    }
}

/// [`CommandExecutor`] backed by the `git` command-line client.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    timeout: Option<Duration>,
}

impl GitCli {
    /// Executor for `git` on `PATH` with no timeout
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
            timeout: None,
        }
    }

    /// Executor using the program and timeout from `config`
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            program: config.git_program().to_string(),
            timeout: config.command_timeout(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Kill commands that run longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn render(&self, args: &[&str]) -> String {
        let mut rendered = self.program.clone();
        for arg in args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        rendered
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for GitCli {
    async fn run(&self, directory: &Path, args: &[&str]) -> GitResult<CommandOutput> {
        let rendered = self.render(args);
        debug!(dir = %directory.display(), command = %rendered, "Running command");

        let mut command = Command::new(&self.program);
        command
            .arg("-C")
            .arg(directory)
            .args(args)
            .stdin(Stdio::null())
            // Never block on a credential prompt in an unattended loop.
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true);

        let result = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, command.output())
                .await
                .map_err(|_| GitError::Timeout {
                    command: rendered.clone(),
                    timeout,
                })?,
            None => command.output().await,
        };

        let output = result.map_err(|source| GitError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let captured = CommandOutput {
            stdout: output.stdout,
            stderr: output.stderr,
        };

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: rendered,
                status: output.status.to_string(),
                output: captured.combined_text().trim_end().to_string(),
            });
        }

        trace!(command = %rendered, bytes = captured.stdout.len(), "Command finished");
        Ok(captured)
    }
}
