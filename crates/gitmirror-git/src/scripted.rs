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
//! Scripted command executor for tests
//!
//! [`ScriptedExecutor`] answers git invocations from a list of rules instead
//! of spawning processes, and records every call it receives.

use crate::error::{GitError, GitResult};
use crate::executor::{CommandExecutor, CommandOutput};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// A command observed by [`ScriptedExecutor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub directory: PathBuf,
    pub args: Vec<String>,
}

impl RecordedCall {
    /// Whether `pattern` appears in the arguments as an in-order subsequence
    pub fn matches(&self, pattern: &[&str]) -> bool {
        let mut args = self.args.iter();
        pattern
            .iter()
            .all(|token| args.by_ref().any(|arg| arg == token))
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Success(CommandOutput),
    Failure(String),
}

#[derive(Debug)]
struct Rule {
    pattern: Vec<String>,
    reply: Reply,
}

#[derive(Debug, Default)]
struct State {
    rules: Vec<Rule>,
    calls: Vec<RecordedCall>,
}

/// In-memory [`CommandExecutor`].
///
/// The most recently added matching rule wins; calls that match no rule
/// succeed with empty output. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ScriptedExecutor {
    state: Arc<Mutex<State>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, pattern: &[&str], reply: Reply) {
        self.state().rules.push(Rule {
            pattern: pattern.iter().map(|s| s.to_string()).collect(),
            reply,
        });
    }

    /// Answer commands matching `pattern` with `stdout`
    pub fn on(&self, pattern: &[&str], stdout: impl Into<Vec<u8>>) -> &Self {
        self.push(pattern, Reply::Success(CommandOutput::from_stdout(stdout)));
        self
    }

    /// Answer commands matching `pattern` with a full captured output
    pub fn respond(&self, pattern: &[&str], output: CommandOutput) -> &Self {
        self.push(pattern, Reply::Success(output));
        self
    }

    /// Fail commands matching `pattern` with `output` as the captured text
    pub fn fail(&self, pattern: &[&str], output: impl Into<String>) -> &Self {
        self.push(pattern, Reply::Failure(output.into()));
        self
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    /// Calls whose arguments contain `pattern`
    pub fn calls_matching(&self, pattern: &[&str]) -> Vec<RecordedCall> {
        self.state()
            .calls
            .iter()
            .filter(|call| call.matches(pattern))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn run(&self, directory: &Path, args: &[&str]) -> GitResult<CommandOutput> {
        let call = RecordedCall {
            directory: directory.to_path_buf(),
            args: args.iter().map(|s| s.to_string()).collect(),
        };

        let mut state = self.state();
        let reply = state
            .rules
            .iter()
            .rev()
            .find(|rule| {
                let pattern: Vec<&str> = rule.pattern.iter().map(String::as_str).collect();
                call.matches(&pattern)
            })
            .map(|rule| rule.reply.clone());
        state.calls.push(call);
        drop(state);

        match reply {
            None => Ok(CommandOutput::default()),
            Some(Reply::Success(output)) => Ok(output),
            Some(Reply::Failure(output)) => Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                status: "exit status: 1".to_string(),
                output,
            }),
        }
    }
}

/// `ls-tree -r -z` output listing `paths` as blobs
pub fn tree_listing(paths: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    for path in paths {
        out.extend_from_slice(b"100644 blob e69de29bb2d1d6434b8b29ae775ad8c2e48c5391\t");
        out.extend_from_slice(path.as_bytes());
        out.push(0);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_last_matching_rule_wins() {
        let executor = ScriptedExecutor::new();
        executor.on(&["fetch"], "first").on(&["fetch"], "second");
        let output = executor.run(Path::new("/x"), &["fetch", "origin"]).await.unwrap();
        assert_eq!(output.stdout, b"second".to_vec());
    }

    #[tokio::test]
    async fn test_unmatched_calls_succeed_empty() {
        let executor = ScriptedExecutor::new();
        let output = executor.run(Path::new("/x"), &["status"]).await.unwrap();
        assert!(output.combined().is_empty());
        assert_eq!(executor.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_rule() {
        let executor = ScriptedExecutor::new();
        executor.fail(&["fetch"], "fatal: unable to access");
        let err = executor.run(Path::new("/x"), &["fetch", "origin"]).await.unwrap_err();
        assert_eq!(err.captured_output(), Some("fatal: unable to access"));
    }

    #[test]
    fn test_subsequence_matching() {
        let call = RecordedCall {
            directory: PathBuf::from("/x"),
            args: vec!["diff".into(), "origin/HEAD".into(), "--".into(), "a".into()],
        };
        assert!(call.matches(&["diff", "a"]));
        assert!(!call.matches(&["a", "diff"]));
        assert!(!call.matches(&["checkout"]));
    }
}
