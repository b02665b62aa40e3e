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
use crate::duration::serde_duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Top-level configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// What to mirror and where
    pub mirror: MirrorConfig,

    /// Webhook notification settings
    pub notification: NotificationConfig,

    /// Subprocess execution settings
    pub execution: ExecutionConfig,

    /// Logging settings
    pub observability: ObservabilityConfig,
}

/// Mirror source, destination and cadence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MirrorConfig {
    /// Upstream repository location (URL or path understood by git)
    #[serde(default)]
    pub remote_url: String,

    /// Local working directory kept in sync
    #[serde(default)]
    pub local_path: PathBuf,

    /// Time between sync ticks (e.g. "300s", "5m", or an integer of seconds)
    #[serde(default = "default_check_interval", with = "serde_duration")]
    pub check_interval: Duration,

    /// What to do when `local_path` exists but is not a repository
    #[serde(default)]
    pub init_policy: InitPolicy,

    /// How changed paths are detected each tick
    #[serde(default)]
    pub diff_strategy: DiffStrategy,
}

/// Policy for a local directory that exists but is not a git repository
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InitPolicy {
    /// Stop with an error and leave the directory untouched
    #[default]
    Refuse,

    /// Initialize a repository in place and hard-reset it to the remote
    Adopt,
}

/// Change detection strategy for a sync tick
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiffStrategy {
    /// One `git diff` per remote path
    #[default]
    PerPath,

    /// A single `git diff --name-only` filtered by the remote file set
    Batched,
}

/// Webhook notification settings
#[derive(Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NotificationConfig {
    /// Webhook URL; notifications are disabled when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Shared secret used to sign requests
    #[serde(default)]
    pub secret: Option<String>,

    /// HTTP request timeout (in seconds); unset means no timeout
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Subprocess execution settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionConfig {
    /// git executable name or path
    #[serde(default = "default_git_program")]
    pub git_program: String,

    /// Per-command timeout (in seconds); unset means no timeout
    #[serde(default)]
    pub command_timeout_secs: Option<u64>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (pretty, compact, json)
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            remote_url: String::new(),
            local_path: PathBuf::new(),
            check_interval: default_check_interval(),
            init_policy: InitPolicy::default(),
            diff_strategy: DiffStrategy::default(),
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            git_program: default_git_program(),
            command_timeout_secs: None,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("endpoint", &self.endpoint)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl FromStr for InitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "refuse" => Ok(InitPolicy::Refuse),
            "adopt" => Ok(InitPolicy::Adopt),
            other => Err(format!("unknown init policy '{}', expected refuse or adopt", other)),
        }
    }
}

impl FromStr for DiffStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "per_path" => Ok(DiffStrategy::PerPath),
            "batched" => Ok(DiffStrategy::Batched),
            other => Err(format!("unknown diff strategy '{}', expected per_path or batched", other)),
        }
    }
}

/// Poll interval used when none is configured
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(300);

fn default_check_interval() -> Duration {
    DEFAULT_CHECK_INTERVAL
}

fn default_git_program() -> String {
    "git".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
