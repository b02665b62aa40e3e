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
//! The validated, immutable configuration handed to the mirror at runtime.

use crate::error::ConfigResult;
use crate::schema::{Config, DiffStrategy, InitPolicy};
use crate::validation::Validator;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where and how to deliver new-file notifications
#[derive(Clone, PartialEq, Eq)]
pub struct NotificationTarget {
    endpoint: String,
    secret: Option<String>,
}

impl NotificationTarget {
    /// Build a target; an empty secret means unsigned delivery
    pub fn new(endpoint: impl Into<String>, secret: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }
}

impl fmt::Debug for NotificationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationTarget")
            .field("endpoint", &self.endpoint)
            .field("signed", &self.secret.is_some())
            .finish()
    }
}

/// Runtime configuration of one mirror.
///
/// Built once from a validated [`Config`]; fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    remote_location: String,
    local_path: PathBuf,
    check_interval: Duration,
    notification: Option<NotificationTarget>,
    init_policy: InitPolicy,
    diff_strategy: DiffStrategy,
    git_program: String,
    command_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    log_level: String,
    log_format: String,
}

impl SyncConfig {
    /// Validate `config` and freeze it.
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        config.validate()?;

        let notification = config
            .notification
            .endpoint
            .as_ref()
            .map(|endpoint| NotificationTarget::new(endpoint.trim(), config.notification.secret.clone()));

        Ok(Self {
            remote_location: config.mirror.remote_url.trim().to_string(),
            local_path: config.mirror.local_path.clone(),
            check_interval: config.mirror.check_interval,
            notification,
            init_policy: config.mirror.init_policy,
            diff_strategy: config.mirror.diff_strategy,
            git_program: config.execution.git_program.clone(),
            command_timeout: config.execution.command_timeout_secs.map(Duration::from_secs),
            request_timeout: config.notification.request_timeout_secs.map(Duration::from_secs),
            log_level: config.observability.log_level.clone(),
            log_format: config.observability.log_format.clone(),
        })
    }

    pub fn remote_location(&self) -> &str {
        &self.remote_location
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    /// Notification target, or `None` when notifications are disabled
    pub fn notification(&self) -> Option<&NotificationTarget> {
        self.notification.as_ref()
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notification.is_some()
    }

    pub fn init_policy(&self) -> InitPolicy {
        self.init_policy
    }

    pub fn diff_strategy(&self) -> DiffStrategy {
        self.diff_strategy
    }

    pub fn git_program(&self) -> &str {
        &self.git_program
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Validated log level (`trace` through `error`)
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Validated log format name (`pretty`, `compact` or `json`)
    pub fn log_format(&self) -> &str {
        &self.log_format
    }
}

impl TryFrom<&Config> for SyncConfig {
    type Error = crate::error::ConfigError;

    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        Self::from_config(config)
    }
}
