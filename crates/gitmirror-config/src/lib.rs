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
//! Configuration for gitmirror
//!
//! Layered configuration: built-in defaults, an optional TOML/YAML/JSON file,
//! `GITMIRROR_*` environment variables, and finally command-line flags applied
//! by the launcher. The merged [`Config`] is validated and frozen into a
//! [`SyncConfig`], which is what the rest of the workspace consumes.
//!
//! # Example
//!
//! ```no_run
//! use gitmirror_config::{ConfigLoader, SyncConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().load_with_overrides("mirror.toml").await?;
//!     let sync = SyncConfig::from_config(&config)?;
//!
//!     println!("Mirroring {} into {}", sync.remote_location(), sync.local_path().display());
//!     Ok(())
//! }
//! ```

pub mod duration;
pub mod error;
pub mod loader;
pub mod runtime;
pub mod schema;
pub mod validation;

// Re-export commonly used items
pub use duration::{format_duration, parse_duration};
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, ConfigLoader, ENV_PREFIX};
pub use runtime::{NotificationTarget, SyncConfig};
pub use schema::*;
pub use validation::{Validator, MIN_CHECK_INTERVAL};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default();
        assert_eq!(config.mirror.check_interval, DEFAULT_CHECK_INTERVAL);
        assert_eq!(config.execution.git_program, "git");
        assert_eq!(config.observability.log_format, "pretty");
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.mirror.remote_url = "https://example.com/team/repo.git".to_string();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("check_interval = \"5m\""));
        assert!(toml.contains("init_policy = \"refuse\""));
        assert!(toml.contains("diff_strategy = \"per_path\""));
    }

    #[test]
    fn test_notification_debug_redacts_secret() {
        let mut config = Config::default();
        config.notification.secret = Some("SECsecret".to_string());
        assert!(!format!("{:?}", config).contains("SECsecret"));
    }
}
