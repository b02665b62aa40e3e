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

//! Integration tests for configuration loading

#![allow(clippy::unwrap_used)]

use gitmirror_config::{
    ConfigError, ConfigFormat, ConfigLoader, DiffStrategy, InitPolicy, SyncConfig, Validator,
};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

const TOML_CONFIG: &str = r#"
[mirror]
remote_url = "https://example.com/team/repo.git"
local_path = "/srv/mirror/repo"
check_interval = "10s"
init_policy = "refuse"

[notification]
endpoint = "https://hooks.example.com/robot/send?access_token=abc"
secret = "SECabc"
request_timeout_secs = 10

[execution]
command_timeout_secs = 120

[observability]
log_level = "debug"
log_format = "json"
"#;

#[tokio::test]
async fn test_load_from_file_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mirror.toml");
    fs::write(&path, TOML_CONFIG).unwrap();

    let config = ConfigLoader::new().load_file(&path).await.unwrap();
    assert_eq!(config.mirror.remote_url, "https://example.com/team/repo.git");
    assert_eq!(config.mirror.check_interval, Duration::from_secs(10));
    assert_eq!(config.notification.secret.as_deref(), Some("SECabc"));
    assert_eq!(config.execution.command_timeout_secs, Some(120));
    assert_eq!(config.observability.log_format, "json");
}

#[tokio::test]
async fn test_load_from_file_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mirror.yaml");
    fs::write(
        &path,
        r#"
mirror:
  remote_url: git@example.com:team/repo.git
  local_path: /srv/mirror/repo
  check_interval: 1h
  init_policy: adopt
  diff_strategy: batched
"#,
    )
    .unwrap();

    let config = ConfigLoader::new().load_file(&path).await.unwrap();
    assert_eq!(config.mirror.init_policy, InitPolicy::Adopt);
    assert_eq!(config.mirror.diff_strategy, DiffStrategy::Batched);
    assert_eq!(config.mirror.check_interval, Duration::from_secs(3_600));
    assert_eq!(config.notification.endpoint, None);
}

#[tokio::test]
async fn test_load_from_file_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mirror.json");
    fs::write(
        &path,
        r#"{"mirror": {"remote_url": "/srv/upstream.git", "local_path": "/srv/mirror", "check_interval": 30}}"#,
    )
    .unwrap();

    let config = ConfigLoader::new().load_file(&path).await.unwrap();
    assert_eq!(config.mirror.check_interval, Duration::from_secs(30));
}

#[tokio::test]
async fn test_file_not_found() {
    let result = ConfigLoader::new().load_file("/nonexistent/mirror.toml").await;
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[tokio::test]
async fn test_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mirror.ini");
    fs::write(&path, "remote_url=x").unwrap();

    let result = ConfigLoader::new().load_file(&path).await;
    assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_invalid_toml_syntax() {
    let result = ConfigLoader::new().load_from_string("[mirror\nremote_url = ", ConfigFormat::Toml);
    assert!(matches!(result, Err(ConfigError::TomlParseError(_))));
}

#[tokio::test]
async fn test_invalid_interval_in_file() {
    let result = ConfigLoader::new().load_from_string(
        "[mirror]\nremote_url = \"r\"\nlocal_path = \"/l\"\ncheck_interval = \"soon\"\n",
        ConfigFormat::Toml,
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn test_layered_without_file_needs_required_fields() {
    // Validation happens on the merged result, so a loader with validation
    // only succeeds here if the environment provides the required values.
    let config = ConfigLoader::without_validation()
        .load_layered(None::<&str>)
        .await
        .unwrap();
    assert_eq!(config.mirror.check_interval, Duration::from_secs(300));
}

#[test]
fn test_sync_config_from_file_values() {
    let config = ConfigLoader::new()
        .load_from_string(TOML_CONFIG, ConfigFormat::Toml)
        .unwrap();
    assert!(config.validate().is_ok());

    let sync = SyncConfig::from_config(&config).unwrap();
    assert!(sync.notifications_enabled());
    assert_eq!(sync.notification().unwrap().secret(), Some("SECabc"));
    assert_eq!(sync.command_timeout(), Some(Duration::from_secs(120)));
    assert_eq!(sync.request_timeout(), Some(Duration::from_secs(10)));
}
