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
use crate::error::{ConfigError, ConfigResult};
use crate::schema::*;
use std::time::Duration;

/// Shortest accepted interval between sync ticks
pub const MIN_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Validator for configuration settings
pub trait Validator {
    fn validate(&self) -> ConfigResult<()>;
}

impl Validator for Config {
    fn validate(&self) -> ConfigResult<()> {
        self.mirror.validate()?;
        self.notification.validate()?;
        self.execution.validate()?;
        self.observability.validate()?;
        Ok(())
    }
}

impl Validator for MirrorConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.remote_url.trim().is_empty() {
            return Err(ConfigError::MissingRequired("mirror.remote_url".to_string()));
        }

        if self.local_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("mirror.local_path".to_string()));
        }

        if self.check_interval < MIN_CHECK_INTERVAL {
            return Err(ConfigError::invalid_value(
                "mirror.check_interval",
                format!("must be at least 1s, got {:?}", self.check_interval),
            ));
        }

        Ok(())
    }
}

impl Validator for NotificationConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.endpoint.as_deref().map(str::trim) {
            Some("") => {
                return Err(ConfigError::invalid_value(
                    "notification.endpoint",
                    "must not be empty when set",
                ));
            }
            Some(endpoint) if !is_http_url(endpoint) => {
                return Err(ConfigError::invalid_value(
                    "notification.endpoint",
                    format!("must be an http:// or https:// URL, got {}", endpoint),
                ));
            }
            Some(_) => {}
            None => {
                if self.secret.as_deref().is_some_and(|s| !s.is_empty()) {
                    return Err(ConfigError::ConflictingValues(
                        "notification.secret is set but notification.endpoint is not".to_string(),
                    ));
                }
            }
        }

        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::invalid_value(
                "notification.request_timeout_secs",
                "must be greater than 0 when set",
            ));
        }

        Ok(())
    }
}

impl Validator for ExecutionConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.git_program.trim().is_empty() {
            return Err(ConfigError::MissingRequired("execution.git_program".to_string()));
        }

        if self.command_timeout_secs == Some(0) {
            return Err(ConfigError::invalid_value(
                "execution.command_timeout_secs",
                "must be greater than 0 when set",
            ));
        }

        Ok(())
    }
}

impl Validator for ObservabilityConfig {
    fn validate(&self) -> ConfigResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::invalid_value(
                "observability.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["pretty", "compact", "json"];
        if !valid_formats.contains(&self.log_format.as_str()) {
            return Err(ConfigError::invalid_value(
                "observability.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    ["http://", "https://"]
        .iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.mirror.remote_url = "https://example.com/team/repo.git".to_string();
        config.mirror.local_path = "/srv/mirror".into();
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_default_config_lacks_required_fields() {
        assert!(matches!(
            Config::default().validate(),
            Err(ConfigError::MissingRequired(field)) if field == "mirror.remote_url"
        ));
    }

    #[test]
    fn test_missing_local_path() {
        let mut config = valid_config();
        config.mirror.local_path = "".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(field)) if field == "mirror.local_path"
        ));
    }

    #[test]
    fn test_sub_second_interval_rejected() {
        let mut config = valid_config();
        config.mirror.check_interval = Duration::from_millis(500);
        assert!(config.validate().is_err());

        config.mirror.check_interval = Duration::from_secs(1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_must_be_http() {
        let mut config = valid_config();
        config.notification.endpoint = Some("ftp://hooks.example.com".to_string());
        assert!(config.validate().is_err());

        config.notification.endpoint = Some("https://hooks.example.com/robot/send?access_token=abc".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_secret_without_endpoint_conflicts() {
        let mut config = valid_config();
        config.notification.secret = Some("SECabc".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::ConflictingValues(_))));
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let mut config = valid_config();
        config.execution.command_timeout_secs = Some(0);
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.notification.endpoint = Some("http://localhost:9000/hook".to_string());
        config.notification.request_timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_validation() {
        let mut config = valid_config();
        config.observability.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_format_validation() {
        let mut config = valid_config();
        config.observability.log_format = "xml".to_string();
        assert!(config.validate().is_err());
    }
}
