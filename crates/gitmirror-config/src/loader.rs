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
use crate::duration::parse_duration;
use crate::error::{ConfigError, ConfigResult};
use crate::schema::Config;
use crate::validation::Validator;
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, info};

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "GITMIRROR_";

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::InvalidPath(path.to_path_buf())),
        }
    }

    /// Get format name as string
    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Yaml => "YAML",
            ConfigFormat::Json => "JSON",
        }
    }
}

/// Configuration loader
///
/// Layers are applied in order: built-in defaults, an optional file, then
/// `GITMIRROR_*` environment variables. Command-line flags are applied by the
/// launcher on top of the result.
pub struct ConfigLoader {
    validate: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        ConfigLoader { validate: true }
    }

    /// Create a loader without validation
    ///
    /// Used when later layers (such as CLI flags) may still fill required
    /// fields; validation then happens when the [`SyncConfig`](crate::SyncConfig)
    /// is built.
    pub fn without_validation() -> Self {
        ConfigLoader { validate: false }
    }

    /// Load configuration from a file
    pub async fn load_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<Config> {
        let path = path.as_ref();
        debug!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path).await?;

        info!(
            "Loaded {} configuration file: {}",
            format.name(),
            path.display()
        );

        self.load_from_string(&content, format)
    }

    /// Load configuration from a string
    pub fn load_from_string(&self, content: &str, format: ConfigFormat) -> ConfigResult<Config> {
        let config: Config = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };

        if self.validate {
            config.validate()?;
            debug!("Configuration validated successfully");
        }

        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub async fn load_with_overrides<P: AsRef<Path>>(&self, path: P) -> ConfigResult<Config> {
        let mut config = self.load_file(path).await?;
        self.apply_env_overrides(&mut config)?;
        if self.validate {
            config.validate()?;
        }
        Ok(config)
    }

    /// Load from `path` if given, otherwise start from defaults; then apply
    /// environment overrides.
    pub async fn load_layered<P: AsRef<Path>>(&self, path: Option<P>) -> ConfigResult<Config> {
        match path {
            Some(path) => self.load_with_overrides(path).await,
            None => {
                let mut config = Config::default();
                self.apply_env_overrides(&mut config)?;
                if self.validate {
                    config.validate()?;
                }
                Ok(config)
            }
        }
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&self, config: &mut Config) -> ConfigResult<()> {
        self.apply_overrides_from(config, |name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// `lookup` receives full variable names such as `GITMIRROR_REMOTE_URL`.
    pub fn apply_overrides_from<F>(&self, config: &mut Config, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| {
            let name = format!("{}{}", ENV_PREFIX, suffix);
            lookup(&name).map(|value| (name, value))
        };

        // Mirror settings
        if let Some((_, value)) = var("REMOTE_URL") {
            config.mirror.remote_url = value;
        }
        if let Some((_, value)) = var("LOCAL_PATH") {
            config.mirror.local_path = value.into();
        }
        if let Some((name, value)) = var("CHECK_INTERVAL") {
            config.mirror.check_interval = parse_duration(&value).map_err(|e| {
                ConfigError::env_var_parsing_error(&name, &value, e.to_string())
            })?;
        }
        if let Some((name, value)) = var("INIT_POLICY") {
            config.mirror.init_policy = parse_env(&name, &value)?;
        }
        if let Some((name, value)) = var("DIFF_STRATEGY") {
            config.mirror.diff_strategy = parse_env(&name, &value)?;
        }

        // Notification settings
        if let Some((_, value)) = var("NOTIFY_URL") {
            config.notification.endpoint = Some(value).filter(|v| !v.is_empty());
        }
        if let Some((_, value)) = var("NOTIFY_SECRET") {
            config.notification.secret = Some(value).filter(|v| !v.is_empty());
        }
        if let Some((name, value)) = var("REQUEST_TIMEOUT_SECS") {
            config.notification.request_timeout_secs = Some(parse_env(&name, &value)?);
        }

        // Execution settings
        if let Some((_, value)) = var("GIT_PROGRAM") {
            config.execution.git_program = value;
        }
        if let Some((name, value)) = var("COMMAND_TIMEOUT_SECS") {
            config.execution.command_timeout_secs = Some(parse_env(&name, &value)?);
        }

        // Observability settings
        if let Some((_, value)) = var("LOG_LEVEL") {
            config.observability.log_level = value.to_lowercase();
        }
        if let Some((_, value)) = var("LOG_FORMAT") {
            config.observability.log_format = value.to_lowercase();
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env<T>(name: &str, value: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: ToString,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::env_var_parsing_error(name, value, e.to_string()))
}
