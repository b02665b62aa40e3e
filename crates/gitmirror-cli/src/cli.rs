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
//! Command-line arguments

use clap::Parser;
use gitmirror_config::{parse_duration, Config, DiffStrategy, InitPolicy};
use gitmirror_observability::LogFormat;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "gitmirror")]
#[command(version, about = "Mirror a remote git repository into a local directory")]
#[command(
    long_about = "gitmirror polls a remote git repository and copies new and modified files \
into a local working tree. Files are never deleted locally, even when they are removed upstream.

Example:
  gitmirror -u https://github.com/org/repo.git -p /srv/mirror -t 10m"
)]
#[command(author = "gitmirror Contributors")]
pub struct Cli {
    /// Remote repository URL
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// Local directory to mirror into
    #[arg(short = 'p', long = "path", value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Poll interval such as 10s, 10m or 1h30m [default: 300s]
    #[arg(short = 't', long = "interval", value_name = "DURATION", value_parser = parse_interval)]
    pub interval: Option<Duration>,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Webhook that receives a message when new files are synced
    #[arg(long, value_name = "URL")]
    pub notify_url: Option<String>,

    /// Secret used to sign webhook requests
    #[arg(long, value_name = "SECRET")]
    pub notify_secret: Option<String>,

    /// Turn an existing non-repository directory into the mirror instead of refusing
    #[arg(long)]
    pub adopt: bool,

    /// Change detection: per_path (one diff per file) or batched (one diff per check)
    #[arg(long, value_name = "STRATEGY")]
    pub diff_strategy: Option<DiffStrategy>,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Log format (pretty|compact|json)
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,
}

fn parse_interval(value: &str) -> Result<Duration, String> {
    parse_duration(value).map_err(|e| e.to_string())
}

impl Cli {
    /// Layer command-line values over `config`.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.mirror.remote_url = url.clone();
        }
        if let Some(path) = &self.path {
            config.mirror.local_path = path.clone();
        }
        if let Some(interval) = self.interval {
            config.mirror.check_interval = interval;
        }
        if self.adopt {
            config.mirror.init_policy = InitPolicy::Adopt;
        }
        if let Some(strategy) = self.diff_strategy {
            config.mirror.diff_strategy = strategy;
        }
        if let Some(endpoint) = &self.notify_url {
            config.notification.endpoint = Some(endpoint.clone()).filter(|v| !v.is_empty());
        }
        if let Some(secret) = &self.notify_secret {
            config.notification.secret = Some(secret.clone()).filter(|v| !v.is_empty());
        }
        if self.verbose {
            config.observability.log_level = "debug".to_string();
        } else if self.quiet {
            config.observability.log_level = "error".to_string();
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format.to_string();
        }
    }
}

/// Command-line flag that sets a configuration field
pub fn flag_for(field: &str) -> &str {
    match field {
        "mirror.remote_url" => "--url",
        "mirror.local_path" => "--path",
        other => other,
    }
}
