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
//! Subscriber installation.

use crate::config::{LogConfig, LogError, LogFormat, LogOutput};
use std::io;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Initialize tracing with the given format and optional level.
///
/// `level` may be a bare level (`"debug"`) or a full directive list. When it
/// is `None`, `RUST_LOG` is used, falling back to `info`.
///
/// # Example
///
/// ```ignore
/// use gitmirror_observability::{init_tracing, LogFormat};
///
/// init_tracing(LogFormat::Pretty, Some("debug"))?;
/// tracing::info!("mirror started");
/// ```
pub fn init_tracing(format: LogFormat, level: Option<&str>) -> Result<(), LogError> {
    let mut config = LogConfig::new().with_format(format);
    if let Some(level) = level {
        config = config.with_level(level);
    }
    init_tracing_with_config(config)
}

/// Initialize tracing from a full [`LogConfig`].
///
/// Fails with [`LogError::ConfigError`] if the filter does not parse or a
/// global subscriber is already installed.
pub fn init_tracing_with_config(config: LogConfig) -> Result<(), LogError> {
    let env_filter = build_env_filter(&config)?;

    Registry::default()
        .with(build_fmt_layer(&config))
        .with(env_filter)
        .try_init()
        .map_err(|e| LogError::ConfigError(format!("Failed to install subscriber: {}", e)))
}

fn build_fmt_layer<S>(config: &LogConfig) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let base = fmt::layer()
        .with_writer(get_writer(config.output))
        .with_target(config.include_targets)
        .with_thread_ids(config.include_thread_ids);

    match (config.format, config.use_timestamps) {
        (LogFormat::Pretty, true) => base
            .pretty()
            .with_ansi(config.use_color)
            .with_span_events(FmtSpan::NONE)
            .boxed(),
        (LogFormat::Pretty, false) => base
            .pretty()
            .without_time()
            .with_ansi(config.use_color)
            .with_span_events(FmtSpan::NONE)
            .boxed(),
        (LogFormat::Compact, true) => base
            .compact()
            .with_ansi(config.use_color)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        (LogFormat::Compact, false) => base
            .compact()
            .without_time()
            .with_ansi(config.use_color)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        (LogFormat::Json, true) => base
            .json()
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        (LogFormat::Json, false) => base
            .json()
            .without_time()
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    }
}

fn get_writer(output: LogOutput) -> fn() -> Box<dyn io::Write + Send> {
    match output {
        LogOutput::Stderr => || Box::new(io::stderr()),
        LogOutput::Stdout => || Box::new(io::stdout()),
    }
}

fn build_env_filter(config: &LogConfig) -> Result<EnvFilter, LogError> {
    let directives = config.filter_directives();

    EnvFilter::try_new(&directives).map_err(|e| {
        LogError::ConfigError(format!("Failed to parse log filter '{}': {}", directives, e))
    })
}
