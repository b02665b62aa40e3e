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
//! gitmirror launcher
//!
//! Resolves configuration (defaults, file, environment, flags), prepares the
//! local directory, then runs sync checks until interrupted.

mod cli;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::{flag_for, Cli};
use gitmirror_config::{format_duration, ConfigError, ConfigLoader, SyncConfig};
use gitmirror_git::{GitCli, GitRepository, InitOutcome, RepoInitializer};
use gitmirror_notify::WebhookNotifier;
use gitmirror_observability::{init_tracing, LogFormat};
use gitmirror_sync::{Scheduler, SyncEngine};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match resolve_config(&cli).await {
        Ok(config) => config,
        Err(ConfigError::MissingRequired(field)) => {
            output::error(&format!("Missing required value: {}", flag_for(&field)));
            eprintln!();
            eprintln!("{}", Cli::command().render_help());
            std::process::exit(1);
        }
        Err(e) => {
            output::error(&format!("Error: {}", e));
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        output::error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Defaults < config file < `GITMIRROR_*` environment < command-line flags
async fn resolve_config(cli: &Cli) -> Result<SyncConfig, ConfigError> {
    let mut config = ConfigLoader::without_validation()
        .load_layered(cli.config.as_deref())
        .await?;
    cli.apply_to(&mut config);
    SyncConfig::from_config(&config)
}

fn init_logging(config: &SyncConfig) {
    let format = config
        .log_format()
        .parse::<LogFormat>()
        .unwrap_or_default();
    if let Err(e) = init_tracing(format, Some(config.log_level())) {
        output::warning(&format!("Logging disabled: {}", e));
    }
}

async fn run(config: SyncConfig) -> Result<()> {
    let repo = GitRepository::new(config.local_path(), GitCli::from_config(&config));

    let outcome = RepoInitializer::new(&repo, config.remote_location(), config.init_policy())
        .run()
        .await
        .context("Repository initialization failed")?;
    match outcome {
        InitOutcome::Cloned => output::success("Repository cloned"),
        InitOutcome::Adopted => output::success("Existing directory adopted as mirror"),
        InitOutcome::Verified => output::success("Existing repository matches remote"),
    }

    let mut engine = SyncEngine::new(repo).with_strategy(config.diff_strategy());
    if let Some(target) = config.notification() {
        let notifier = WebhookNotifier::from_target(target, config.request_timeout())
            .context("Invalid notification endpoint")?;
        engine = engine.with_notifier(Arc::new(notifier));
    }

    print_banner(&config);

    let ticks = Scheduler::new(config.check_interval())
        .run(&engine, shutdown_signal())
        .await;
    info!(ticks, "Stopped");
    output::info(&format!("Stopped after {} checks", ticks));
    Ok(())
}

fn print_banner(config: &SyncConfig) {
    output::header("Monitoring repository");
    output::detail("Remote", config.remote_location());
    output::detail("Local directory", &config.local_path().display().to_string());
    output::detail("Interval", &format_duration(config.check_interval()));
    let notifications = match config.notification() {
        Some(target) if target.secret().is_some() => "signed webhook",
        Some(_) => "webhook",
        None => "disabled",
    };
    output::detail("Notifications", notifications);
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        output::warning(&format!("Cannot listen for Ctrl-C: {}", e));
        warn!(error = %e, "Ctrl-C handler unavailable; running until killed");
        std::future::pending::<()>().await;
    }
}
