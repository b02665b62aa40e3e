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
//! Fixed-interval tick loop

use crate::engine::{NotificationStatus, SyncEngine, SyncResult};
use crate::error::SyncOutcome;
use gitmirror_git::CommandExecutor;
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, info_span, warn, Instrument};

/// Runs [`SyncEngine::tick`] every `interval` until shut down.
///
/// Ticks never overlap. The first tick fires one full interval after
/// [`run`](Self::run) starts, and ticks missed while a slow tick was running
/// are dropped rather than replayed.
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    max_ticks: Option<u64>,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_ticks: None,
        }
    }

    /// Stop on its own after `max_ticks` ticks
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Loop until `shutdown` resolves or the tick limit is reached.
    ///
    /// A tick in flight when `shutdown` resolves is dropped where it stands.
    /// Returns the number of ticks that completed.
    pub async fn run<E, F>(&self, engine: &SyncEngine<E>, shutdown: F) -> u64
    where
        E: CommandExecutor,
        F: Future<Output = ()>,
    {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut completed = 0u64;
        loop {
            if self.max_ticks.is_some_and(|max| completed >= max) {
                info!(ticks = completed, "Tick limit reached");
                break;
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                _ = ticker.tick() => {}
            }

            let span = info_span!("tick", n = completed + 1);
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested during tick");
                    break;
                }
                outcome = engine.tick().instrument(span) => {
                    completed += 1;
                    report(&outcome);
                }
            }
        }
        completed
    }
}

fn report(outcome: &SyncOutcome<SyncResult>) {
    match outcome {
        Ok(result) => {
            if !result.failed_paths.is_empty() {
                warn!(failed = result.failed_paths.len(), "Some files could not be synced");
            }
            if let NotificationStatus::Failed(reason) = &result.notification {
                warn!(reason = %reason, "New files were synced but the notification failed");
            }
        }
        Err(err) => {
            warn!(error = %err, transient = err.is_transient(), "Sync tick failed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use gitmirror_git::{GitRepository, ScriptedExecutor};
    use std::future::pending;

    fn engine(executor: &ScriptedExecutor) -> SyncEngine<ScriptedExecutor> {
        SyncEngine::new(GitRepository::new("/srv/mirror", executor.clone()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_full_interval() {
        let executor = ScriptedExecutor::new();
        let start = Instant::now();

        let ticks = Scheduler::new(Duration::from_secs(300))
            .with_max_ticks(1)
            .run(&engine(&executor), pending())
            .await;

        assert_eq!(ticks, 1);
        assert!(start.elapsed() >= Duration::from_secs(300));
        assert_eq!(executor.calls_matching(&["fetch"]).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_do_not_stop_the_loop() {
        let executor = ScriptedExecutor::new();
        executor.fail(&["fetch"], "fatal: unable to access");

        let ticks = Scheduler::new(Duration::from_secs(10))
            .with_max_ticks(3)
            .run(&engine(&executor), pending())
            .await;

        assert_eq!(ticks, 3);
        assert_eq!(executor.calls_matching(&["fetch"]).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_before_first_tick() {
        let executor = ScriptedExecutor::new();

        let ticks = Scheduler::new(Duration::from_secs(10))
            .run(&engine(&executor), async {})
            .await;

        assert_eq!(ticks, 0);
        assert!(executor.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_after_some_ticks() {
        let executor = ScriptedExecutor::new();
        let shutdown = tokio::time::sleep(Duration::from_secs(25));

        let ticks = Scheduler::new(Duration::from_secs(10))
            .run(&engine(&executor), shutdown)
            .await;

        assert_eq!(ticks, 2);
    }
}
