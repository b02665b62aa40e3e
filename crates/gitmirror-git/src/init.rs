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
//! Preparing the local directory before the first sync tick

use crate::error::{GitError, InitError};
use crate::executor::CommandExecutor;
use crate::repository::GitRepository;
use gitmirror_config::InitPolicy;
use std::path::Path;
use tracing::{info, instrument, warn};

/// What was found at the local path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoState {
    /// Nothing exists at the path
    Absent,
    /// The path exists but is not the top level of a working tree
    NotARepository,
    /// The path is a working tree
    Repository,
}

/// What [`RepoInitializer::run`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The remote was cloned into a new directory
    Cloned,
    /// An existing plain directory was turned into a mirror
    Adopted,
    /// An existing repository was checked against the configured remote
    Verified,
}

/// Makes the local path a working tree of the configured remote, or refuses.
#[derive(Debug)]
pub struct RepoInitializer<'a, E> {
    repo: &'a GitRepository<E>,
    remote: &'a str,
    policy: InitPolicy,
}

impl<'a, E: CommandExecutor> RepoInitializer<'a, E> {
    pub fn new(repo: &'a GitRepository<E>, remote: &'a str, policy: InitPolicy) -> Self {
        Self {
            repo,
            remote,
            policy,
        }
    }

    /// Inspect the local path without changing anything
    pub async fn classify(&self) -> Result<RepoState, InitError> {
        let path = self.repo.workdir();
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|source| InitError::Inspect {
                path: path.to_path_buf(),
                source,
            })?;
        if !exists {
            return Ok(RepoState::Absent);
        }
        if self.repo.is_work_tree().await? {
            Ok(RepoState::Repository)
        } else {
            Ok(RepoState::NotARepository)
        }
    }

    /// Clone, adopt or verify according to [`classify`](Self::classify).
    ///
    /// Every error returned here is fatal for startup.
    #[instrument(skip(self), fields(path = %self.repo.workdir().display(), remote = %self.remote))]
    pub async fn run(&self) -> Result<InitOutcome, InitError> {
        match self.classify().await? {
            RepoState::Absent => self.clone_fresh().await,
            RepoState::NotARepository => match self.policy {
                InitPolicy::Refuse => {
                    warn!("Local path exists but is not a git repository");
                    Err(InitError::NotARepository(self.repo.workdir().to_path_buf()))
                }
                InitPolicy::Adopt => self.adopt().await,
            },
            RepoState::Repository => self.verify_remote().await,
        }
    }

    async fn clone_fresh(&self) -> Result<InitOutcome, InitError> {
        let path = self.repo.workdir();
        info!("Local path does not exist, cloning");
        create_dir_all(path).await?;
        self.repo
            .clone_into_self(self.remote)
            .await
            .map_err(|source| InitError::Clone {
                remote: self.remote.to_string(),
                source,
            })?;
        info!("Clone complete");
        Ok(InitOutcome::Cloned)
    }

    async fn adopt(&self) -> Result<InitOutcome, InitError> {
        info!("Adopting existing directory as a mirror");
        let step = |step: &'static str| move |source: GitError| InitError::Adopt { step, source };

        self.repo.init().await.map_err(step("init"))?;
        self.repo.add_remote(self.remote).await.map_err(step("remote add"))?;
        self.repo.fetch().await.map_err(step("fetch"))?;
        self.repo
            .set_remote_head_auto()
            .await
            .map_err(step("remote set-head"))?;
        self.repo.reset_hard().await.map_err(step("reset"))?;
        info!("Directory adopted");
        Ok(InitOutcome::Adopted)
    }

    async fn verify_remote(&self) -> Result<InitOutcome, InitError> {
        let actual = self.repo.remote_url().await.map_err(InitError::RemoteLookup)?;
        let configured = self.remote.trim();
        if actual != configured {
            return Err(InitError::RemoteMismatch {
                configured: configured.to_string(),
                actual,
            });
        }
        info!("Existing repository matches the configured remote");
        Ok(InitOutcome::Verified)
    }
}

async fn create_dir_all(path: &Path) -> Result<(), InitError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| InitError::CreateDir {
            path: path.to_path_buf(),
            source,
        })
}
