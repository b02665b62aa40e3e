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
//! End-to-end sync tests against real git repositories

#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use gitmirror_config::{DiffStrategy, InitPolicy};
use gitmirror_git::{GitCli, GitRepository, RepoInitializer};
use gitmirror_notify::{Notifier, NotifyResult};
use gitmirror_sync::{NotificationStatus, SyncEngine};
use gitmirror_test_utils::{assert_file_content, assert_file_missing, TestRemote};
use std::fs;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) -> NotifyResult<()> {
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

struct Mirror {
    remote: TestRemote,
    engine: SyncEngine<GitCli>,
    notifier: Arc<RecordingNotifier>,
}

impl Mirror {
    async fn start(files: &[(&str, &str)], strategy: DiffStrategy) -> Self {
        let remote = TestRemote::with_files(files);
        let repo = GitRepository::new(remote.mirror_path(), GitCli::new());
        RepoInitializer::new(&repo, &remote.url(), InitPolicy::Refuse)
            .run()
            .await
            .unwrap();

        let notifier = Arc::new(RecordingNotifier::default());
        let engine = SyncEngine::new(repo)
            .with_strategy(strategy)
            .with_notifier(Arc::clone(&notifier) as Arc<dyn Notifier>);
        Self {
            remote,
            engine,
            notifier,
        }
    }

    fn path(&self) -> std::path::PathBuf {
        self.remote.mirror_path()
    }

    fn messages(&self) -> Vec<String> {
        self.notifier.messages.lock().unwrap().clone()
    }
}

#[tokio::test]
async fn test_new_file_is_created_and_announced() {
    let mirror = Mirror::start(&[("a.txt", "1"), ("b.txt", "2")], DiffStrategy::PerPath).await;

    mirror.remote.write("a.txt", "1 changed");
    mirror.remote.write("dir/c.txt", "3");
    mirror.remote.commit_and_push("Update a, add c");

    let result = mirror.engine.tick().await.unwrap();

    assert_eq!(result.updated_paths, vec!["a.txt"]);
    assert_eq!(result.newly_created_paths, vec!["dir/c.txt"]);
    assert_eq!(result.notification, NotificationStatus::Sent);
    assert_eq!(mirror.messages(), vec!["New files synced:\n- dir/c.txt"]);
    assert_file_content(&mirror.path(), "a.txt", "1 changed");
    assert_file_content(&mirror.path(), "b.txt", "2");
    assert_file_content(&mirror.path(), "dir/c.txt", "3");
}

#[tokio::test]
async fn test_second_tick_is_idempotent() {
    let mirror = Mirror::start(&[("a.txt", "1")], DiffStrategy::PerPath).await;
    mirror.remote.write("b.txt", "2");
    mirror.remote.commit_and_push("Add b");

    assert!(mirror.engine.tick().await.unwrap().any_change);
    let second = mirror.engine.tick().await.unwrap();

    assert!(second.is_current());
    assert!(second.updated_paths.is_empty());
    assert!(second.newly_created_paths.is_empty());
    assert_eq!(mirror.messages().len(), 1);
}

#[tokio::test]
async fn test_unchanged_remote_is_current() {
    let mirror = Mirror::start(&[("a.txt", "1")], DiffStrategy::PerPath).await;

    let result = mirror.engine.tick().await.unwrap();

    assert!(result.is_current());
    assert_eq!(result.notification, NotificationStatus::NotSent);
    assert!(result.revision.is_some());
}

#[tokio::test]
async fn test_upstream_deletion_is_not_propagated() {
    let mirror = Mirror::start(&[("a.txt", "1"), ("b.txt", "2")], DiffStrategy::PerPath).await;
    fs::write(mirror.path().join("local-only.txt"), "mine").unwrap();

    mirror.remote.remove("b.txt");
    mirror.remote.commit_and_push("Remove b");
    let result = mirror.engine.tick().await.unwrap();

    assert!(result.is_current());
    assert_file_content(&mirror.path(), "b.txt", "2");
    assert_file_content(&mirror.path(), "local-only.txt", "mine");
}

#[tokio::test]
async fn test_local_directory_survives_upstream_file_of_same_name() {
    for strategy in [DiffStrategy::PerPath, DiffStrategy::Batched] {
        let mirror = Mirror::start(&[("a.txt", "1")], strategy).await;
        fs::create_dir_all(mirror.path().join("x")).unwrap();
        fs::write(mirror.path().join("x/precious.txt"), "mine").unwrap();

        mirror.remote.write("x", "upstream file");
        mirror.remote.write("y.txt", "2");
        mirror.remote.commit_and_push("Add x and y");

        let result = mirror.engine.tick().await.unwrap();

        assert_eq!(result.failed_paths.len(), 1, "{strategy:?}");
        assert_eq!(result.failed_paths[0].path, "x", "{strategy:?}");
        assert!(result.updated_paths.is_empty(), "{strategy:?}");
        assert_eq!(result.newly_created_paths, vec!["y.txt"], "{strategy:?}");
        assert_eq!(mirror.messages(), vec!["New files synced:\n- y.txt"]);
        assert_file_content(&mirror.path(), "x/precious.txt", "mine");
    }
}

#[tokio::test]
async fn test_updates_only_are_not_announced() {
    let mirror = Mirror::start(&[("a.txt", "1")], DiffStrategy::PerPath).await;
    mirror.remote.write("a.txt", "2");
    mirror.remote.commit_and_push("Update a");

    let result = mirror.engine.tick().await.unwrap();

    assert_eq!(result.updated_paths, vec!["a.txt"]);
    assert_eq!(result.notification, NotificationStatus::NotSent);
    assert!(mirror.messages().is_empty());
}

#[tokio::test]
async fn test_local_edit_is_overwritten() {
    let mirror = Mirror::start(&[("a.txt", "remote")], DiffStrategy::PerPath).await;
    fs::write(mirror.path().join("a.txt"), "local edit").unwrap();

    let result = mirror.engine.tick().await.unwrap();

    assert_eq!(result.updated_paths, vec!["a.txt"]);
    assert_file_content(&mirror.path(), "a.txt", "remote");
}

#[tokio::test]
async fn test_locally_deleted_file_is_restored_as_new() {
    let mirror = Mirror::start(&[("a.txt", "1")], DiffStrategy::PerPath).await;
    fs::remove_file(mirror.path().join("a.txt")).unwrap();
    assert_file_missing(&mirror.path(), "a.txt");

    let result = mirror.engine.tick().await.unwrap();

    assert_eq!(result.newly_created_paths, vec!["a.txt"]);
    assert_file_content(&mirror.path(), "a.txt", "1");
}

#[tokio::test]
async fn test_batched_strategy_matches_per_path() {
    let per_path = Mirror::start(&[("a.txt", "1"), ("b.txt", "2")], DiffStrategy::PerPath).await;
    let batched = Mirror::start(&[("a.txt", "1"), ("b.txt", "2")], DiffStrategy::Batched).await;

    for mirror in [&per_path, &batched] {
        fs::write(mirror.path().join("local-only.txt"), "mine").unwrap();
        mirror.remote.write("a.txt", "1 changed");
        mirror.remote.write("dir/c.txt", "3");
        mirror.remote.remove("b.txt");
        mirror.remote.commit_and_push("Mixed changes");
    }

    let expected = per_path.engine.tick().await.unwrap();
    let actual = batched.engine.tick().await.unwrap();

    assert_eq!(actual.updated_paths, expected.updated_paths);
    assert_eq!(actual.newly_created_paths, expected.newly_created_paths);
    assert_eq!(batched.messages(), per_path.messages());
    for mirror in [&per_path, &batched] {
        assert_file_content(&mirror.path(), "a.txt", "1 changed");
        assert_file_content(&mirror.path(), "b.txt", "2");
        assert_file_content(&mirror.path(), "dir/c.txt", "3");
        assert_file_content(&mirror.path(), "local-only.txt", "mine");
    }
}

#[tokio::test]
async fn test_fetch_failure_leaves_tree_untouched() {
    let mirror = Mirror::start(&[("a.txt", "1")], DiffStrategy::PerPath).await;
    fs::write(mirror.path().join("a.txt"), "local edit").unwrap();
    fs::rename(
        mirror.remote.url(),
        format!("{}.moved", mirror.remote.url()),
    )
    .unwrap();

    let err = mirror.engine.tick().await.unwrap_err();

    assert!(err.is_transient());
    assert_file_content(&mirror.path(), "a.txt", "local edit");
}
