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
//! Integration tests against the real git binary

#![allow(clippy::unwrap_used)]

use gitmirror_config::InitPolicy;
use gitmirror_git::{GitCli, GitRepository, InitError, InitOutcome, RepoInitializer, RepoState};
use gitmirror_test_utils::{assert_file_content, TestRemote};
use std::fs;

fn repo_at(path: &std::path::Path) -> GitRepository<GitCli> {
    GitRepository::new(path, GitCli::new())
}

#[tokio::test]
async fn test_clone_into_absent_directory() {
    let remote = TestRemote::with_files(&[("a.txt", "1"), ("dir/b.txt", "2")]);
    let mirror = remote.mirror_path();
    let repo = repo_at(&mirror);
    let url = remote.url();
    let init = RepoInitializer::new(&repo, &url, InitPolicy::Refuse);

    assert_eq!(init.classify().await.unwrap(), RepoState::Absent);
    assert_eq!(init.run().await.unwrap(), InitOutcome::Cloned);
    assert_file_content(&mirror, "a.txt", "1");
    assert_file_content(&mirror, "dir/b.txt", "2");
    assert_eq!(repo.remote_url().await.unwrap(), url);
}

#[tokio::test]
async fn test_second_start_verifies_remote() {
    let remote = TestRemote::with_files(&[("a.txt", "1")]);
    let mirror = remote.mirror_path();
    let repo = repo_at(&mirror);
    let url = remote.url();

    RepoInitializer::new(&repo, &url, InitPolicy::Refuse).run().await.unwrap();
    let outcome = RepoInitializer::new(&repo, &url, InitPolicy::Refuse)
        .run()
        .await
        .unwrap();
    assert_eq!(outcome, InitOutcome::Verified);
}

#[tokio::test]
async fn test_remote_mismatch_is_fatal() {
    let remote = TestRemote::with_files(&[("a.txt", "1")]);
    let other = TestRemote::with_files(&[("x.txt", "x")]);
    let mirror = remote.mirror_path();
    let repo = repo_at(&mirror);

    RepoInitializer::new(&repo, &remote.url(), InitPolicy::Refuse)
        .run()
        .await
        .unwrap();
    let err = RepoInitializer::new(&repo, &other.url(), InitPolicy::Refuse)
        .run()
        .await
        .unwrap_err();

    match err {
        InitError::RemoteMismatch { configured, actual } => {
            assert_eq!(configured, other.url());
            assert_eq!(actual, remote.url());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_plain_directory_refused_and_untouched() {
    let remote = TestRemote::with_files(&[("a.txt", "1")]);
    let mirror = remote.mirror_path();
    fs::create_dir_all(&mirror).unwrap();
    fs::write(mirror.join("local.txt"), "keep").unwrap();
    let repo = repo_at(&mirror);

    let err = RepoInitializer::new(&repo, &remote.url(), InitPolicy::Refuse)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, InitError::NotARepository(_)));
    assert!(!mirror.join(".git").exists());
    assert_file_content(&mirror, "local.txt", "keep");
}

#[tokio::test]
async fn test_adopt_plain_directory() {
    let remote = TestRemote::with_files(&[("a.txt", "remote")]);
    let mirror = remote.mirror_path();
    fs::create_dir_all(&mirror).unwrap();
    fs::write(mirror.join("a.txt"), "local").unwrap();
    let repo = repo_at(&mirror);

    let outcome = RepoInitializer::new(&repo, &remote.url(), InitPolicy::Adopt)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome, InitOutcome::Adopted);
    assert_file_content(&mirror, "a.txt", "remote");
    assert!(repo.is_work_tree().await.unwrap());
}

#[tokio::test]
async fn test_subdirectory_of_repository_is_not_a_work_tree() {
    let remote = TestRemote::with_files(&[("a.txt", "1")]);
    let mirror = remote.mirror_path();
    RepoInitializer::new(&repo_at(&mirror), &remote.url(), InitPolicy::Refuse)
        .run()
        .await
        .unwrap();
    let nested = mirror.join("nested");
    fs::create_dir_all(&nested).unwrap();

    assert!(!repo_at(&nested).is_work_tree().await.unwrap());
}

#[tokio::test]
async fn test_list_diff_and_checkout() {
    let remote = TestRemote::with_files(&[("a.txt", "1"), ("dir/b.txt", "2")]);
    let mirror = remote.mirror_path();
    let repo = repo_at(&mirror);
    RepoInitializer::new(&repo, &remote.url(), InitPolicy::Refuse)
        .run()
        .await
        .unwrap();

    remote.write("a.txt", "1 changed");
    remote.write("c d.txt", "3");
    remote.commit_and_push("Update a, add c");
    repo.fetch().await.unwrap();
    assert!(remote.head().starts_with(&repo.remote_revision().await.unwrap()));

    let mut files = repo.list_files().await.unwrap();
    files.sort();
    assert_eq!(files, vec!["a.txt", "c d.txt", "dir/b.txt"]);

    assert!(repo.path_differs("a.txt").await.unwrap());
    assert!(repo.path_differs("c d.txt").await.unwrap());
    assert!(!repo.path_differs("dir/b.txt").await.unwrap());

    let mut changed = repo.changed_paths().await.unwrap();
    changed.sort();
    assert_eq!(changed, vec!["a.txt", "c d.txt"]);

    repo.checkout_path("a.txt").await.unwrap();
    repo.checkout_path("c d.txt").await.unwrap();
    assert_file_content(&mirror, "a.txt", "1 changed");
    assert_file_content(&mirror, "c d.txt", "3");
    assert!(!repo.path_differs("a.txt").await.unwrap());
}

#[tokio::test]
async fn test_glob_characters_are_literal() {
    let remote = TestRemote::with_files(&[("star*.txt", "literal"), ("starX.txt", "other")]);
    let mirror = remote.mirror_path();
    let repo = repo_at(&mirror);
    RepoInitializer::new(&repo, &remote.url(), InitPolicy::Refuse)
        .run()
        .await
        .unwrap();

    fs::write(mirror.join("starX.txt"), "local edit").unwrap();
    assert!(!repo.path_differs("star*.txt").await.unwrap());
    assert!(repo.path_differs("starX.txt").await.unwrap());
}
