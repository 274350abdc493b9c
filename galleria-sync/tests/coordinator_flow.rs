//! End-to-end coordinator runs against a local bare remote, using the
//! system git binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use galleria_core::{BadgeHashes, Credentials, SiteConfig};
use galleria_sync::{Coordinator, EventBus, SyncEvent, UiStatus};

fn git_in(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args([
            "-c",
            "user.name=Seed",
            "-c",
            "user.email=seed@example.com",
        ])
        .args(args)
        .current_dir(dir)
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed in {}", dir.display());
}

const SEED_INDEX: &str = "---\n\
title: Summer\n\
date: 2024-01-10T00:00:00Z\n\
categories:\n\
- travel\n\
---\nA week at the coast.\n";

/// A bare remote seeded with one album, plus the path for the working copy.
fn fixture(root: &Path) -> (String, PathBuf) {
    let seed = root.join("seed");
    let album = seed.join("content").join("summer");
    fs::create_dir_all(&album).expect("mkdir");
    fs::write(album.join("_index.md"), SEED_INDEX).expect("write");
    git_in(&seed, &["init", "-q"]);
    git_in(&seed, &["add", "-A"]);
    git_in(&seed, &["commit", "-q", "-m", "seed"]);

    let remote = root.join("origin.git");
    git_in(root, &[
        "clone",
        "-q",
        "--bare",
        seed.to_str().unwrap(),
        remote.to_str().unwrap(),
    ]);

    (remote.to_string_lossy().into_owned(), root.join("repo"))
}

fn config(remote: &str) -> SiteConfig {
    SiteConfig {
        remote_url: remote.to_owned(),
        author_name: "Admin".to_owned(),
        author_email: "admin@example.com".to_owned(),
        username: "admin".to_owned(),
        badge_url: None,
        badge_hashes: BadgeHashes::default(),
        poll_interval_secs: 10,
        preview_command: vec!["hugo".to_owned(), "server".to_owned()],
    }
}

fn creds() -> Credentials {
    Credentials {
        username: "admin".to_owned(),
        token: "unused-for-file-remotes".to_owned(),
    }
}

/// Drain all buffered events and return the last status seen.
fn last_status(rx: &mut tokio::sync::mpsc::UnboundedReceiver<SyncEvent>) -> Option<UiStatus> {
    let mut last = None;
    while let Ok(event) = rx.try_recv() {
        if let SyncEvent::Status(status) = event {
            last = Some(status);
        }
    }
    last
}

#[tokio::test]
async fn update_edit_save_publish_cycle() {
    let root = TempDir::new().expect("root");
    let (remote, work_dir) = fixture(root.path());
    let (events, mut rx) = EventBus::channel();
    let mut coordinator = Coordinator::new(&work_dir, config(&remote), creds(), events);

    coordinator.update(false).await.expect("update");
    assert_eq!(coordinator.store().albums().len(), 1);
    let status = last_status(&mut rx).expect("status after update");
    assert!(!status.unsaved_changes);
    assert!(!status.can_commit);
    assert!(!status.can_publish);

    // An in-memory edit blocks repo actions until saved.
    let id = coordinator
        .edit(|store| store.add_album("Winter", "travel"))
        .expect("add album");
    let status = last_status(&mut rx).expect("status after edit");
    assert!(status.unsaved_changes);
    assert!(!status.can_commit);

    coordinator.save().await.expect("save");
    assert!(work_dir
        .join("content")
        .join(id.to_string())
        .join("_index.md")
        .exists());
    let status = last_status(&mut rx).expect("status after save");
    assert!(!status.unsaved_changes);
    assert!(status.repo_dirty);
    assert!(status.can_commit);
    assert!(status.can_publish);

    coordinator.publish().await.expect("publish");
    let status = last_status(&mut rx).expect("status after publish");
    assert!(!status.repo_dirty);
    assert_eq!(status.ahead, 0);
    assert!(!status.can_publish);

    // The pushed commit carries the fixed checkpoint message.
    let log = Command::new("git")
        .args(["log", "-1", "--format=%s"])
        .current_dir(&work_dir)
        .output()
        .expect("git log");
    assert_eq!(
        String::from_utf8_lossy(&log.stdout).trim(),
        galleria_sync::COMMIT_MESSAGE
    );
}

#[tokio::test]
async fn commit_without_push_leaves_publish_available() {
    let root = TempDir::new().expect("root");
    let (remote, work_dir) = fixture(root.path());
    let (events, mut rx) = EventBus::channel();
    let mut coordinator = Coordinator::new(&work_dir, config(&remote), creds(), events);

    coordinator.update(false).await.expect("update");
    coordinator
        .edit(|store| store.add_album("Autumn", "travel"))
        .expect("add album");
    coordinator.save().await.expect("save");
    coordinator.commit().await.expect("commit");

    let status = last_status(&mut rx).expect("status after commit");
    assert!(!status.repo_dirty);
    assert_eq!(status.ahead, 1);
    assert!(!status.can_commit);
    assert!(status.can_publish, "local commits still need a push");
}

#[tokio::test]
async fn discard_restores_the_last_commit_and_reloads() {
    let root = TempDir::new().expect("root");
    let (remote, work_dir) = fixture(root.path());
    let (events, mut rx) = EventBus::channel();
    let mut coordinator = Coordinator::new(&work_dir, config(&remote), creds(), events);

    coordinator.update(false).await.expect("update");
    coordinator
        .edit(|store| store.add_album("Mistake", "travel"))
        .expect("add album");
    coordinator.save().await.expect("save");
    assert_eq!(coordinator.store().albums().len(), 2);

    coordinator.discard().await.expect("discard");
    assert_eq!(coordinator.store().albums().len(), 1);
    assert!(!work_dir.join("content").join("mistake").exists());

    let status = last_status(&mut rx).expect("status after discard");
    assert!(!status.repo_dirty);
    assert!(!status.can_discard);
}
