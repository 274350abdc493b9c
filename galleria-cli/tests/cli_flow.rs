//! End-to-end runs of the `galleria` binary against an isolated home
//! directory and a local working copy.

use std::fs;
use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn galleria(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("galleria").expect("binary");
    cmd.env("HOME", home);
    cmd
}

fn git_in(dir: &Path, args: &[&str]) {
    let status = StdCommand::new("git")
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

/// Seed a committed working copy directly at `$HOME/.galleria/repo`.
fn seed_working_copy(home: &Path) {
    let repo = home.join(".galleria").join("repo");
    let album = repo.join("content").join("summer");
    fs::create_dir_all(&album).expect("mkdir");
    fs::write(
        album.join("_index.md"),
        "---\ntitle: Summer\ndate: 2024-01-10T00:00:00Z\ncategories:\n- travel\n---\nCoast.\n",
    )
    .expect("write index");
    git_in(&repo, &["init", "-q"]);
    git_in(&repo, &["add", "-A"]);
    git_in(&repo, &["commit", "-q", "-m", "seed"]);
}

fn init(home: &Path) {
    galleria(home)
        .args([
            "init",
            "--remote",
            "https://example.invalid/site.git",
            "--author-name",
            "Admin",
            "--author-email",
            "admin@example.com",
            "--username",
            "admin",
            "--token",
            "t0ken",
        ])
        .assert()
        .success();
}

#[test]
fn init_writes_config_and_token() {
    let home = TempDir::new().expect("home");
    init(home.path());

    let root = home.path().join(".galleria");
    assert!(root.join("galleria.yaml").exists());
    assert!(root.join("token.txt").exists());
}

#[test]
fn album_add_list_set_remove_cycle() {
    let home = TempDir::new().expect("home");
    init(home.path());
    seed_working_copy(home.path());

    galleria(home.path())
        .args(["album", "add", "Winter Hike", "--category", "travel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("winter-hike"));

    galleria(home.path())
        .args(["album", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("summer").and(predicate::str::contains("winter-hike")));

    // A title change renames the album directory on save.
    galleria(home.path())
        .args(["album", "set", "winter-hike", "--title", "Alpine Hike"])
        .assert()
        .success();
    let content = home.path().join(".galleria").join("repo").join("content");
    assert!(content.join("alpine-hike").join("_index.md").exists());
    assert!(!content.join("winter-hike").exists());

    galleria(home.path())
        .args(["album", "remove", "alpine-hike"])
        .assert()
        .success();
    assert!(!content.join("alpine-hike").exists());
}

#[test]
fn asset_add_and_list() {
    let home = TempDir::new().expect("home");
    init(home.path());
    seed_working_copy(home.path());

    let photo = home.path().join("beach.jpg");
    fs::write(&photo, b"jpegbytes").expect("write photo");

    galleria(home.path())
        .args(["asset", "add", "summer", photo.to_str().unwrap(), "--label", "Beach"])
        .assert()
        .success();

    galleria(home.path())
        .args(["asset", "list", "summer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("beach.jpg").and(predicate::str::contains("Beach")));

    let copied = home
        .path()
        .join(".galleria")
        .join("repo")
        .join("assets")
        .join("summer")
        .join("beach.jpg");
    assert_eq!(fs::read(&copied).expect("copied asset"), b"jpegbytes");
}

#[test]
fn edit_commands_refuse_to_run_without_a_working_copy() {
    let home = TempDir::new().expect("home");
    init(home.path());

    galleria(home.path())
        .args(["album", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("galleria update"));
}

#[test]
fn discard_requires_confirmation() {
    let home = TempDir::new().expect("home");
    init(home.path());
    seed_working_copy(home.path());

    galleria(home.path())
        .args(["discard"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}
