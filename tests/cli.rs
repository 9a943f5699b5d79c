//! Integration tests for the thumbnailer binary.

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use predicates::prelude::*;
use tempfile::TempDir;

fn thumbnailer() -> Command {
    cargo_bin_cmd!("thumbnailer")
}

#[test]
fn help_displays() {
    thumbnailer()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("On-demand JPEG thumbnail server"));
}

#[test]
fn version_displays() {
    thumbnailer()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("thumbnailer"));
}

#[test]
fn gen_config_prints_documented_defaults() {
    thumbnailer()
        .arg("gen-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[storage]"))
        .stdout(predicate::str::contains("cache_dir = \"assets/thumb\""))
        .stdout(predicate::str::contains("port = 3000"));
}

#[test]
fn serve_rejects_missing_config_file() {
    let tmp = TempDir::new().unwrap();
    thumbnailer()
        .current_dir(tmp.path())
        .args(["--config", "missing.toml", "serve"])
        .assert()
        .failure();
    assert!(!tmp.path().join("assets").exists());
}

#[test]
fn serve_rejects_invalid_config_values() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("thumbnailer.toml"), "[output]\nquality = 0\n").unwrap();

    thumbnailer()
        .current_dir(tmp.path())
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("output.quality must be 1-100"));
}

#[test]
fn serve_rejects_unknown_config_keys() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("thumbnailer.toml"), "[server]\nbind = \"x\"\n").unwrap();

    thumbnailer()
        .current_dir(tmp.path())
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("bind"));
}
