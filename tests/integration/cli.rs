//! Tests for the `amgctl` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{FakeRelease, RELEASES_PATH, mount_releases, write_config};

fn amgctl() -> Command {
    let mut cmd = Command::cargo_bin("amgctl").unwrap();
    cmd.env("AMGCTL_NO_PROGRESS", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_update_help() {
    amgctl()
        .args(["update", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"))
        .stdout(predicate::str::contains("--prerelease"))
        .stdout(predicate::str::contains("--check"));
}

#[test]
fn test_check_conflicts_with_force() {
    amgctl().args(["update", "--check", "--force"]).assert().failure();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_check_reports_available_version() {
    let server = MockServer::start().await;
    mount_releases(&server, &[FakeRelease::stable("v99.0.0", &[])]).await;
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), &server);

    amgctl()
        .arg("--config")
        .arg(&config)
        .args(["update", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Current version: {}",
            env!("CARGO_PKG_VERSION")
        )))
        .stdout(predicate::str::contains("Latest version:  v99.0.0 (update available)"))
        .stdout(predicate::str::contains("Run `amgctl update`"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_when_already_current() {
    let server = MockServer::start().await;
    let tag = format!("v{}", env!("CARGO_PKG_VERSION"));
    mount_releases(&server, &[FakeRelease::stable(&tag, &[])]).await;
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), &server);

    amgctl()
        .arg("--config")
        .arg(&config)
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("already running the latest version"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_check_up_to_date() {
    let server = MockServer::start().await;
    let tag = format!("v{}", env!("CARGO_PKG_VERSION"));
    mount_releases(&server, &[FakeRelease::stable(&tag, &[])]).await;
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), &server);

    amgctl()
        .arg("--config")
        .arg(&config)
        .args(["update", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(up to date)"))
        .stdout(predicate::str::contains("Run `amgctl update`").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_feed_failure_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RELEASES_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), &server);

    amgctl()
        .arg("--config")
        .arg(&config)
        .args(["update", "--check"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    std::fs::write(&config, "[upgrade\napi_url = ").unwrap();

    amgctl()
        .arg("--config")
        .arg(&config)
        .arg("update")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}
