//! Self-update pipeline tests against a fake release feed.

use std::path::Path;

use amgctl_cli::core::AmgctlError;
use amgctl_cli::test_utils::{FaultyFileOps, FileOp, RecordingInstaller, init_test_logging};
use amgctl_cli::upgrade::install::{BackupSwapInstaller, StdFileOps};
use amgctl_cli::upgrade::{
    AssetFormat, InstallStrategy, Platform, SelfUpdater, UpdateOutcome, UpdateStage, UpgradeConfig,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    FakeRelease, RELEASES_PATH, mount_asset, mount_checksums, mount_releases, tar_gz,
};

const ASSET: &str = "amgctl-linux-amd64";
const ARCHIVE: &str = "amgctl-linux-amd64.tar.gz";
const OLD_BINARY: &[u8] = b"#!/bin/sh\necho amgctl 1.0.0\n";
const NEW_BINARY: &[u8] = b"#!/bin/sh\necho amgctl 1.2.0\n";

fn config_for(server: &MockServer) -> UpgradeConfig {
    UpgradeConfig {
        api_url: server.uri(),
        feed_timeout_secs: 5,
        download_timeout_secs: 5,
        ..UpgradeConfig::default()
    }
}

fn updater(server: &MockServer, target: &Path) -> SelfUpdater {
    SelfUpdater::new()
        .with_config(config_for(server))
        .current_version("1.0.0")
        .platform(Platform::new("linux", "x86_64"))
        .install_target(target)
        .quiet(true)
}

fn installed_binary(dir: &TempDir) -> std::path::PathBuf {
    let target = dir.path().join("amgctl");
    std::fs::write(&target, OLD_BINARY).unwrap();
    target
}

#[tokio::test]
async fn test_update_replaces_binary_in_place() {
    init_test_logging(None);
    let server = MockServer::start().await;
    mount_releases(&server, &[FakeRelease::stable("v1.2.0", &[ASSET, "checksums.txt"])]).await;
    mount_asset(&server, ASSET, NEW_BINARY.to_vec()).await;
    mount_checksums(&server, &[(ASSET, NEW_BINARY)]).await;

    let temp_dir = TempDir::new().unwrap();
    let target = installed_binary(&temp_dir);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o751)).unwrap();
    }

    let mut updater =
        updater(&server, &target).installer(InstallStrategy::AtomicRename.installer());
    let outcome = updater.run().await.unwrap();

    assert_eq!(
        outcome,
        UpdateOutcome::Updated {
            from: "1.0.0".to_string(),
            to: "v1.2.0".to_string()
        }
    );
    assert_eq!(updater.stage(), UpdateStage::Done);
    assert_eq!(std::fs::read(&target).unwrap(), NEW_BINARY);
    assert!(!temp_dir.path().join("amgctl.new").exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o751);
    }
}

#[tokio::test]
async fn test_up_to_date_downloads_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RELEASES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "tag_name": "v1.0.0",
            "name": "v1.0.0",
            "prerelease": false,
            "assets": [{
                "name": ASSET,
                "browser_download_url": format!("{}/download/{ASSET}", server.uri()),
            }],
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/download/{ASSET}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(NEW_BINARY))
        .expect(0)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let target = installed_binary(&temp_dir);
    let installer = RecordingInstaller::new();

    let outcome = updater(&server, &target)
        .installer(Box::new(installer.clone()))
        .run()
        .await
        .unwrap();

    assert_eq!(
        outcome,
        UpdateOutcome::UpToDate {
            current: "1.0.0".to_string(),
            latest: "v1.0.0".to_string()
        }
    );
    assert_eq!(installer.call_count(), 0);
    assert_eq!(std::fs::read(&target).unwrap(), OLD_BINARY);
}

#[tokio::test]
async fn test_older_release_is_not_a_downgrade() {
    let server = MockServer::start().await;
    mount_releases(&server, &[FakeRelease::stable("v0.9.9", &[ASSET])]).await;

    let temp_dir = TempDir::new().unwrap();
    let target = installed_binary(&temp_dir);

    let outcome = updater(&server, &target).run().await.unwrap();
    assert!(matches!(outcome, UpdateOutcome::UpToDate { .. }));
    assert_eq!(std::fs::read(&target).unwrap(), OLD_BINARY);
}

#[tokio::test]
async fn test_force_reinstalls_same_version() {
    let server = MockServer::start().await;
    mount_releases(&server, &[FakeRelease::stable("v1.0.0", &[ASSET])]).await;
    mount_asset(&server, ASSET, NEW_BINARY.to_vec()).await;

    let temp_dir = TempDir::new().unwrap();
    let target = installed_binary(&temp_dir);
    let installer = RecordingInstaller::new();

    let outcome = updater(&server, &target)
        .force(true)
        .installer(Box::new(installer.clone()))
        .run()
        .await
        .unwrap();

    assert!(matches!(outcome, UpdateOutcome::Updated { .. }));
    assert_eq!(installer.call_count(), 1);
}

#[tokio::test]
async fn test_checksum_mismatch_leaves_binary_untouched() {
    let server = MockServer::start().await;
    mount_releases(&server, &[FakeRelease::stable("v1.2.0", &[ASSET, "checksums.txt"])]).await;
    mount_asset(&server, ASSET, b"corrupted download".to_vec()).await;
    mount_checksums(&server, &[(ASSET, NEW_BINARY)]).await;

    let temp_dir = TempDir::new().unwrap();
    let target = installed_binary(&temp_dir);
    let installer = RecordingInstaller::new();

    let mut updater = updater(&server, &target).installer(Box::new(installer.clone()));
    let err = updater.run().await.unwrap_err();

    match err {
        AmgctlError::ChecksumMismatch {
            asset,
            expected,
            actual,
        } => {
            assert_eq!(asset, ASSET);
            assert_ne!(expected, actual);
        }
        other => panic!("expected ChecksumMismatch, got {other:?}"),
    }
    assert_eq!(updater.stage(), UpdateStage::Aborted);
    assert_eq!(installer.call_count(), 0);
    assert_eq!(std::fs::read(&target).unwrap(), OLD_BINARY);
}

#[tokio::test]
async fn test_missing_checksums_file_installs_unverified() {
    let server = MockServer::start().await;
    mount_releases(&server, &[FakeRelease::stable("v1.2.0", &[ASSET])]).await;
    mount_asset(&server, ASSET, NEW_BINARY.to_vec()).await;

    let temp_dir = TempDir::new().unwrap();
    let target = installed_binary(&temp_dir);
    let installer = RecordingInstaller::new();

    let outcome = updater(&server, &target)
        .installer(Box::new(installer.clone()))
        .run()
        .await
        .unwrap();

    assert!(matches!(outcome, UpdateOutcome::Updated { .. }));
    assert_eq!(installer.calls(), vec![(target.clone(), NEW_BINARY.to_vec())]);
}

#[tokio::test]
async fn test_tar_gz_asset_is_extracted_before_install() {
    let server = MockServer::start().await;
    let archive = tar_gz(&[
        ("amgctl-linux-amd64/README.md", b"docs".as_slice()),
        ("amgctl-linux-amd64/amgctl", NEW_BINARY),
    ]);
    mount_releases(&server, &[FakeRelease::stable("v1.2.0", &[ARCHIVE, "checksums.txt"])]).await;
    mount_asset(&server, ARCHIVE, archive.clone()).await;
    mount_checksums(&server, &[(ARCHIVE, archive.as_slice())]).await;

    let temp_dir = TempDir::new().unwrap();
    let target = installed_binary(&temp_dir);
    let installer = RecordingInstaller::new();

    let mut updater = updater(&server, &target)
        .with_config(UpgradeConfig {
            asset_format: AssetFormat::TarGz,
            ..config_for(&server)
        })
        .installer(Box::new(installer.clone()));
    updater.run().await.unwrap();

    assert_eq!(installer.calls(), vec![(target.clone(), NEW_BINARY.to_vec())]);
}

#[tokio::test]
async fn test_archive_without_binary_aborts() {
    let server = MockServer::start().await;
    let archive = tar_gz(&[("amgctl-linux-amd64/README.md", b"docs".as_slice())]);
    mount_releases(&server, &[FakeRelease::stable("v1.2.0", &[ARCHIVE])]).await;
    mount_asset(&server, ARCHIVE, archive).await;

    let temp_dir = TempDir::new().unwrap();
    let target = installed_binary(&temp_dir);
    let installer = RecordingInstaller::new();

    let mut updater = updater(&server, &target)
        .with_config(UpgradeConfig {
            asset_format: AssetFormat::TarGz,
            ..config_for(&server)
        })
        .installer(Box::new(installer.clone()));
    let err = updater.run().await.unwrap_err();

    assert!(matches!(err, AmgctlError::BinaryNotInArchive { .. }));
    assert_eq!(installer.call_count(), 0);
    assert_eq!(std::fs::read(&target).unwrap(), OLD_BINARY);
}

#[tokio::test]
async fn test_no_asset_for_platform_even_when_forced() {
    let server = MockServer::start().await;
    mount_releases(
        &server,
        &[FakeRelease::stable("v1.2.0", &["amgctl-darwin-arm64", "amgctl-linux-arm64"])],
    )
    .await;

    let temp_dir = TempDir::new().unwrap();
    let target = installed_binary(&temp_dir);

    let err = updater(&server, &target).force(true).run().await.unwrap_err();
    match err {
        AmgctlError::NoAssetForPlatform {
            asset,
            platform,
        } => {
            assert_eq!(asset, ASSET);
            assert_eq!(platform, "linux/amd64");
        }
        other => panic!("expected NoAssetForPlatform, got {other:?}"),
    }
}

#[tokio::test]
async fn test_prerelease_only_considered_when_requested() {
    let server = MockServer::start().await;
    mount_releases(
        &server,
        &[
            FakeRelease::prerelease("v1.3.0-rc.1", &[ASSET]),
            FakeRelease::stable("v1.2.0", &[ASSET]),
        ],
    )
    .await;

    let temp_dir = TempDir::new().unwrap();
    let target = installed_binary(&temp_dir);

    let stable = updater(&server, &target).check().await.unwrap();
    assert_eq!(stable.latest_version, "v1.2.0");
    assert!(stable.update_available);

    let pre = updater(&server, &target).include_prerelease(true).check().await.unwrap();
    assert_eq!(pre.latest_version, "v1.3.0-rc.1");
}

#[tokio::test]
async fn test_only_prereleases_without_flag_is_no_release() {
    let server = MockServer::start().await;
    mount_releases(&server, &[FakeRelease::prerelease("v2.0.0-beta", &[ASSET])]).await;

    let temp_dir = TempDir::new().unwrap();
    let err = updater(&server, &installed_binary(&temp_dir)).run().await.unwrap_err();
    assert!(matches!(
        err,
        AmgctlError::NoReleaseFound {
            include_prerelease: false
        }
    ));
}

#[tokio::test]
async fn test_feed_server_error_is_feed_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RELEASES_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let mut updater = updater(&server, &installed_binary(&temp_dir));
    let err = updater.run().await.unwrap_err();

    assert!(matches!(err, AmgctlError::FeedUnavailable { .. }));
    assert_eq!(updater.stage(), UpdateStage::Aborted);
}

#[tokio::test]
async fn test_missing_download_is_download_failed() {
    let server = MockServer::start().await;
    mount_releases(&server, &[FakeRelease::stable("v1.2.0", &[ASSET])]).await;
    Mock::given(method("GET"))
        .and(path(format!("/download/{ASSET}")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let target = installed_binary(&temp_dir);
    let err = updater(&server, &target).run().await.unwrap_err();

    assert!(matches!(err, AmgctlError::DownloadFailed { .. }));
    assert_eq!(std::fs::read(&target).unwrap(), OLD_BINARY);
}

#[tokio::test]
async fn test_backup_swap_rolls_back_failed_install() {
    let server = MockServer::start().await;
    mount_releases(&server, &[FakeRelease::stable("v1.2.0", &[ASSET])]).await;
    mount_asset(&server, ASSET, NEW_BINARY.to_vec()).await;

    let temp_dir = TempDir::new().unwrap();
    let target = installed_binary(&temp_dir);

    let mut updater = updater(&server, &target)
        .installer(Box::new(BackupSwapInstaller::new(FaultyFileOps::failing(FileOp::Copy))));
    let err = updater.run().await.unwrap_err();

    assert!(matches!(err, AmgctlError::InstallFailed { .. }));
    assert!(err.is_install_failure());
    assert_eq!(std::fs::read(&target).unwrap(), OLD_BINARY);
    assert!(!temp_dir.path().join("amgctl.backup").exists());
}

#[tokio::test]
async fn test_backup_swap_installs_with_real_filesystem() {
    let server = MockServer::start().await;
    mount_releases(&server, &[FakeRelease::stable("v1.2.0", &[ASSET])]).await;
    mount_asset(&server, ASSET, NEW_BINARY.to_vec()).await;

    let temp_dir = TempDir::new().unwrap();
    let target = installed_binary(&temp_dir);

    updater(&server, &target)
        .installer(Box::new(BackupSwapInstaller::new(StdFileOps)))
        .run()
        .await
        .unwrap();

    assert_eq!(std::fs::read(&target).unwrap(), NEW_BINARY);
    assert!(!temp_dir.path().join("amgctl.backup").exists());
}
