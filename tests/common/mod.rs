//! Common test utilities for amgctl integration tests
//!
//! Builds a fake GitHub releases feed on a `wiremock` server and writes
//! config files that point amgctl at it.

// Allow dead code because these utilities are used across different test files
// and not all utilities are used in every test file
#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const RELEASES_PATH: &str = "/repos/weka/amg-utils/releases";

/// A release entry served by the fake feed.
pub struct FakeRelease {
    pub tag: String,
    pub prerelease: bool,
    pub assets: Vec<String>,
}

impl FakeRelease {
    pub fn stable(tag: &str, assets: &[&str]) -> Self {
        Self {
            tag: tag.to_string(),
            prerelease: false,
            assets: assets.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    pub fn prerelease(tag: &str, assets: &[&str]) -> Self {
        Self {
            prerelease: true,
            ..Self::stable(tag, assets)
        }
    }

    fn to_json(&self, server: &MockServer) -> Value {
        let assets: Vec<_> = self
            .assets
            .iter()
            .map(|name| {
                json!({
                    "name": name,
                    "browser_download_url": download_url(server, name),
                })
            })
            .collect();
        json!({
            "tag_name": self.tag,
            "name": self.tag,
            "prerelease": self.prerelease,
            "assets": assets,
        })
    }
}

pub fn download_url(server: &MockServer, name: &str) -> String {
    format!("{}/download/{name}", server.uri())
}

/// Serve `releases` from the releases endpoint, newest first.
pub async fn mount_releases(server: &MockServer, releases: &[FakeRelease]) {
    let body: Vec<_> = releases.iter().map(|r| r.to_json(server)).collect();
    Mock::given(method("GET"))
        .and(path(RELEASES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serve `body` as the download for asset `name`.
pub async fn mount_asset(server: &MockServer, name: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(format!("/download/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

/// Serve a `checksums.txt` listing each `(asset, contents)` pair.
pub async fn mount_checksums(server: &MockServer, entries: &[(&str, &[u8])]) {
    let manifest: String =
        entries.iter().map(|(name, bytes)| format!("{}  {name}\n", sha256_hex(bytes))).collect();
    mount_asset(server, "checksums.txt", manifest.into_bytes()).await;
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Build a gzip-compressed tarball holding `files` as `(path, contents)`.
pub fn tar_gz(files: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, name, *contents).unwrap();
    }
    let mut encoder = builder.into_inner().unwrap();
    encoder.flush().unwrap();
    encoder.finish().unwrap()
}

/// Write a config file whose release feed points at `server`.
pub fn write_config(dir: &Path, server: &MockServer) -> PathBuf {
    let config_path = dir.join("config.toml");
    let contents = format!("[upgrade]\napi_url = \"{}\"\nfeed_timeout_secs = 5\n", server.uri());
    std::fs::write(&config_path, contents).unwrap();
    config_path
}
