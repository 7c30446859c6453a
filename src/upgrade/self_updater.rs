use std::fmt;
use std::path::PathBuf;

use colored::Colorize;
use tracing::{debug, info, warn};

use crate::core::AmgctlError;
use crate::upgrade::archive::{extract_if_needed, is_archive};
use crate::upgrade::config::UpgradeConfig;
use crate::upgrade::download::Downloader;
use crate::upgrade::install::{InstallStrategy, Installer};
use crate::upgrade::platform::{Platform, expected_asset_name, select_asset};
use crate::upgrade::release::{ReleaseDescriptor, ReleaseResolver};
use crate::upgrade::transaction::InstallTransaction;
use crate::upgrade::verification::ChecksumVerifier;
use crate::upgrade::version_check::is_newer;

/// Where an update run currently is.
///
/// Runs move forward only:
///
/// ```text
/// Idle → Resolving → Selecting → Downloading → Verifying → [Extracting] → Installing → Done
/// ```
///
/// Any failure moves the run to `Aborted`. There is no resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStage {
    /// Nothing has happened yet
    Idle,
    /// Fetching the release feed
    Resolving,
    /// Picking this platform's asset
    Selecting,
    /// Transferring the artifact
    Downloading,
    /// Checking the artifact against `checksums.txt`
    Verifying,
    /// Pulling the executable out of a `.tar.gz`
    Extracting,
    /// Replacing the executable on disk
    Installing,
    /// The run finished, updated or already current
    Done,
    /// The run failed
    Aborted,
}

impl fmt::Display for UpdateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Selecting => "selecting",
            Self::Downloading => "downloading",
            Self::Verifying => "verifying",
            Self::Extracting => "extracting",
            Self::Installing => "installing",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The feed had nothing newer and the run was not forced.
    UpToDate {
        /// Version of the running binary
        current: String,
        /// Tag of the selected release
        latest: String,
    },
    /// A new binary was installed.
    Updated {
        /// Version that was replaced
        from: String,
        /// Tag that was installed
        to: String,
    },
}

/// Result of [`SelfUpdater::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCheck {
    /// Version of the running binary
    pub current_version: String,
    /// Tag of the selected release
    pub latest_version: String,
    /// Whether the selected release is newer
    pub update_available: bool,
}

/// Core self-update manager for amgctl.
///
/// Runs the update pipeline end to end: resolve a release, decide whether it
/// is newer, select this platform's asset, download it into a private
/// temporary directory, verify it against `checksums.txt`, extract it when it
/// is an archive, and install it over the running executable. Each stage
/// fails fast, and nothing touches the executable before the install stage.
///
/// Everything that depends on the environment (current version, platform,
/// install target, installer) is a plain field with a builder setter, so
/// tests can drive the whole pipeline against a mock release feed.
///
/// # Examples
///
/// ## Check for Updates
/// ```rust,no_run
/// use amgctl_cli::upgrade::SelfUpdater;
///
/// # async fn example() -> Result<(), amgctl_cli::core::AmgctlError> {
/// let updater = SelfUpdater::new();
/// let check = updater.check().await?;
/// if check.update_available {
///     println!("Update available: {} -> {}", check.current_version, check.latest_version);
/// }
/// # Ok(())
/// # }
/// ```
///
/// ## Force Update
/// ```rust,no_run
/// use amgctl_cli::upgrade::SelfUpdater;
///
/// # async fn example() -> Result<(), amgctl_cli::core::AmgctlError> {
/// let mut updater = SelfUpdater::new().force(true);
/// updater.run().await?;
/// # Ok(())
/// # }
/// ```
pub struct SelfUpdater {
    config: UpgradeConfig,
    current_version: String,
    platform: Platform,
    install_target: Option<PathBuf>,
    installer: Option<Box<dyn Installer>>,
    force: bool,
    include_prerelease: bool,
    quiet: bool,
    show_progress: bool,
    stage: UpdateStage,
}

impl Default for SelfUpdater {
    fn default() -> Self {
        Self {
            config: UpgradeConfig::default(),
            current_version: env!("CARGO_PKG_VERSION").to_string(),
            platform: Platform::current(),
            install_target: None,
            installer: None,
            force: false,
            include_prerelease: false,
            quiet: false,
            show_progress: false,
            stage: UpdateStage::Idle,
        }
    }
}

impl SelfUpdater {
    /// Create a new `SelfUpdater` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` for the release feed location, naming, and timeouts.
    pub fn with_config(mut self, config: UpgradeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the version the running binary reports.
    pub fn current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = version.into();
        self
    }

    /// Override the platform used to pick an asset.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Install to `path` instead of the running executable.
    pub fn install_target(mut self, path: impl Into<PathBuf>) -> Self {
        self.install_target = Some(path.into());
        self
    }

    /// Use `installer` instead of the platform's default strategy.
    pub fn installer(mut self, installer: Box<dyn Installer>) -> Self {
        self.installer = Some(installer);
        self
    }

    /// Install the selected release even when it is not newer.
    ///
    /// Integrity and platform checks still apply.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Consider releases flagged as prereleases.
    pub fn include_prerelease(mut self, include: bool) -> Self {
        self.include_prerelease = include;
        self
    }

    /// Suppress the per-stage status lines.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Show a download bar.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Version of the running binary.
    pub fn version(&self) -> &str {
        &self.current_version
    }

    /// The stage the last run reached.
    pub fn stage(&self) -> UpdateStage {
        self.stage
    }

    /// Whether the version comparison is skipped.
    pub const fn is_forced(&self) -> bool {
        self.force
    }

    /// Whether prerelease releases are candidates.
    pub const fn includes_prerelease(&self) -> bool {
        self.include_prerelease
    }

    /// Whether status lines are suppressed.
    pub const fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Whether the download bar may be drawn.
    pub const fn shows_progress(&self) -> bool {
        self.show_progress
    }

    /// Resolve the candidate release and compare it with the running version.
    ///
    /// Only the release listing is fetched; nothing is downloaded.
    pub async fn check(&self) -> Result<UpdateCheck, AmgctlError> {
        let release = self.resolve_release().await?;
        let latest_version = release.version().to_string();
        Ok(UpdateCheck {
            update_available: is_newer(&latest_version, &self.current_version),
            current_version: self.current_version.clone(),
            latest_version,
        })
    }

    /// Run the update pipeline.
    ///
    /// Returns [`UpdateOutcome::UpToDate`] without downloading anything when
    /// the selected release is not newer and the run is not forced.
    pub async fn run(&mut self) -> Result<UpdateOutcome, AmgctlError> {
        self.stage = UpdateStage::Idle;
        match self.run_stages().await {
            Ok(outcome) => {
                self.enter(UpdateStage::Done);
                Ok(outcome)
            }
            Err(error) => {
                warn!("Update aborted during {}: {error}", self.stage);
                self.enter(UpdateStage::Aborted);
                Err(error)
            }
        }
    }

    async fn run_stages(&mut self) -> Result<UpdateOutcome, AmgctlError> {
        self.enter(UpdateStage::Resolving);
        self.status("Checking for updates...");
        let release = self.resolve_release().await?;
        let latest = release.version().to_string();
        self.status(&format!("Latest version: {latest}"));
        self.status(&format!("Current version: {}", self.current_version));

        if !self.force && !is_newer(&latest, &self.current_version) {
            info!("Already on latest version {}", self.current_version);
            return Ok(UpdateOutcome::UpToDate {
                current: self.current_version.clone(),
                latest,
            });
        }
        if self.force {
            debug!("Force enabled, skipping version comparison");
        }

        self.enter(UpdateStage::Selecting);
        let asset_name =
            expected_asset_name(&self.config.binary_name, &self.platform, self.config.asset_format);
        let asset = select_asset(&release, &asset_name, &self.platform)?;

        let transaction = InstallTransaction::new(&self.config.binary_name)?;
        let artifact = transaction.artifact_path(&asset.name);

        self.enter(UpdateStage::Downloading);
        self.status(&format!("Downloading {}...", asset.name));
        Downloader::new(self.config.download_timeout())?
            .with_progress(self.show_progress && !self.quiet)
            .download(&asset.browser_download_url, &artifact)
            .await?;

        self.enter(UpdateStage::Verifying);
        match release.checksum_asset() {
            Some(manifest) => {
                self.status("Verifying checksum...");
                ChecksumVerifier::new(self.config.feed_timeout())?
                    .verify(&artifact, &manifest.browser_download_url, &asset.name)
                    .await?;
            }
            None => {
                warn!("Release {latest} has no checksums.txt; installing unverified");
                self.warning("Release publishes no checksums.txt; skipping integrity verification");
            }
        }

        if is_archive(&asset.name) {
            self.enter(UpdateStage::Extracting);
            self.status(&format!("Extracting {}...", self.config.binary_name));
        }
        let binary =
            extract_if_needed(&artifact, &transaction.extraction_dir(), &self.config.binary_name)?;

        self.enter(UpdateStage::Installing);
        let target = self.resolve_install_target()?;
        self.status(&format!("Installing to {}...", target.display()));
        match &self.installer {
            Some(installer) => installer.install(&binary, &target)?,
            None => InstallStrategy::for_current_platform().installer().install(&binary, &target)?,
        }

        info!("Updated {} -> {latest}", self.current_version);
        Ok(UpdateOutcome::Updated {
            from: self.current_version.clone(),
            to: latest,
        })
    }

    async fn resolve_release(&self) -> Result<ReleaseDescriptor, AmgctlError> {
        ReleaseResolver::new(&self.config)?.resolve(self.include_prerelease).await
    }

    fn resolve_install_target(&self) -> Result<PathBuf, AmgctlError> {
        match &self.install_target {
            Some(path) => Ok(path.clone()),
            None => std::env::current_exe().map_err(|e| AmgctlError::Other {
                message: format!("Cannot determine the path of the running executable: {e}"),
            }),
        }
    }

    fn enter(&mut self, stage: UpdateStage) {
        debug!("Update stage: {} -> {stage}", self.stage);
        self.stage = stage;
    }

    fn status(&self, message: &str) {
        if !self.quiet {
            println!("{}", message.cyan());
        }
    }

    fn warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}: {message}", "warning".yellow().bold());
        }
    }
}
