//! Orchestration for one addon test run.
//!
//! A run resolves the requested Blender version to an install directory,
//! merges the caller's options over the defaults, locates the executable,
//! prepares the invocation and launches it. Every failure before the launch
//! is fatal and returned unchanged; there are no retries.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::core::options::{Defaults, EffectiveConfig, RunOptions};
use crate::core::platform::Platform;
use crate::core::types::RunOutcome;
use crate::io::launcher::{BlenderLauncher, Launcher, build_invocation};
use crate::io::locate::{locate_blender, locate_unique};
use crate::io::path::PathNormalizer;
use crate::io::provision::{CacheProvisioner, Provisioner};

/// What to test and under which Blender version.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    /// Addon directory or zip archive.
    pub addon_path: PathBuf,
    /// Blender version identifier, passed to the provisioner unchanged.
    pub version: String,
    pub options: RunOptions,
}

/// Host facts fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct HostContext {
    pub platform: Platform,
    pub defaults: Defaults,
    pub normalizer: PathNormalizer,
}

impl HostContext {
    pub fn detect() -> Self {
        Self::new(Platform::detect(), Defaults::builtin())
    }

    pub fn new(platform: Platform, defaults: Defaults) -> Self {
        Self {
            platform,
            defaults,
            normalizer: PathNormalizer::new(platform),
        }
    }
}

/// Run the addon's test suite with the given collaborators.
#[instrument(skip_all, fields(version = %request.version, addon = %request.addon_path.display()))]
pub fn run_addon_tests<P: Provisioner, L: Launcher>(
    request: &RunRequest,
    host: &HostContext,
    provisioner: &P,
    launcher: &L,
) -> Result<RunOutcome> {
    info!(options = ?request.options, "testing addon");

    let install_dir = provisioner
        .provision(&request.version)
        .with_context(|| format!("provision blender {}", request.version))?;
    debug!(install_dir = %install_dir.display(), "blender install directory");

    let config = EffectiveConfig::merge(&host.defaults, &request.options);

    let executable = match config.executable_pattern.as_deref() {
        Some(pattern) => locate_unique(&install_dir, pattern),
        None => locate_blender(&install_dir, host.platform),
    }
    .with_context(|| format!("locate blender in {}", install_dir.display()))?;
    debug!(executable = %executable.display(), "blender executable");

    let invocation = build_invocation(&executable, &request.addon_path, &config, &host.normalizer)?;
    let outcome = launcher.launch(&invocation)?;
    info!(?outcome, "run finished");
    Ok(outcome)
}

/// Run an addon's tests against a cached Blender install and return the exit code.
///
/// Uses the detected host platform, the cache-backed provisioner and the real
/// Blender launcher.
pub fn run(addon_path: &Path, version: &str, options: RunOptions) -> Result<i32> {
    let provisioner = CacheProvisioner::from_config(options.cache.as_deref())?;
    let request = RunRequest {
        addon_path: addon_path.to_path_buf(),
        version: version.to_string(),
        options,
    };
    let outcome = run_addon_tests(
        &request,
        &HostContext::detect(),
        &provisioner,
        &BlenderLauncher,
    )?;
    Ok(outcome.exit_code())
}
