//! Resolving a Blender version to a local install directory.
//!
//! Downloading and extracting releases is done elsewhere; the runner only
//! needs a directory that holds the executable for the requested version.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::core::env;
use crate::core::options::non_empty;

/// Directory name used under the platform cache dir when no cache is configured.
pub const DEFAULT_CACHE_DIR_NAME: &str = "blender-addon-tester";

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("blender {version} is not provisioned (expected {})", .expected.display())]
    NotProvisioned { version: String, expected: PathBuf },
    #[error("could not determine a blender cache directory; pass one with --cache")]
    NoCacheRoot,
}

/// Source of Blender installations.
pub trait Provisioner {
    /// Return the install directory for `version`.
    fn provision(&self, version: &str) -> anyhow::Result<PathBuf>;
}

/// Provisioner backed by already-extracted releases under `<root>/<version>`.
#[derive(Debug, Clone)]
pub struct CacheProvisioner {
    root: PathBuf,
}

impl CacheProvisioner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Pick the cache root: explicit option, then `BLENDER_CACHE`, then the platform cache dir.
    pub fn from_config(cache: Option<&Path>) -> Result<Self, ProvisionError> {
        let root = resolve_cache_root(cache, std::env::var_os(env::CACHE), dirs::cache_dir())?;
        debug!(root = %root.display(), "using blender cache root");
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Provisioner for CacheProvisioner {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn provision(&self, version: &str) -> anyhow::Result<PathBuf> {
        let dir = self.root.join(version);
        if !dir.is_dir() {
            return Err(ProvisionError::NotProvisioned {
                version: version.to_string(),
                expected: dir,
            }
            .into());
        }
        info!(dir = %dir.display(), "blender install found");
        Ok(dir)
    }
}

fn resolve_cache_root(
    explicit: Option<&Path>,
    from_env: Option<OsString>,
    platform_cache: Option<PathBuf>,
) -> Result<PathBuf, ProvisionError> {
    if let Some(path) = non_empty(explicit) {
        return Ok(path);
    }
    if let Some(value) = from_env.filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(value));
    }
    platform_cache
        .map(|dir| dir.join(DEFAULT_CACHE_DIR_NAME))
        .ok_or(ProvisionError::NoCacheRoot)
}
