//! Run options and their merge with built-in defaults.
//!
//! Callers hand over a sparse [`RunOptions`]; [`EffectiveConfig::merge`] lays it
//! over an immutable [`Defaults`] template and always returns a fresh value.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name of the test driver shipped next to the runner binary.
pub const BUILTIN_DRIVER_SCRIPT: &str = "blender_load_pytest.py";

/// Caller-supplied options. Every field is optional; unset fields keep their default.
///
/// Keys that are not recognized land in `extra` and are carried through the
/// merge untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Python script Blender runs to load and execute the tests.
    pub test_driver_script: Option<PathBuf>,
    /// Ask the driver to collect coverage alongside the tests.
    pub coverage: Option<bool>,
    /// Directory or script of tests handed to the driver.
    pub tests: Option<PathBuf>,
    /// Directory where Blender releases are cached.
    pub cache: Option<PathBuf>,
    /// Glob for the executable file name inside the install directory.
    pub executable_pattern: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl RunOptions {
    /// Lay `overrides` over `self`: any field set in `overrides` wins.
    pub fn overridden_by(self, overrides: RunOptions) -> RunOptions {
        let mut extra = self.extra;
        extra.extend(overrides.extra);
        RunOptions {
            test_driver_script: overrides.test_driver_script.or(self.test_driver_script),
            coverage: overrides.coverage.or(self.coverage),
            tests: overrides.tests.or(self.tests),
            cache: overrides.cache.or(self.cache),
            executable_pattern: overrides.executable_pattern.or(self.executable_pattern),
            extra,
        }
    }
}

/// Immutable default template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    /// Directory holding the built-in driver and its helper modules.
    pub support_dir: PathBuf,
    pub test_driver_script: PathBuf,
    pub enable_coverage: bool,
}

impl Defaults {
    /// Defaults rooted at the directory of the running executable.
    pub fn builtin() -> Self {
        let support_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::with_support_dir(support_dir)
    }

    pub fn with_support_dir(support_dir: impl Into<PathBuf>) -> Self {
        let support_dir = support_dir.into();
        Self {
            test_driver_script: support_dir.join(BUILTIN_DRIVER_SCRIPT),
            support_dir,
            enable_coverage: false,
        }
    }
}

/// Configuration a run actually uses.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    pub test_driver_script: PathBuf,
    pub enable_coverage: bool,
    pub tests_location: Option<PathBuf>,
    pub cache_directory: Option<PathBuf>,
    pub executable_pattern: Option<String>,
    pub support_dir: PathBuf,
    pub extra: BTreeMap<String, toml::Value>,
}

impl EffectiveConfig {
    /// Shallow override of `defaults` by `options`.
    ///
    /// An empty path counts as not given.
    pub fn merge(defaults: &Defaults, options: &RunOptions) -> Self {
        Self {
            test_driver_script: non_empty(options.test_driver_script.as_deref())
                .unwrap_or_else(|| defaults.test_driver_script.clone()),
            enable_coverage: options.coverage.unwrap_or(defaults.enable_coverage),
            tests_location: non_empty(options.tests.as_deref()),
            cache_directory: non_empty(options.cache.as_deref()),
            executable_pattern: options.executable_pattern.clone(),
            support_dir: defaults.support_dir.clone(),
            extra: options.extra.clone(),
        }
    }
}

/// `path` as an owned value, or `None` when it is absent or empty.
pub fn non_empty(path: Option<&Path>) -> Option<PathBuf> {
    path.filter(|path| !path.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
