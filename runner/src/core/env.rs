//! Environment block handed to the Blender process.
//!
//! The in-host driver reads its inputs only from environment variables. The
//! block is recomputed from scratch for every run and applied to the child
//! command, never to the runner's own environment. Optional keys that are
//! unset are explicitly removed so nothing inherited from the parent leaks in.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Command;

use crate::core::options::EffectiveConfig;

pub const ADDON_TO_TEST: &str = "BLENDER_ADDON_TO_TEST";
pub const LOCAL_PYTHONPATH: &str = "LOCAL_PYTHONPATH";
pub const CACHE: &str = "BLENDER_CACHE";
pub const COVERAGE_REPORTING: &str = "BLENDER_ADDON_COVERAGE_REPORTING";
pub const TESTS_PATH: &str = "BLENDER_ADDON_TESTS_PATH";

/// Marker value the driver treats as "coverage on".
pub const COVERAGE_ENABLED: &str = "y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvValue {
    Set(OsString),
    Remove,
}

/// Ordered set of environment assignments and removals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvBlock {
    entries: Vec<(&'static str, EnvValue)>,
}

impl EnvBlock {
    /// Build the block for one run.
    ///
    /// `local_pythonpath` must already be in the form Blender expects.
    pub fn for_run(addon_path: &Path, local_pythonpath: &OsStr, config: &EffectiveConfig) -> Self {
        let mut block = EnvBlock::default();
        block.set(ADDON_TO_TEST, addon_path.as_os_str());
        block.set(LOCAL_PYTHONPATH, local_pythonpath);
        block.set_or_remove(CACHE, config.cache_directory.as_deref().map(Path::as_os_str));
        block.set_or_remove(
            COVERAGE_REPORTING,
            config.enable_coverage.then_some(OsStr::new(COVERAGE_ENABLED)),
        );
        block.set_or_remove(
            TESTS_PATH,
            config.tests_location.as_deref().map(Path::as_os_str),
        );
        block
    }

    fn set(&mut self, name: &'static str, value: &OsStr) {
        self.entries.push((name, EnvValue::Set(value.to_os_string())));
    }

    fn set_or_remove(&mut self, name: &'static str, value: Option<&OsStr>) {
        match value {
            Some(value) => self.set(name, value),
            None => self.entries.push((name, EnvValue::Remove)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&EnvValue> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &EnvValue)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    /// Apply the block to `cmd`.
    pub fn apply(&self, cmd: &mut Command) {
        for (name, value) in self.iter() {
            match value {
                EnvValue::Set(value) => {
                    cmd.env(name, value);
                }
                EnvValue::Remove => {
                    cmd.env_remove(name);
                }
            }
        }
    }
}
