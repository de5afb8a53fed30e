//! Run options stored in a TOML file.
//!
//! Keys mirror [`RunOptions`]:
//!
//! ```toml
//! test_driver_script = "ci/load_tests.py"
//! coverage = true
//! tests = "tests/"
//! cache = "/var/cache/blender"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::options::RunOptions;

/// Load options from a TOML file.
///
/// Unknown keys are kept in [`RunOptions::extra`].
pub fn load_options(path: &Path) -> Result<RunOptions> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let options: RunOptions =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    debug!(path = %path.display(), ?options, "loaded run options");
    Ok(options)
}

/// Load options from `path` if given, otherwise return empty options.
pub fn load_optional(path: Option<&Path>) -> Result<RunOptions> {
    match path {
        Some(path) => load_options(path),
        None => Ok(RunOptions::default()),
    }
}
