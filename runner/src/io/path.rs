//! Path normalization for the Blender host.
//!
//! Under Cygwin the runner sees POSIX-style paths while Blender is a native
//! Windows program, so paths are rewritten with `cygpath -wa`. Everywhere else
//! normalization is the identity.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::core::platform::Platform;

pub const CYGPATH: &str = "cygpath";

#[derive(Debug, Error)]
pub enum PathTranslationError {
    #[error("failed to run {utility} for {}", .path.display())]
    Spawn {
        utility: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{utility} exited with {status} for {}: {stderr}", .path.display())]
    Failed {
        utility: String,
        path: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
    #[error("{utility} returned no usable path for {}", .path.display())]
    InvalidOutput { utility: String, path: PathBuf },
}

/// Rewrites paths into the form the Blender executable understands.
#[derive(Debug, Clone)]
pub struct PathNormalizer {
    platform: Platform,
    utility: PathBuf,
}

impl PathNormalizer {
    pub fn new(platform: Platform) -> Self {
        Self::with_utility(platform, CYGPATH)
    }

    /// Use a specific translation utility instead of `cygpath` from `PATH`.
    pub fn with_utility(platform: Platform, utility: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            utility: utility.into(),
        }
    }

    #[instrument(skip(self), fields(platform = ?self.platform))]
    pub fn normalize(&self, path: &Path) -> Result<PathBuf, PathTranslationError> {
        if !self.platform.needs_path_translation() {
            return Ok(path.to_path_buf());
        }
        self.translate(path)
    }

    fn translate(&self, path: &Path) -> Result<PathBuf, PathTranslationError> {
        let utility = self.utility.display().to_string();
        let output = Command::new(&self.utility)
            .arg("-wa")
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| PathTranslationError::Spawn {
                utility: utility.clone(),
                path: path.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            return Err(PathTranslationError::Failed {
                utility,
                path: path.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let translated = String::from_utf8(output.stdout)
            .ok()
            .map(|stdout| stdout.trim_end().to_string())
            .filter(|stdout| !stdout.is_empty())
            .ok_or_else(|| PathTranslationError::InvalidOutput {
                utility,
                path: path.to_path_buf(),
            })?;

        debug!(from = %path.display(), to = %translated, "translated path");
        Ok(PathBuf::from(translated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_and_windows_are_identity() {
        for platform in [Platform::Posix, Platform::Windows] {
            let normalizer = PathNormalizer::with_utility(platform, "/nonexistent/cygpath");
            let path = Path::new("/home/user/addon");
            assert_eq!(normalizer.normalize(path).expect("normalize"), path);
        }
    }

    #[test]
    fn missing_utility_is_spawn_error() {
        let normalizer =
            PathNormalizer::with_utility(Platform::Cygwin, "/nonexistent/bin/cygpath-missing");
        let err = normalizer
            .normalize(Path::new("/home/user/addon"))
            .unwrap_err();
        assert!(matches!(err, PathTranslationError::Spawn { .. }), "{err:?}");
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use crate::test_support::write_script;

        #[test]
        fn cygwin_uses_utility_output() {
            let temp = tempfile::tempdir().expect("tempdir");
            let utility = write_script(
                temp.path(),
                "cygpath",
                "printf 'C:\\\\cygwin64\\\\home\\\\addon\\n'",
            );
            let normalizer = PathNormalizer::with_utility(Platform::Cygwin, utility);
            let translated = normalizer
                .normalize(Path::new("/home/addon"))
                .expect("normalize");
            assert_eq!(translated, PathBuf::from("C:\\cygwin64\\home\\addon"));
        }

        #[test]
        fn utility_failure_is_reported() {
            let temp = tempfile::tempdir().expect("tempdir");
            let utility = write_script(temp.path(), "cygpath", "echo 'bad path' >&2; exit 3");
            let normalizer = PathNormalizer::with_utility(Platform::Cygwin, utility);
            let err = normalizer.normalize(Path::new("/x")).unwrap_err();
            match err {
                PathTranslationError::Failed { stderr, .. } => assert_eq!(stderr, "bad path"),
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[test]
        fn empty_output_is_invalid() {
            let temp = tempfile::tempdir().expect("tempdir");
            let utility = write_script(temp.path(), "cygpath", "exit 0");
            let normalizer = PathNormalizer::with_utility(Platform::Cygwin, utility);
            let err = normalizer.normalize(Path::new("/x")).unwrap_err();
            assert!(matches!(err, PathTranslationError::InvalidOutput { .. }));
        }
    }
}
