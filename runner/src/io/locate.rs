//! Locating the Blender executable inside an install directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::core::platform::Platform;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("no blender executable matches {pattern}")]
    NotFound { pattern: String },
    #[error("{} blender executables match {pattern}: {}", .matches.len(), display_paths(.matches))]
    Ambiguous {
        pattern: String,
        matches: Vec<PathBuf>,
    },
    #[error("invalid executable pattern {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("could not read {} while matching {pattern}", display_paths(.paths))]
    Unreadable {
        pattern: String,
        paths: Vec<PathBuf>,
    },
    #[error("failed to resolve {}", .path.display())]
    Canonicalize {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Find the platform's Blender executable directly inside `install_dir`.
pub fn locate_blender(install_dir: &Path, platform: Platform) -> Result<PathBuf, LocateError> {
    locate_unique(install_dir, &platform.blender_executable_name())
}

/// Find exactly one regular file in `dir` whose name matches `file_pattern`.
///
/// The search is not recursive. Zero or several matches are errors; there is
/// no fallback to picking one.
#[instrument(skip(dir), fields(dir = %dir.display()))]
pub fn locate_unique(dir: &Path, file_pattern: &str) -> Result<PathBuf, LocateError> {
    let pattern = format!(
        "{}/{}",
        Pattern::escape(&dir.to_string_lossy()),
        file_pattern
    );
    let entries = glob::glob(&pattern).map_err(|source| LocateError::InvalidPattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut candidates = Vec::new();
    let mut unreadable = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => candidates.push(path),
            Err(err) => {
                warn!(
                    path = %err.path().display(),
                    error = %err.error(),
                    "unreadable executable candidate"
                );
                unreadable.push(err.path().to_path_buf());
            }
        }
    }
    let candidates = candidates.into_iter().filter(|path| path.is_file()).collect();
    let found = select_unique(pattern, candidates, unreadable)?;
    fs::canonicalize(&found).map_err(|source| LocateError::Canonicalize {
        path: found,
        source,
    })
}

/// Apply the exactly-one rule to the files a pattern matched.
///
/// Two or more matches are ambiguous no matter what could not be read.
/// Otherwise any unreadable entry might be the executable, so the result
/// cannot be trusted.
fn select_unique(
    pattern: String,
    mut matches: Vec<PathBuf>,
    unreadable: Vec<PathBuf>,
) -> Result<PathBuf, LocateError> {
    matches.sort();
    debug!(
        count = matches.len(),
        unreadable = unreadable.len(),
        %pattern,
        "executable candidates"
    );

    if matches.len() > 1 {
        return Err(LocateError::Ambiguous { pattern, matches });
    }
    if !unreadable.is_empty() {
        return Err(LocateError::Unreadable {
            pattern,
            paths: unreadable,
        });
    }
    matches.pop().ok_or(LocateError::NotFound { pattern })
}
