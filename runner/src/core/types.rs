//! Shared types passed between the orchestrator and the launcher.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::core::env::EnvBlock;
use crate::exit_codes;

/// Binary result of a Blender run.
///
/// The host's own exit code is deliberately collapsed: a crash, a failing test
/// and a malformed invocation all read as `Failure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    Failure,
}

impl RunOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            RunOutcome::Success => exit_codes::OK,
            RunOutcome::Failure => exit_codes::FAILURE,
        }
    }
}

/// Fully-resolved description of a Blender launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Blender executable, normalized for the host.
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub env: EnvBlock,
}
