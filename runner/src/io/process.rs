//! Helpers for running child processes to completion.

use std::io;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

/// How a child process ended.
#[derive(Debug)]
pub enum CommandStatus {
    /// The process ran and exited (or was killed by a signal).
    Exited(ExitStatus),
    /// The process could not be started at all.
    SpawnFailed(io::Error),
}

impl CommandStatus {
    /// Exit code, if the process ran and exited normally.
    pub fn code(&self) -> Option<i32> {
        match self {
            CommandStatus::Exited(status) => status.code(),
            CommandStatus::SpawnFailed(_) => None,
        }
    }
}

/// Run a command with inherited stdout/stderr and block until it exits.
///
/// There is no timeout: a child that never exits blocks the caller. Failing to
/// spawn is reported as [`CommandStatus::SpawnFailed`] rather than an error so
/// callers can treat it like any other unsuccessful run; only a failure while
/// waiting on a started child is an `Err`.
#[instrument(skip_all, fields(program = %cmd.get_program().to_string_lossy()))]
pub fn run_command_inherited(mut cmd: Command) -> Result<CommandStatus> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            warn!(err = %e, "failed to spawn command");
            return Ok(CommandStatus::SpawnFailed(e));
        }
    };

    let status = child.wait().context("wait for command")?;
    debug!(exit_code = ?status.code(), "command finished");
    Ok(CommandStatus::Exited(status))
}
