//! Test-only helpers: fake Blender installs and scripted collaborators.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use tempfile::TempDir;

use crate::core::types::{Invocation, RunOutcome};
use crate::io::launcher::Launcher;
use crate::io::provision::Provisioner;

/// Write an executable `/bin/sh` script named `name` into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
    path
}

/// Temporary directory standing in for an extracted Blender release.
pub struct FakeInstall {
    dir: TempDir,
}

impl FakeInstall {
    /// Create an install directory holding one empty file per name.
    pub fn with_executables(names: &[&str]) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        for name in names {
            fs::write(dir.path().join(name), b"")?;
        }
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Provisioner that always answers with the same directory (or error) and
/// records the versions it was asked for.
pub struct StaticProvisioner {
    answer: std::result::Result<PathBuf, String>,
    requested: RefCell<Vec<String>>,
}

impl StaticProvisioner {
    pub fn new(dir: &Path) -> Self {
        Self {
            answer: Ok(dir.to_path_buf()),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl Provisioner for StaticProvisioner {
    fn provision(&self, version: &str) -> Result<PathBuf> {
        self.requested.borrow_mut().push(version.to_string());
        self.answer.clone().map_err(|message| anyhow!(message))
    }
}

/// Launcher that returns queued outcomes and records every invocation.
pub struct ScriptedLauncher {
    outcomes: RefCell<VecDeque<RunOutcome>>,
    invocations: RefCell<Vec<Invocation>>,
}

impl ScriptedLauncher {
    pub fn new(outcomes: Vec<RunOutcome>) -> Self {
        Self {
            outcomes: RefCell::new(outcomes.into()),
            invocations: RefCell::new(Vec::new()),
        }
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }
}

impl Launcher for ScriptedLauncher {
    fn launch(&self, invocation: &Invocation) -> Result<RunOutcome> {
        self.invocations.borrow_mut().push(invocation.clone());
        self.outcomes
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("scripted launcher has no outcome left"))
    }
}
