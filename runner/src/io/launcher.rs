//! Launcher abstraction for running Blender in background mode.
//!
//! The [`Launcher`] trait decouples run orchestration from actually spawning
//! Blender. Tests use scripted launchers that record the invocation and return
//! a predetermined outcome.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use crate::core::classifier::classify_exit_code;
use crate::core::env::EnvBlock;
use crate::core::options::EffectiveConfig;
use crate::core::types::{Invocation, RunOutcome};
use crate::io::path::PathNormalizer;
use crate::io::process::{CommandStatus, run_command_inherited};

/// Abstraction over ways of running a prepared Blender invocation.
pub trait Launcher {
    /// Run `invocation` to completion and classify the result.
    fn launch(&self, invocation: &Invocation) -> Result<RunOutcome>;
}

/// Launcher that spawns the Blender process and waits for it.
pub struct BlenderLauncher;

impl Launcher for BlenderLauncher {
    #[instrument(skip_all, fields(program = %invocation.program.display()))]
    fn launch(&self, invocation: &Invocation) -> Result<RunOutcome> {
        info!("starting blender");
        let status = run_command_inherited(command_for(invocation)).context("run blender")?;

        if let CommandStatus::SpawnFailed(err) = &status {
            warn!(err = %err, "blender could not be started");
        }
        let outcome = classify_exit_code(status.code());
        match outcome {
            RunOutcome::Success => debug!("blender exited successfully"),
            RunOutcome::Failure => warn!(exit_code = ?status.code(), "blender run failed"),
        }
        Ok(outcome)
    }
}

/// Build the `Command` for an invocation, including its environment block.
pub fn command_for(invocation: &Invocation) -> Command {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);
    invocation.env.apply(&mut cmd);
    cmd
}

/// Prepare the invocation of `blender -b --python <driver>` for one addon.
///
/// The executable, driver script and support dir are normalized for the host;
/// the addon path is passed through as given.
#[instrument(skip_all, fields(executable = %executable.display(), addon = %addon_path.display()))]
pub fn build_invocation(
    executable: &Path,
    addon_path: &Path,
    config: &EffectiveConfig,
    normalizer: &PathNormalizer,
) -> Result<Invocation> {
    let program = normalizer
        .normalize(executable)
        .context("normalize blender path")?;
    let driver = normalizer
        .normalize(&config.test_driver_script)
        .context("normalize test driver path")?;
    let support_dir = normalizer
        .normalize(&config.support_dir)
        .context("normalize support dir")?;

    let env = EnvBlock::for_run(addon_path, support_dir.as_os_str(), config);
    let args = vec![
        OsString::from("-b"),
        OsString::from("--python"),
        driver.into_os_string(),
    ];
    Ok(Invocation { program, args, env })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::env::{ADDON_TO_TEST, EnvValue, LOCAL_PYTHONPATH};
    use crate::core::options::{Defaults, RunOptions};
    use crate::core::platform::Platform;
    use std::path::PathBuf;

    fn posix() -> PathNormalizer {
        PathNormalizer::new(Platform::Posix)
    }

    #[test]
    fn invocation_runs_driver_in_background_mode() {
        let config = EffectiveConfig::merge(
            &Defaults::with_support_dir("/opt/tester"),
            &RunOptions::default(),
        );
        let invocation = build_invocation(
            Path::new("/cache/2.80/blender"),
            Path::new("/tmp/my_addon"),
            &config,
            &posix(),
        )
        .expect("build");

        assert_eq!(invocation.program, PathBuf::from("/cache/2.80/blender"));
        assert_eq!(
            invocation.args,
            vec![
                OsString::from("-b"),
                OsString::from("--python"),
                OsString::from("/opt/tester/blender_load_pytest.py"),
            ]
        );
        assert_eq!(
            invocation.env.get(ADDON_TO_TEST),
            Some(&EnvValue::Set(OsString::from("/tmp/my_addon")))
        );
        assert_eq!(
            invocation.env.get(LOCAL_PYTHONPATH),
            Some(&EnvValue::Set(OsString::from("/opt/tester")))
        );
    }

    #[test]
    fn translation_failure_is_fatal() {
        let config = EffectiveConfig::merge(
            &Defaults::with_support_dir("/opt/tester"),
            &RunOptions::default(),
        );
        let normalizer = PathNormalizer::with_utility(Platform::Cygwin, "/nonexistent/cygpath");
        let err = build_invocation(
            Path::new("/cache/blender.exe"),
            Path::new("addon"),
            &config,
            &normalizer,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("normalize blender path"));
    }

    #[test]
    fn missing_executable_is_failure_not_error() {
        let config = EffectiveConfig::merge(
            &Defaults::with_support_dir("/opt/tester"),
            &RunOptions::default(),
        );
        let invocation = build_invocation(
            Path::new("/nonexistent/blender"),
            Path::new("addon"),
            &config,
            &posix(),
        )
        .expect("build");
        let outcome = BlenderLauncher.launch(&invocation).expect("launch");
        assert_eq!(outcome, RunOutcome::Failure);
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use crate::test_support::write_script;

        fn launch_stub(body: &str) -> RunOutcome {
            let temp = tempfile::tempdir().expect("tempdir");
            let blender = write_script(temp.path(), "blender", body);
            let config = EffectiveConfig::merge(
                &Defaults::with_support_dir(temp.path()),
                &RunOptions::default(),
            );
            let invocation =
                build_invocation(&blender, Path::new("addon"), &config, &posix()).expect("build");
            BlenderLauncher.launch(&invocation).expect("launch")
        }

        #[test]
        fn stub_exit_zero_is_success() {
            assert_eq!(launch_stub("exit 0"), RunOutcome::Success);
        }

        #[test]
        fn stub_nonzero_exits_collapse_to_failure() {
            for code in [1, 2, 127] {
                let outcome = launch_stub(&format!("exit {code}"));
                assert_eq!(outcome, RunOutcome::Failure, "exit {code}");
                assert_eq!(outcome.exit_code(), 1);
            }
        }

        #[test]
        fn stub_receives_arguments_and_environment() {
            let temp = tempfile::tempdir().expect("tempdir");
            let record = temp.path().join("record.txt");
            let blender = write_script(
                temp.path(),
                "blender",
                &format!(
                    "printf '%s|%s|%s|%s|%s\\n' \"$1\" \"$2\" \"$BLENDER_ADDON_TO_TEST\" \
                     \"${{BLENDER_ADDON_COVERAGE_REPORTING-unset}}\" \"${{BLENDER_ADDON_TESTS_PATH-unset}}\" > '{}'",
                    record.display()
                ),
            );
            let config = EffectiveConfig::merge(
                &Defaults::with_support_dir(temp.path()),
                &RunOptions {
                    coverage: Some(true),
                    ..RunOptions::default()
                },
            );
            let invocation =
                build_invocation(&blender, Path::new("/tmp/my_addon"), &config, &posix())
                    .expect("build");
            assert_eq!(
                BlenderLauncher.launch(&invocation).expect("launch"),
                RunOutcome::Success
            );

            let recorded = std::fs::read_to_string(&record).expect("read record");
            assert_eq!(recorded.trim_end(), "-b|--python|/tmp/my_addon|y|unset");
        }
    }
}
