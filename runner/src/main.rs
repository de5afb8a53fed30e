//! `run-blender`: run an addon's tests inside a given Blender version.
//!
//! Exits 0 when Blender runs the test driver successfully and 1 on any
//! failure, including usage errors.

use std::path::PathBuf;

use anyhow::Result;
use blender_runner::core::options::RunOptions;
use blender_runner::io::config::load_optional;
use blender_runner::{exit_codes, logging, run};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "run-blender",
    version,
    about = "Run an addon's test suite inside a specific Blender version"
)]
struct Cli {
    /// Blender version to test against (e.g. `2.80`).
    #[arg(value_name = "VERSION")]
    blender_version: String,
    /// Addon directory or `.zip` archive.
    #[arg(value_name = "ADDON_PATH")]
    addon_path: PathBuf,
    /// TOML file with run options.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Ask the test driver to collect coverage.
    #[arg(long, conflicts_with = "no_coverage")]
    coverage: bool,
    /// Turn coverage off even if the config file enables it.
    #[arg(long)]
    no_coverage: bool,
    /// Tests directory or script handed to the test driver.
    #[arg(long, value_name = "PATH")]
    tests: Option<PathBuf>,
    /// Directory holding cached Blender releases.
    #[arg(long, value_name = "DIR")]
    cache: Option<PathBuf>,
    /// Test driver script to run instead of the built-in one.
    #[arg(long, value_name = "FILE")]
    driver_script: Option<PathBuf>,
}

impl Cli {
    /// Options given on the command line; unset flags leave file values alone.
    fn flag_options(&self) -> RunOptions {
        RunOptions {
            test_driver_script: self.driver_script.clone(),
            coverage: match (self.coverage, self.no_coverage) {
                (true, _) => Some(true),
                (false, true) => Some(false),
                (false, false) => None,
            },
            tests: self.tests.clone(),
            cache: self.cache.clone(),
            ..RunOptions::default()
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(_) => {
            println!("{}", Cli::command().render_usage());
            std::process::exit(exit_codes::FAILURE);
        }
    };

    logging::init();
    match execute(&cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::FAILURE);
        }
    }
}

fn execute(cli: &Cli) -> Result<i32> {
    let options = load_optional(cli.config.as_deref())?.overridden_by(cli.flag_options());
    run::run(&cli.addon_path, &cli.blender_version, options)
}
