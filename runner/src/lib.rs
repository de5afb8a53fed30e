//! Runs an addon's test suite inside a specific Blender version.
//!
//! The runner resolves a Blender version to an install directory, locates the
//! executable, merges run options over built-in defaults and starts Blender in
//! background mode with a test driver script. The driver receives its inputs
//! through environment variables; the runner reports success or failure.
//!
//! - **[`core`]**: Pure, deterministic logic (platform dispatch, option merge,
//!   environment block, exit classification). No I/O.
//! - **[`io`]**: Side-effecting operations (filesystem lookups, path
//!   translation, process execution), behind traits where tests need fakes.
//!
//! [`run`] ties them together and is what the `run-blender` binary calls.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod run;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
