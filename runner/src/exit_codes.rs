//! Stable exit codes for the `run-blender` CLI.

/// Blender ran the test driver and exited with status 0.
pub const OK: i32 = 0;
/// Usage error, setup failure, or Blender exited non-zero.
pub const FAILURE: i32 = 1;
