//! Classification of the Blender process exit status.

use crate::core::types::RunOutcome;

/// Map a process exit code to a [`RunOutcome`].
///
/// `None` (terminated by a signal) counts as failure.
pub fn classify_exit_code(code: Option<i32>) -> RunOutcome {
    match code {
        Some(0) => RunOutcome::Success,
        _ => RunOutcome::Failure,
    }
}
