//! I/O helpers for the runner: filesystem lookups and process execution.

pub mod config;
pub mod launcher;
pub mod locate;
pub mod path;
pub mod process;
pub mod provision;
