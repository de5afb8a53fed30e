//! Deterministic, pure logic shared by the runner.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and return deterministic outputs suitable for tests.

pub mod classifier;
pub mod env;
pub mod options;
pub mod platform;
pub mod types;
