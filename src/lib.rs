//! perf-harness: benchmark execution harness.
//!
//! Runs benchmark jobs through external launcher scripts, captures their
//! logs, extracts the reported execution time and records completion so a
//! finished job is never run twice.

pub mod cli;
pub mod config_file;
pub mod error;
pub mod runner;

pub use error::{ConfigFileError, HarnessError};
