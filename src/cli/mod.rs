//! Command-line interface for perf-harness.
//!
//! Provides commands for running single jobs, running job batches and
//! checking completion state.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, Cli};
