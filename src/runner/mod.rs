//! Benchmark job runner.
//!
//! This module runs one benchmark job as an external launcher process and
//! keeps the bookkeeping that makes reruns idempotent.
//!
//! # Architecture
//!
//! ```text
//! JobSpec → marker check → launcher command → process → log capture
//!                                                     → stderr check → time extraction → _SUCCESS
//! ```
//!
//! The runner:
//! 1. Skips the job if its output directory already holds `_SUCCESS`
//! 2. Builds the mode-specific launcher command
//! 3. Streams and logs the launcher's stdout while it runs
//! 4. Classifies the run from its stderr once it has exited
//! 5. On success, extracts the reported time and writes the marker
//!
//! # Example
//!
//! ```ignore
//! use perf_harness::runner::{ExecutionMode, HarnessConfig, JobRunner, JobSpec};
//!
//! let runner = JobRunner::new(HarnessConfig::from_env()?);
//! let job = JobSpec::new(ExecutionMode::SingleNode, "LinearRegression", "./out/lr")
//!     .with_arg("-stats", "")
//!     .with_arg("-nvargs", "X=data/X.mtx Y=data/y.mtx");
//!
//! let result = runner.run(&job).await?;
//! println!("{}: {}", result.status, result.time_display());
//! ```

pub mod batch;
pub mod capture;
pub mod classify;
pub mod config;
pub mod executor;
pub mod job;
pub mod marker;
pub mod result;
pub mod timing;

pub use batch::{run_batch, BatchFile, BatchSummary};
pub use classify::stderr_indicates_failure;
pub use config::{HarnessConfig, INSTALL_ROOT_ENV};
pub use executor::JobRunner;
pub use job::{ExecutionMode, JobArgs, JobSpec, LaunchCommand};
pub use result::{JobResult, JobStatus};
pub use timing::ElapsedTime;
