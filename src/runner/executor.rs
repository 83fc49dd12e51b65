//! Job runner - the main harness logic.

use std::process::Stdio;

use chrono::Utc;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::capture;
use super::classify::stderr_indicates_failure;
use super::config::HarnessConfig;
use super::job::JobSpec;
use super::marker;
use super::result::JobResult;
use super::timing;
use crate::error::HarnessError;

/// Runs benchmark jobs through the configured launchers.
///
/// A job whose output directory already holds a `_SUCCESS` marker is never
/// run again. Two runners must not target the same output directory at the
/// same time; marker creation is not coordinated between them.
#[derive(Debug, Clone)]
pub struct JobRunner {
    /// Resolved harness configuration.
    config: HarnessConfig,
}

impl JobRunner {
    /// Creates a new job runner with the given configuration.
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    /// Creates a runner whose installation root comes from `SYSTEMML_HOME`.
    pub fn from_env() -> Result<Self, HarnessError> {
        Ok(Self::new(HarnessConfig::from_env()?))
    }

    /// Returns the runner's configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Runs one job.
    ///
    /// Per-job outcomes (already done, success, failure) are reported in the
    /// returned [`JobResult`]. Only spawn and filesystem failures are errors.
    pub async fn run(&self, job: &JobSpec) -> Result<JobResult, HarnessError> {
        let run_id = format!("run-{}", Uuid::new_v4());

        if marker::exists(&job.output_directory) {
            info!(
                "Skipping {}: {} already complete",
                job.algorithm_name,
                job.output_directory.display()
            );
            return Ok(JobResult::already_done(
                run_id,
                &job.algorithm_name,
                job.output_directory.clone(),
            ));
        }

        let command = job.command(&self.config);
        let started_at = Utc::now();

        info!(
            "Starting run {} of {} ({})",
            run_id, job.algorithm_name, job.execution_mode
        );
        debug!("Command: {}", command);

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| HarnessError::ProcessSpawn {
                command: command.to_string(),
                source: e,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| HarnessError::Io(std::io::Error::other("stdout not captured")))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| HarnessError::Io(std::io::Error::other("stderr not captured")))?;

        // Drain stderr alongside stdout so a full pipe cannot stall the child.
        // Its content is only inspected once the process has exited.
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf).await.map(|_| buf)
        });

        let raw_log = capture::capture(stdout, &job.algorithm_name).await;
        let status = child.wait().await?;

        let stderr_bytes = stderr_task
            .await
            .map_err(|e| HarnessError::Io(std::io::Error::other(e)))??;
        let stderr_text = String::from_utf8_lossy(&stderr_bytes).to_string();

        debug!(
            "Run {} exited with {} after {} log lines",
            run_id,
            status,
            raw_log.len()
        );

        if stderr_indicates_failure(&stderr_text) {
            warn!("Error Found in {}", job.algorithm_name);
            return Ok(JobResult::failure(
                run_id,
                &job.algorithm_name,
                job.output_directory.clone(),
                started_at,
                raw_log,
            )
            .with_exit_code(status.code())
            .with_stderr(stderr_text));
        }

        let elapsed = timing::extract(&raw_log);
        marker::create(&job.output_directory)?;

        info!(
            "Run {} of {} completed, elapsed time {}",
            run_id, job.algorithm_name, elapsed
        );

        Ok(JobResult::success(
            run_id,
            &job.algorithm_name,
            job.output_directory.clone(),
            started_at,
            elapsed,
            raw_log,
        )
        .with_exit_code(status.code())
        .with_stderr(stderr_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::job::ExecutionMode;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_marker_short_circuits_without_launcher() {
        let root = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        marker::create(out.path()).unwrap();

        // No launcher exists under root/bin, so any spawn attempt would fail.
        let runner = JobRunner::new(HarnessConfig::new(root.path()));
        let job = JobSpec::new(ExecutionMode::SingleNode, "GLM", out.path());

        let result = runner.run(&job).await.unwrap();
        assert!(result.is_already_done());
        assert_eq!(result.time_display(), "file_exists");
    }

    #[tokio::test]
    async fn test_missing_launcher_is_spawn_error() {
        let root = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        let runner = JobRunner::new(HarnessConfig::new(root.path()));
        let job = JobSpec::new(ExecutionMode::Distributed, "GLM", out.path())
            .with_raw_args("X=x.mtx");

        let err = runner.run(&job).await.unwrap_err();
        assert!(matches!(err, HarnessError::ProcessSpawn { .. }));
        assert!(err.to_string().contains("-nvargs X=x.mtx"));
        assert!(!marker::exists(out.path()));
    }

    #[test]
    fn test_from_env_fails_before_any_job_runs() {
        std::env::remove_var(crate::runner::config::INSTALL_ROOT_ENV);

        let err = JobRunner::from_env().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_runner_keeps_config() {
        let runner = JobRunner::new(HarnessConfig::new("/opt/systemml"));
        assert_eq!(runner.config().install_root, std::path::PathBuf::from("/opt/systemml"));
    }
}
