//! Results of benchmark job runs.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timing::ElapsedTime;

/// Maximum number of stderr bytes kept in a result.
const STDERR_SUMMARY_LIMIT: usize = 10000;

/// Outcome of a single job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    /// Unique identifier for this run.
    pub run_id: String,
    /// Algorithm that was run.
    pub algorithm: String,
    /// Directory the job targeted.
    pub output_directory: PathBuf,
    /// Final state of the job.
    pub status: JobStatus,
    /// Elapsed time; absent for failed runs.
    pub elapsed_time: Option<ElapsedTime>,
    /// Captured stdout lines, in order.
    pub raw_log: Vec<String>,
    /// Exit code of the launcher, if it ran and exited normally.
    ///
    /// Informational only: success is decided from stderr.
    pub exit_code: Option<i32>,
    /// Captured stderr (truncated if too long).
    pub stderr_summary: String,
    /// Timestamp when the run started.
    pub started_at: DateTime<Utc>,
    /// Timestamp when the run completed.
    pub completed_at: DateTime<Utc>,
}

impl JobResult {
    fn base(
        run_id: impl Into<String>,
        algorithm: impl Into<String>,
        output_directory: PathBuf,
        status: JobStatus,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            algorithm: algorithm.into(),
            output_directory,
            status,
            elapsed_time: None,
            raw_log: Vec::new(),
            exit_code: None,
            stderr_summary: String::new(),
            started_at,
            completed_at: Utc::now(),
        }
    }

    /// Result for a job skipped because its marker already exists.
    pub fn already_done(
        run_id: impl Into<String>,
        algorithm: impl Into<String>,
        output_directory: PathBuf,
    ) -> Self {
        let mut result = Self::base(
            run_id,
            algorithm,
            output_directory,
            JobStatus::AlreadyDone,
            Utc::now(),
        );
        result.elapsed_time = Some(ElapsedTime::Skipped);
        result
    }

    /// Result for a run classified as successful.
    pub fn success(
        run_id: impl Into<String>,
        algorithm: impl Into<String>,
        output_directory: PathBuf,
        started_at: DateTime<Utc>,
        elapsed_time: ElapsedTime,
        raw_log: Vec<String>,
    ) -> Self {
        let mut result = Self::base(
            run_id,
            algorithm,
            output_directory,
            JobStatus::Success,
            started_at,
        );
        result.elapsed_time = Some(elapsed_time);
        result.raw_log = raw_log;
        result
    }

    /// Result for a run classified as failed.
    pub fn failure(
        run_id: impl Into<String>,
        algorithm: impl Into<String>,
        output_directory: PathBuf,
        started_at: DateTime<Utc>,
        raw_log: Vec<String>,
    ) -> Self {
        let mut result = Self::base(
            run_id,
            algorithm,
            output_directory,
            JobStatus::Failure,
            started_at,
        );
        result.raw_log = raw_log;
        result
    }

    /// Sets the exit code.
    pub fn with_exit_code(mut self, code: Option<i32>) -> Self {
        self.exit_code = code;
        self
    }

    /// Sets stderr summary.
    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr_summary = truncate_string(stderr.into(), STDERR_SUMMARY_LIMIT);
        self
    }

    /// Returns true if the job ran and succeeded.
    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Success
    }

    /// Returns true if the job was skipped.
    pub fn is_already_done(&self) -> bool {
        self.status == JobStatus::AlreadyDone
    }

    /// Time string as printed in reports: the reported digits, a sentinel,
    /// or `failure`.
    pub fn time_display(&self) -> String {
        match &self.elapsed_time {
            Some(elapsed) => elapsed.to_string(),
            None => "failure".to_string(),
        }
    }
}

/// Final state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Marker was present; nothing ran.
    AlreadyDone,
    /// Launcher ran and reported no error.
    Success,
    /// Launcher reported an error on stderr.
    Failure,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::AlreadyDone => write!(f, "already_done"),
            JobStatus::Success => write!(f, "success"),
            JobStatus::Failure => write!(f, "failure"),
        }
    }
}

/// Truncates a string to at most `max_len` bytes on a char boundary.
fn truncate_string(s: String, max_len: usize) -> String {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_done_result() {
        let result = JobResult::already_done("run-1", "GLM", PathBuf::from("out/glm"));
        assert!(result.is_already_done());
        assert_eq!(result.elapsed_time, Some(ElapsedTime::Skipped));
        assert!(result.raw_log.is_empty());
        assert_eq!(result.time_display(), "file_exists");
    }

    #[test]
    fn test_failure_has_no_time() {
        let result = JobResult::failure(
            "run-2",
            "GLM",
            PathBuf::from("out/glm"),
            Utc::now(),
            vec!["line".to_string()],
        )
        .with_stderr("Error: boom")
        .with_exit_code(Some(1));

        assert!(!result.is_success());
        assert_eq!(result.status, JobStatus::Failure);
        assert!(result.elapsed_time.is_none());
        assert_eq!(result.time_display(), "failure");
        assert_eq!(result.stderr_summary, "Error: boom");
    }

    #[test]
    fn test_success_keeps_log() {
        let result = JobResult::success(
            "run-3",
            "Kmeans",
            PathBuf::from("out/km"),
            Utc::now(),
            ElapsedTime::NotFound,
            vec!["a".to_string(), "b".to_string()],
        );
        assert!(result.is_success());
        assert_eq!(result.raw_log.len(), 2);
        assert_eq!(result.time_display(), "not_found");
        assert!(result.completed_at >= result.started_at);
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        let s = "é".repeat(10);
        let truncated = truncate_string(s, 5);
        assert!(truncated.starts_with("éé"));
        assert!(truncated.ends_with("... [truncated]"));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(JobStatus::AlreadyDone.to_string(), "already_done");
        assert_eq!(
            serde_json::to_string(&JobStatus::Failure).unwrap(),
            "\"failure\""
        );
    }
}
