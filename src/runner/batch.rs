//! Sequential batch driver.
//!
//! Runs a list of jobs through one [`JobRunner`], one after another.
//! Failed benchmarks do not stop the batch; spawn and filesystem errors do.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::executor::JobRunner;
use super::job::JobSpec;
use super::result::{JobResult, JobStatus};
use crate::config_file::{read_config, write_config};
use crate::error::{ConfigFileError, HarnessError};

/// Jobs file layout: `{"jobs": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchFile {
    pub jobs: Vec<JobSpec>,
}

impl BatchFile {
    /// Loads a jobs file.
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        read_config(path)
    }
}

/// Aggregated outcome of a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub success: usize,
    pub failure: usize,
    pub already_done: usize,
    pub results: Vec<JobResult>,
}

impl BatchSummary {
    /// Records one job result.
    pub fn record(&mut self, result: JobResult) {
        self.total += 1;
        match result.status {
            JobStatus::Success => self.success += 1,
            JobStatus::Failure => self.failure += 1,
            JobStatus::AlreadyDone => self.already_done += 1,
        }
        self.results.push(result);
    }

    /// Writes the summary as a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        write_config(path, self)
    }
}

/// Runs `jobs` in order, creating each output directory first.
pub async fn run_batch(runner: &JobRunner, jobs: &[JobSpec]) -> Result<BatchSummary, HarnessError> {
    let mut summary = BatchSummary::default();

    for job in jobs {
        std::fs::create_dir_all(&job.output_directory)?;

        let result = runner.run(job).await?;
        if result.status == JobStatus::Failure {
            warn!(
                "Job {} in {} failed, continuing",
                job.algorithm_name,
                job.output_directory.display()
            );
        }
        summary.record(result);
    }

    info!(
        "Batch finished: {} total, {} success, {} failure, {} already done",
        summary.total, summary.success, summary.failure, summary.already_done
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::config::HarnessConfig;
    use crate::runner::job::ExecutionMode;
    use crate::runner::marker;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_batch_of_completed_jobs() {
        let root = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        let jobs: Vec<JobSpec> = ["a", "b"]
            .iter()
            .map(|name| {
                let dir = out.path().join(name);
                std::fs::create_dir_all(&dir).unwrap();
                marker::create(&dir).unwrap();
                JobSpec::new(ExecutionMode::SingleNode, *name, dir)
            })
            .collect();

        let runner = JobRunner::new(HarnessConfig::new(root.path()));
        let summary = run_batch(&runner, &jobs).await.unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.already_done, 2);
        assert_eq!(summary.success, 0);
    }

    #[test]
    fn test_summary_record() {
        let mut summary = BatchSummary::default();
        summary.record(JobResult::already_done("r1", "GLM", "out".into()));
        summary.record(JobResult::failure(
            "r2",
            "GLM",
            "out2".into(),
            chrono::Utc::now(),
            Vec::new(),
        ));

        assert_eq!(summary.total, 2);
        assert_eq!(summary.failure, 1);
        assert_eq!(summary.already_done, 1);
    }

    #[test]
    fn test_batch_file_roundtrip_on_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("jobs.json");
        std::fs::write(
            &path,
            r#"{"jobs": [
                {"execution_mode": "singlenode", "algorithm_name": "GLM",
                 "arguments": [["-stats", ""]], "output_directory": "out/glm"},
                {"execution_mode": "singlenode", "algorithm_name": "MultiLogReg",
                 "arguments": {"-stats": "", "-nvargs": "X=x.mtx"},
                 "output_directory": "out/mlr"}
            ]}"#,
        )
        .unwrap();

        let batch = BatchFile::load(&path).unwrap();
        assert_eq!(batch.jobs.len(), 2);
        assert_eq!(batch.jobs[0].algorithm_name, "GLM");
        assert_eq!(batch.jobs[1].arguments.render(), "-nvargs X=x.mtx-stats ");

        let copy = temp.path().join("jobs-copy.json");
        write_config(&copy, &batch).unwrap();
        let reloaded = BatchFile::load(&copy).unwrap();
        assert_eq!(reloaded.jobs, batch.jobs);
    }
}
