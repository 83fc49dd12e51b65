//! Error types for perf-harness operations.
//!
//! Only fatal conditions are modelled here:
//! - Missing or invalid harness configuration (installation root)
//! - Launcher processes that cannot be spawned
//! - Filesystem failures while writing the completion marker
//! - Reading and writing JSON configuration files
//!
//! Per-job outcomes (a failed benchmark, a missing time line) are never
//! errors; they are reported through [`crate::runner::JobResult`].

use thiserror::Error;

/// Errors that abort a job before or while it runs.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Missing installation root: {0} environment variable not set")]
    MissingEnvVar(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to spawn '{command}': {source}")]
    ProcessSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Returns true for errors caused by missing or invalid configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HarnessError::MissingEnvVar(_) | HarnessError::Configuration(_)
        )
    }
}

/// Errors that can occur while reading or writing JSON configuration files.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("IO error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
