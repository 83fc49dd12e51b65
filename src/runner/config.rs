//! Configuration for the job runner.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// Environment variable holding the installation root.
pub const INSTALL_ROOT_ENV: &str = "SYSTEMML_HOME";

/// Default launcher for single-node runs, relative to `<root>/bin`.
pub const DEFAULT_SINGLE_NODE_LAUNCHER: &str = "systemml-standalone.py";

/// Default launcher for distributed runs, relative to `<root>/bin`.
pub const DEFAULT_DISTRIBUTED_LAUNCHER: &str = "systemml-spark-submit.py";

/// Resolved harness configuration.
///
/// Built once before any job runs, so a missing installation root is
/// reported before a single process is spawned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Installation root containing the `bin/` launchers.
    pub install_root: PathBuf,
    /// File name of the single-node launcher.
    pub single_node_launcher: String,
    /// File name of the distributed launcher.
    pub distributed_launcher: String,
}

impl HarnessConfig {
    /// Creates a configuration for an explicit installation root.
    pub fn new(install_root: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
            single_node_launcher: DEFAULT_SINGLE_NODE_LAUNCHER.to_string(),
            distributed_launcher: DEFAULT_DISTRIBUTED_LAUNCHER.to_string(),
        }
    }

    /// Creates configuration from the `SYSTEMML_HOME` environment variable.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::MissingEnvVar` if the variable is unset and
    /// `HarnessError::Configuration` if it is empty.
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::resolve(std::env::var_os(INSTALL_ROOT_ENV).map(PathBuf::from))
    }

    /// Builds a configuration from an optional root, as supplied by the
    /// environment or a command-line flag.
    pub fn resolve(install_root: Option<PathBuf>) -> Result<Self, HarnessError> {
        match install_root {
            None => Err(HarnessError::MissingEnvVar(INSTALL_ROOT_ENV.to_string())),
            Some(root) if root.as_os_str().is_empty() => Err(HarnessError::Configuration(
                format!("{} is set but empty", INSTALL_ROOT_ENV),
            )),
            Some(root) => Ok(Self::new(root)),
        }
    }

    /// Sets the single-node launcher file name.
    pub fn with_single_node_launcher(mut self, name: impl Into<String>) -> Self {
        self.single_node_launcher = name.into();
        self
    }

    /// Sets the distributed launcher file name.
    pub fn with_distributed_launcher(mut self, name: impl Into<String>) -> Self {
        self.distributed_launcher = name.into();
        self
    }

    /// Directory holding the launcher executables.
    pub fn bin_dir(&self) -> PathBuf {
        self.install_root.join("bin")
    }

    /// Full path of the single-node launcher.
    pub fn single_node_launcher_path(&self) -> PathBuf {
        self.bin_dir().join(&self.single_node_launcher)
    }

    /// Full path of the distributed launcher.
    pub fn distributed_launcher_path(&self) -> PathBuf {
        self.bin_dir().join(&self.distributed_launcher)
    }

    /// Installation root.
    pub fn install_root(&self) -> &Path {
        &self.install_root
    }
}
