//! Job descriptions and launcher command construction.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::config::HarnessConfig;

/// Execution mode of a benchmark job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Local standalone launcher.
    #[serde(alias = "singlenode")]
    SingleNode,
    /// Cluster-submission launcher.
    #[serde(alias = "hybrid_spark")]
    Distributed,
}

impl ExecutionMode {
    /// Returns the canonical name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::SingleNode => "single_node",
            ExecutionMode::Distributed => "distributed",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single_node" | "single-node" | "singlenode" => Ok(ExecutionMode::SingleNode),
            "distributed" | "hybrid_spark" | "hybrid-spark" | "spark" => {
                Ok(ExecutionMode::Distributed)
            }
            other => Err(format!("Unknown execution mode: {}", other)),
        }
    }
}

/// Arguments handed to the launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobArgs {
    /// Pre-rendered argument string, passed through untouched.
    Opaque(String),
    /// Ordered `(flag, value)` pairs.
    Pairs(Vec<(String, String)>),
    /// Flag to value mapping, rendered in sorted flag order.
    Map(BTreeMap<String, String>),
}

impl JobArgs {
    /// Renders the arguments as they appear on the command line.
    ///
    /// Pairs are rendered as `"<flag> <value>"` and concatenated with no
    /// separator between successive pairs. Existing launcher scripts depend
    /// on this exact layout.
    pub fn render(&self) -> String {
        match self {
            JobArgs::Opaque(raw) => raw.clone(),
            JobArgs::Pairs(pairs) => render_pairs(pairs.iter().map(|(k, v)| (k, v))),
            JobArgs::Map(map) => render_pairs(map.iter()),
        }
    }

    /// Returns true when no arguments are present.
    pub fn is_empty(&self) -> bool {
        match self {
            JobArgs::Opaque(raw) => raw.is_empty(),
            JobArgs::Pairs(pairs) => pairs.is_empty(),
            JobArgs::Map(map) => map.is_empty(),
        }
    }
}

fn render_pairs<'a, I>(pairs: I) -> String
where
    I: Iterator<Item = (&'a String, &'a String)>,
{
    pairs.map(|(k, v)| format!("{} {}", k, v)).collect::<Vec<_>>().concat()
}

impl Default for JobArgs {
    fn default() -> Self {
        JobArgs::Pairs(Vec::new())
    }
}

/// One benchmark job: an algorithm run under a mode against one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// How the algorithm is launched.
    pub execution_mode: ExecutionMode,
    /// Algorithm name; the script run is `<algorithm_name>.dml`.
    pub algorithm_name: String,
    /// Launcher arguments.
    #[serde(default)]
    pub arguments: JobArgs,
    /// Directory whose `_SUCCESS` marker tracks completion.
    pub output_directory: PathBuf,
}

impl JobSpec {
    /// Creates a job with no arguments.
    pub fn new(
        execution_mode: ExecutionMode,
        algorithm_name: impl Into<String>,
        output_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            execution_mode,
            algorithm_name: algorithm_name.into(),
            arguments: JobArgs::default(),
            output_directory: output_directory.into(),
        }
    }

    /// Appends a `(flag, value)` pair. Any opaque argument string is dropped;
    /// mapped arguments are kept in their sorted order, followed by the pair.
    pub fn with_arg(mut self, flag: impl Into<String>, value: impl Into<String>) -> Self {
        let pair = (flag.into(), value.into());
        match &mut self.arguments {
            JobArgs::Pairs(pairs) => pairs.push(pair),
            JobArgs::Map(map) => {
                let mut pairs: Vec<(String, String)> = std::mem::take(map).into_iter().collect();
                pairs.push(pair);
                self.arguments = JobArgs::Pairs(pairs);
            }
            JobArgs::Opaque(_) => self.arguments = JobArgs::Pairs(vec![pair]),
        }
        self
    }

    /// Sets a pre-rendered argument string.
    pub fn with_raw_args(mut self, raw: impl Into<String>) -> Self {
        self.arguments = JobArgs::Opaque(raw.into());
        self
    }

    /// Script file handed to the launcher.
    pub fn script_name(&self) -> String {
        format!("{}.dml", self.algorithm_name)
    }

    /// Builds the launcher invocation for this job.
    pub fn command(&self, config: &HarnessConfig) -> LaunchCommand {
        let script = self.script_name();
        let args = self.arguments.render();

        let (program, tail) = match self.execution_mode {
            ExecutionMode::SingleNode => {
                (config.single_node_launcher_path(), format!("{} {}", script, args))
            }
            ExecutionMode::Distributed => (
                config.distributed_launcher_path(),
                format!("-f {} -nvargs {}", script, args),
            ),
        };

        let command_line = format!("{} {}", program.display(), tail);
        LaunchCommand {
            program,
            args: split_args(&tail),
            command_line,
        }
    }
}

/// Splits arguments with POSIX shell quoting rules. Unbalanced quotes fall
/// back to plain whitespace splitting.
fn split_args(tail: &str) -> Vec<String> {
    shlex::split(tail)
        .unwrap_or_else(|| tail.split_whitespace().map(String::from).collect())
}

/// A fully resolved launcher invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    /// Launcher executable.
    pub program: PathBuf,
    /// Arguments after the executable, split with shell quoting rules.
    pub args: Vec<String>,
    command_line: String,
}

impl LaunchCommand {
    /// The command as a single string, before it is split into argv.
    pub fn command_line(&self) -> &str {
        &self.command_line
    }
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line)
    }
}
