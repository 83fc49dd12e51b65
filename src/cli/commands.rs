//! CLI command definitions for perf-harness.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::config_file::to_json_string;
use crate::runner::{
    marker, run_batch, BatchFile, ExecutionMode, HarnessConfig, JobRunner, JobSpec,
    INSTALL_ROOT_ENV,
};

/// Benchmark execution harness.
#[derive(Parser)]
#[command(name = "perf-harness")]
#[command(about = "Run benchmark jobs through SystemML launchers and record their timings")]
#[command(version)]
#[command(
    long_about = "perf-harness runs one benchmark algorithm per output directory, captures the launcher log,\nextracts the reported execution time and writes a _SUCCESS marker so finished jobs are skipped.\n\nExample usage:\n  perf-harness run --mode single-node --algorithm LinearRegression --arg=-stats= --arg \"-nvargs=X=X.mtx Y=y.mtx\" -o ./out/lr"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Run a single benchmark job.
    Run(RunArgs),

    /// Report whether output directories are already complete.
    Status(StatusArgs),

    /// Run every job listed in a JSON jobs file, in order.
    Batch(BatchArgs),
}

/// Arguments for `perf-harness run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Execution mode (single-node or distributed).
    #[arg(short = 'm', long, default_value = "single-node")]
    pub mode: ExecutionMode,

    /// Algorithm name; `<ALGORITHM>.dml` is passed to the launcher.
    #[arg(short = 'a', long)]
    pub algorithm: String,

    /// Launcher argument as FLAG=VALUE, split at the first '='. Repeatable, order is kept.
    #[arg(long = "arg", value_name = "FLAG=VALUE", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Pre-rendered argument string; overrides --arg.
    #[arg(long, allow_hyphen_values = true)]
    pub nvargs: Option<String>,

    /// Output directory holding the completion marker.
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Installation root containing bin/ launchers.
    #[arg(long, env = INSTALL_ROOT_ENV)]
    pub home: Option<PathBuf>,
}

/// Arguments for `perf-harness status`.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Output directories to check.
    #[arg(required = true)]
    pub dirs: Vec<PathBuf>,
}

/// Arguments for `perf-harness batch`.
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// JSON file of the form {"jobs": [...]}.
    pub jobs_file: PathBuf,

    /// Where to write the batch summary.
    #[arg(short = 'r', long)]
    pub results: Option<PathBuf>,

    /// Installation root containing bin/ launchers.
    #[arg(long, env = INSTALL_ROOT_ENV)]
    pub home: Option<PathBuf>,
}

/// Parse CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => run_job_command(args).await,
        Commands::Status(args) => run_status_command(args),
        Commands::Batch(args) => run_batch_command(args).await,
    }
}

async fn run_job_command(args: RunArgs) -> anyhow::Result<()> {
    let runner = JobRunner::new(HarnessConfig::resolve(args.home.clone())?);
    let job = build_job(&args)?;

    fs::create_dir_all(&job.output_directory).with_context(|| {
        format!("Failed to create output directory {}", job.output_directory.display())
    })?;

    let result = runner.run(&job).await?;
    println!("{}", to_json_string(&result)?);
    Ok(())
}

fn run_status_command(args: StatusArgs) -> anyhow::Result<()> {
    for dir in &args.dirs {
        let state = if marker::exists(dir) { "done" } else { "pending" };
        println!("{}\t{}", state, dir.display());
    }
    Ok(())
}

async fn run_batch_command(args: BatchArgs) -> anyhow::Result<()> {
    let runner = JobRunner::new(HarnessConfig::resolve(args.home)?);
    let batch = BatchFile::load(&args.jobs_file)?;
    info!(
        "Loaded {} jobs from {}",
        batch.jobs.len(),
        args.jobs_file.display()
    );

    let summary = run_batch(&runner, &batch.jobs).await?;

    for result in &summary.results {
        println!(
            "{}\t{}\t{}",
            result.algorithm,
            result.status,
            result.time_display()
        );
    }

    if let Some(path) = args.results {
        summary.save(&path)?;
        info!("Wrote batch summary to {}", path.display());
    }
    Ok(())
}

/// Builds a job from `run` arguments.
fn build_job(args: &RunArgs) -> anyhow::Result<JobSpec> {
    let mut job = JobSpec::new(args.mode, &args.algorithm, &args.output);

    if let Some(raw) = &args.nvargs {
        return Ok(job.with_raw_args(raw));
    }

    for arg in &args.args {
        let (flag, value) = parse_flag_value(arg)?;
        job = job.with_arg(flag, value);
    }
    Ok(job)
}

/// Splits `FLAG=VALUE` at the first '='. A bare `FLAG` gets an empty value.
fn parse_flag_value(raw: &str) -> anyhow::Result<(String, String)> {
    let (flag, value) = raw.split_once('=').unwrap_or((raw, ""));
    if flag.is_empty() {
        anyhow::bail!("Invalid launcher argument '{}': empty flag", raw);
    }
    Ok((flag.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::JobArgs;

    #[test]
    fn test_parse_flag_value() {
        assert_eq!(
            parse_flag_value("-nvargs=X=x.mtx").unwrap(),
            ("-nvargs".to_string(), "X=x.mtx".to_string())
        );
        assert_eq!(
            parse_flag_value("-stats").unwrap(),
            ("-stats".to_string(), String::new())
        );
        assert!(parse_flag_value("=value").is_err());
    }

    #[test]
    fn test_cli_run_parsing() {
        let cli = Cli::try_parse_from([
            "perf-harness",
            "run",
            "--mode",
            "single-node",
            "--algorithm",
            "LinearRegression",
            "--arg",
            "-stats=",
            "--arg",
            "-nvargs=rows=100",
            "-o",
            "/tmp/out",
            "--home",
            "/opt/systemml",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.mode, ExecutionMode::SingleNode);

        let job = build_job(&args).unwrap();
        assert_eq!(job.arguments.render(), "-stats -nvargs rows=100");
        assert_eq!(job.output_directory, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_nvargs_overrides_pairs() {
        let cli = Cli::try_parse_from([
            "perf-harness",
            "run",
            "-m",
            "distributed",
            "-a",
            "Kmeans",
            "--arg",
            "-stats=",
            "--nvargs",
            "k=5",
            "-o",
            "out",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        let job = build_job(&args).unwrap();
        assert_eq!(job.execution_mode, ExecutionMode::Distributed);
        assert_eq!(job.arguments, JobArgs::Opaque("k=5".to_string()));
    }

    #[test]
    fn test_status_requires_dirs() {
        assert!(Cli::try_parse_from(["perf-harness", "status"]).is_err());
        assert!(Cli::try_parse_from(["perf-harness", "status", "a", "b"]).is_ok());
    }
}
