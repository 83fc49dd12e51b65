//! Failure classification for finished launcher runs.

/// Text whose presence on stderr marks a run as failed.
pub const FAILURE_INDICATOR: &str = "Error";

/// Returns true if the launcher's stderr reports a failure.
///
/// This is a case-sensitive substring heuristic. A run that fails without
/// printing `Error` is classified as a success.
pub fn stderr_indicates_failure(stderr: &str) -> bool {
    stderr.contains(FAILURE_INDICATOR)
}
