//! Elapsed time extraction from launcher logs.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Prefix of the log line reporting the total run time.
pub const TIME_LINE_PREFIX: &str = "Total execution time";

static DIGITS: OnceLock<Regex> = OnceLock::new();

fn digits() -> &'static Regex {
    DIGITS.get_or_init(|| Regex::new(r"\d+").expect("valid digit pattern"))
}

/// Elapsed time recorded for a job.
///
/// `Reported` holds the digit groups of the time line joined with `.`
/// (`"Total execution time: 12 sec 345 ms"` becomes `"12.345"`). It is a
/// display string, not a parsed duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ElapsedTime {
    /// The job was skipped because it had already completed.
    Skipped,
    /// Time string taken from the log.
    Reported(String),
    /// The log carried no time line.
    NotFound,
}

impl ElapsedTime {
    /// Returns the reported time string, if any.
    pub fn reported(&self) -> Option<&str> {
        match self {
            ElapsedTime::Reported(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElapsedTime::Skipped => write!(f, "file_exists"),
            ElapsedTime::Reported(value) => write!(f, "{}", value),
            ElapsedTime::NotFound => write!(f, "not_found"),
        }
    }
}

/// Finds the first time line in `lines` and returns its digit groups.
pub fn extract<S: AsRef<str>>(lines: &[S]) -> ElapsedTime {
    lines
        .iter()
        .map(AsRef::as_ref)
        .find(|line| line.starts_with(TIME_LINE_PREFIX))
        .map(|line| {
            let groups: Vec<&str> = digits().find_iter(line).map(|m| m.as_str()).collect();
            ElapsedTime::Reported(groups.join("."))
        })
        .unwrap_or(ElapsedTime::NotFound)
}
