//! Completion marker handling.
//!
//! A job is complete when its output directory holds an empty `_SUCCESS`
//! file. The marker is written only after a run has been classified as a
//! success and is never removed here.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the completion sentinel.
pub const MARKER_FILE: &str = "_SUCCESS";

/// Path of the marker inside `dir`.
pub fn marker_path(dir: &Path) -> PathBuf {
    dir.join(MARKER_FILE)
}

/// Returns true if `dir` already carries a completion marker.
pub fn exists(dir: &Path) -> bool {
    marker_path(dir).is_file()
}

/// Creates (or truncates) the completion marker in `dir`.
///
/// Fails if `dir` does not exist or is not writable.
pub fn create(dir: &Path) -> io::Result<()> {
    let file = File::create(marker_path(dir))?;
    drop(file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_marker_lifecycle() {
        let temp = TempDir::new().unwrap();
        assert!(!exists(temp.path()));

        create(temp.path()).unwrap();
        assert!(exists(temp.path()));
        assert_eq!(fs::metadata(marker_path(temp.path())).unwrap().len(), 0);
    }

    #[test]
    fn test_create_truncates_existing_marker() {
        let temp = TempDir::new().unwrap();
        fs::write(marker_path(temp.path()), "stale content").unwrap();

        create(temp.path()).unwrap();
        assert_eq!(fs::metadata(marker_path(temp.path())).unwrap().len(), 0);
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does-not-exist");

        let err = create(&missing).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!exists(&missing));
    }

    #[test]
    fn test_directory_named_like_marker_is_not_a_marker() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(marker_path(temp.path())).unwrap();
        assert!(!exists(temp.path()));
    }
}
