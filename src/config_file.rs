//! JSON configuration files.
//!
//! Documents are read and written verbatim with 4-space indentation. No
//! schema is enforced beyond what the target type's `Deserialize` requires;
//! use `serde_json::Value` to handle arbitrary documents.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::ConfigFileError;

/// Reads a JSON document from `path`.
pub fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigFileError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigFileError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ConfigFileError::Json {
        path: path.display().to_string(),
        source: e,
    })
}

/// Writes `value` to `path` as JSON indented with four spaces.
pub fn write_config<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ConfigFileError> {
    let content = to_json_string(value).map_err(|e| ConfigFileError::Json {
        path: path.display().to_string(),
        source: e,
    })?;
    fs::write(path, content).map_err(|e| ConfigFileError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Serializes `value` with four-space indentation.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    // serde_json only ever emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
