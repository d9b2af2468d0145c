//! Loading local records from JSON or YAML files.

use serde_json::Value;
use std::path::{Path, PathBuf};

/// Errors while reading records or `--set` assignments.
#[derive(Debug)]
pub enum RecordsError {
    ReadError(PathBuf, std::io::Error),
    JsonError(PathBuf, serde_json::Error),
    YamlError(PathBuf, serde_yaml::Error),
    NotAList(PathBuf),
    BadAssignment(String),
}

impl std::fmt::Display for RecordsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordsError::ReadError(path, e) => {
                write!(f, "Failed to read records '{}': {}", path.display(), e)
            }
            RecordsError::JsonError(path, e) => {
                write!(f, "Failed to parse JSON records '{}': {}", path.display(), e)
            }
            RecordsError::YamlError(path, e) => {
                write!(f, "Failed to parse YAML records '{}': {}", path.display(), e)
            }
            RecordsError::NotAList(path) => write!(
                f,
                "Records file '{}' must hold a list of objects",
                path.display()
            ),
            RecordsError::BadAssignment(s) => {
                write!(f, "Invalid --set '{}', expected KEY=VALUE", s)
            }
        }
    }
}

impl std::error::Error for RecordsError {}

/// Reads records from `path`. Files ending in `.yaml`/`.yml` are YAML,
/// anything else is JSON. A single object is treated as a list of one.
pub fn load_records(path: &Path) -> Result<Vec<Value>, RecordsError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| RecordsError::ReadError(path.to_path_buf(), e))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let value: Value = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| RecordsError::YamlError(path.to_path_buf(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| RecordsError::JsonError(path.to_path_buf(), e))?
    };

    match value {
        Value::Array(records) => Ok(records),
        record @ Value::Object(_) => Ok(vec![record]),
        _ => Err(RecordsError::NotAList(path.to_path_buf())),
    }
}

/// Parses `KEY=VALUE` pairs.
pub fn parse_assignments(sets: &[String]) -> Result<Vec<(String, String)>, RecordsError> {
    sets.iter()
        .map(|s| match s.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(RecordsError::BadAssignment(s.clone())),
        })
        .collect()
}

/// Sets every assignment on `record`. Non-object records are left alone.
pub fn stamp(record: &mut Value, assignments: &[(String, String)]) {
    if let Value::Object(map) = record {
        for (key, value) in assignments {
            map.insert(key.clone(), Value::String(value.clone()));
        }
    }
}

/// Human label for a record: its primary key if present.
pub fn label(record: &Value, primary_key: &str) -> String {
    match record.get(primary_key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "<no key>".to_string(),
        Some(other) => other.to_string(),
    }
}
