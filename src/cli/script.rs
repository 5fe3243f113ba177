//! Action scripts: the untyped actions fed to the store.

use serde_json::Value;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Script line {line} is not valid JSON: {source}")]
    ParseError {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One action from a script, with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    /// Line number for line scripts, 1-based element index for array scripts.
    pub line: usize,
    pub action: Value,
}

/// Read a script from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_script(path: Option<&Path>) -> Result<String, ScriptError> {
    match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|source| ScriptError::ReadError {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| ScriptError::ReadError {
                    path: PathBuf::from("-"),
                    source,
                })?;
            Ok(text)
        }
    }
}

/// Split a script into actions.
///
/// A script that is one JSON array as a whole yields its elements. Otherwise
/// each non-blank line holds one JSON value; lines starting with `#` are
/// comments. Values are not checked here: shape errors are the store's job.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    if text.trim_start().starts_with('[') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text) {
            return Ok(items
                .into_iter()
                .enumerate()
                .map(|(index, action)| ScriptStep {
                    line: index + 1,
                    action,
                })
                .collect());
        }
    }

    let mut steps = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let line = index + 1;
        let action = serde_json::from_str(trimmed)
            .map_err(|source| ScriptError::ParseError { line, source })?;
        steps.push(ScriptStep { line, action });
    }
    Ok(steps)
}
