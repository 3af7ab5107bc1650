use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::{Error as _, Unexpected};
use serde_json::Value;

use crate::error::LaunchError;

/// Default config file name, relative to the launcher's working directory
pub const CONFIG_FILE: &str = "repo.json";

/// Launcher configuration as stored in `repo.json`.
///
/// Absent fields fall back to zero values (`false`, empty path); unknown
/// fields belong to the installer script and are ignored here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Prefer the windowless interpreter (`pythonw.exe`) on Windows
    pub use_pythonw: bool,
    /// Folder holding the target virtual environment
    pub venv_folder: PathBuf,
}

impl LauncherConfig {
    /// Read and parse the config file at `path`
    pub fn load(path: &Path) -> Result<Self, LaunchError> {
        let raw = fs::read_to_string(path).map_err(|source| LaunchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_json(&raw).map_err(|source| LaunchError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}: {cfg:?}", path.display());
        Ok(cfg)
    }

    /// Parse a config document. Only a JSON object is accepted; serde would
    /// otherwise read a sequence positionally into the struct.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(serde_json::Error::invalid_type(
                unexpected(&value),
                &"a JSON object",
            ));
        }
        serde_json::from_value(value)
    }

    /// Venv folder resolved against `base_dir` when relative.
    ///
    /// An empty folder would make the launcher walk (or create a venv in) its
    /// own working directory, so it is rejected.
    pub fn venv_path(&self, base_dir: &Path) -> Result<PathBuf, LaunchError> {
        if self.venv_folder.as_os_str().is_empty() {
            return Err(LaunchError::ConfigInvalid(
                "`venv_folder` is empty".to_string(),
            ));
        }
        Ok(base_dir.join(&self.venv_folder))
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}
