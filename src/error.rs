//! Launcher error taxonomy
//!
//! Every failure site in the launcher maps to exactly one variant. Nothing in
//! the library exits the process: errors travel back to `main`, which writes
//! the log line and picks the exit status via [`LaunchError::exit_code`].

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Broad failure category, prefixed to console error records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Discovery,
    Provisioning,
    Installer,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Config => "config",
            ErrorKind::Discovery => "discovery",
            ErrorKind::Provisioning => "provisioning",
            ErrorKind::Installer => "installer",
        })
    }
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Error reading {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error parsing {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Error walking the path {}: {source}", root.display())]
    Traversal {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Python binary not found under {}", root.display())]
    InterpreterNotFound { root: PathBuf },

    #[error("Cannot resolve absolute path for {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error checking venv directory {}: {source}", path.display())]
    VenvCheck {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error reading base interpreter root {}: {source}", root.display())]
    BaseInterpreterScan {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No base Python interpreter available to create the venv ({0})")]
    BaseInterpreterNotFound(String),

    #[error("Failed to create new venv at {}: {}", path.display(), describe_exit(*code, stderr))]
    VenvCreation {
        path: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("install script error: {}", describe_exit(*code, stderr))]
    InstallerFailed { code: Option<i32>, stderr: String },

    #[error("install script kept requesting a restart after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

impl LaunchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigRead { .. } | Self::ConfigParse { .. } | Self::ConfigInvalid(_) => {
                ErrorKind::Config
            }
            Self::Traversal { .. } | Self::InterpreterNotFound { .. } | Self::Resolve { .. } => {
                ErrorKind::Discovery
            }
            Self::VenvCheck { .. }
            | Self::BaseInterpreterScan { .. }
            | Self::BaseInterpreterNotFound(_)
            | Self::VenvCreation { .. } => ErrorKind::Provisioning,
            Self::Spawn { .. } | Self::InstallerFailed { .. } | Self::RetriesExhausted { .. } => {
                ErrorKind::Installer
            }
        }
    }

    /// Process exit status for this failure
    ///
    /// A failing installer's own non-zero code is forwarded; everything else
    /// exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InstallerFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn describe_exit(code: Option<i32>, stderr: &str) -> String {
    let status = match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    };
    let stderr = stderr.trim();
    if stderr.is_empty() {
        status
    } else {
        format!("{status}: {stderr}")
    }
}
