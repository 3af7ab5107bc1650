//! Console logger setup and the persistent error log

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

/// Default directory for the error log, relative to the working directory
pub const LOG_DIR: &str = "logs";

const ERROR_LOG_FILE: &str = "launcher-error.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Initialize the console logger (`RUST_LOG` overrides the default level)
pub fn init() {
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Append-only error log under `<dir>/launcher-error.log`
#[derive(Debug, Clone)]
pub struct ErrorLog {
    dir: PathBuf,
}

impl ErrorLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(ERROR_LOG_FILE)
    }

    /// Append `message`, falling back to the console when the file cannot
    /// be written. Returns whether the line reached the file.
    pub fn report(&self, message: &str) -> bool {
        match self.append(message) {
            Ok(()) => true,
            Err(e) => {
                log::error!("{e:#}");
                false
            }
        }
    }

    /// Append one timestamped line. The file is opened and closed per call.
    pub fn append(&self, message: &str) -> Result<()> {
        self.append_at(Local::now(), message)
    }

    fn append_at(&self, at: DateTime<Local>, message: &str) -> Result<()> {
        ensure_dir(&self.dir)?;
        let path = self.path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Cannot open log file {}", path.display()))?;
        writeln!(file, "{}", format_line(at, message))
            .with_context(|| format!("Cannot write to log file {}", path.display()))?;
        Ok(())
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create log directory {}", dir.display()))
}

fn format_line(at: DateTime<Local>, message: &str) -> String {
    format!("{} {}", at.format(TIMESTAMP_FORMAT), message)
}
