//! Virtual environment provisioning
//!
//! Creates the configured venv from a base interpreter when the folder does
//! not exist yet. An existing folder is trusted as-is.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::LaunchError;
use crate::platform::{self, PlatformKind};
use crate::process::{CommandRunner, Invocation};

/// Default folder holding a portable Python distribution
pub const PORTABLE_ROOT: &str = "WPy";

/// Subfolders of the portable root that hold an interpreter start with this
const DISTRIBUTION_PREFIX: &str = "python-";

/// Interpreters tried on `PATH` when no portable distribution is present
const PATH_CANDIDATES: [&str; 2] = ["python3", "python"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    AlreadyPresent,
    Created,
}

/// Where the interpreter used to create the venv comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseInterpreter {
    /// Explicit path, no discovery
    Fixed(PathBuf),
    /// Scan a portable distribution root, falling back to `PATH` on Unix
    Discover { portable_root: PathBuf },
}

impl BaseInterpreter {
    pub fn resolve(
        &self,
        kind: PlatformKind,
        prefer_windowless: bool,
    ) -> Result<PathBuf, LaunchError> {
        match self {
            BaseInterpreter::Fixed(path) => Ok(path.clone()),
            BaseInterpreter::Discover { portable_root } => match kind {
                PlatformKind::Windows => {
                    find_portable_windows(portable_root, prefer_windowless)
                }
                PlatformKind::Unix => find_unix(portable_root),
            },
        }
    }
}

/// First `python-*` subfolder of the portable root, in lexical order
fn first_distribution(root: &Path) -> io::Result<Option<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(DISTRIBUTION_PREFIX))
        {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs.into_iter().next())
}

fn find_portable_windows(root: &Path, prefer_windowless: bool) -> Result<PathBuf, LaunchError> {
    let dist = first_distribution(root).map_err(|source| LaunchError::BaseInterpreterScan {
        root: root.to_path_buf(),
        source,
    })?;
    let dist = dist.ok_or_else(|| {
        LaunchError::BaseInterpreterNotFound(format!(
            "no {DISTRIBUTION_PREFIX}* folder in {}",
            root.display()
        ))
    })?;
    Ok(dist.join(platform::candidate_binary_name(
        PlatformKind::Windows,
        prefer_windowless,
    )))
}

fn find_unix(root: &Path) -> Result<PathBuf, LaunchError> {
    match first_distribution(root) {
        Ok(Some(dist)) => {
            let bin = dist.join("bin");
            if let Some(found) = PATH_CANDIDATES
                .iter()
                .map(|name| bin.join(name))
                .find(|path| path.is_file())
            {
                return Ok(found);
            }
        }
        Ok(None) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(LaunchError::BaseInterpreterScan {
                root: root.to_path_buf(),
                source,
            });
        }
    }

    PATH_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
        .ok_or_else(|| {
            LaunchError::BaseInterpreterNotFound(format!(
                "none of {} on PATH",
                PATH_CANDIDATES.join(", ")
            ))
        })
}

#[derive(Debug, Clone)]
pub struct Provisioner {
    kind: PlatformKind,
    base: BaseInterpreter,
}

impl Provisioner {
    pub fn new(kind: PlatformKind, base: BaseInterpreter) -> Self {
        Self { kind, base }
    }

    /// Make sure a venv exists at `venv_path`
    pub fn ensure(
        &self,
        venv_path: &Path,
        prefer_windowless: bool,
        runner: &mut dyn CommandRunner,
    ) -> Result<ProvisionOutcome, LaunchError> {
        match fs::metadata(venv_path) {
            Ok(_) => {
                info!(
                    "Venv directory {} already exists, skipping venv creation",
                    venv_path.display()
                );
                Ok(ProvisionOutcome::AlreadyPresent)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.create(venv_path, prefer_windowless, runner)?;
                Ok(ProvisionOutcome::Created)
            }
            Err(source) => Err(LaunchError::VenvCheck {
                path: venv_path.to_path_buf(),
                source,
            }),
        }
    }

    fn create(
        &self,
        venv_path: &Path,
        prefer_windowless: bool,
        runner: &mut dyn CommandRunner,
    ) -> Result<(), LaunchError> {
        let base = self.base.resolve(self.kind, prefer_windowless)?;
        let base = std::path::absolute(&base)
            .map_err(|source| LaunchError::Resolve { path: base, source })?;
        info!("Base Python binary path: {}", base.display());

        let invocation = Invocation::new(&base)
            .arg("-m")
            .arg("venv")
            .arg(venv_path.as_os_str());
        let report = runner.run(&invocation).map_err(|source| LaunchError::Spawn {
            program: base.clone(),
            source,
        })?;

        if !report.success() {
            return Err(LaunchError::VenvCreation {
                path: venv_path.to_path_buf(),
                code: report.code,
                stderr: report.stderr,
            });
        }

        info!("Created venv at {}", venv_path.display());
        Ok(())
    }
}
