//! End-to-end launch sequence
//!
//! config → venv provisioning → interpreter discovery → installer run.
//! Relative paths are resolved against [`LaunchOptions::base_dir`].

use std::path::{Path, PathBuf};

use log::info;

use crate::config::{CONFIG_FILE, LauncherConfig};
use crate::error::LaunchError;
use crate::locator::InterpreterLocator;
use crate::platform::PlatformKind;
use crate::process::{CommandRunner, Invocation};
use crate::provision::{BaseInterpreter, PORTABLE_ROOT, ProvisionOutcome, Provisioner};
use crate::runner::{InstallerRunner, RetryPolicy, RunSummary};

/// Installer script run by the venv interpreter
pub const INSTALL_SCRIPT: &str = "install.py";

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub base_dir: PathBuf,
    pub config_file: PathBuf,
    pub script: PathBuf,
    pub portable_root: PathBuf,
    /// Skip base interpreter discovery and create the venv with this one
    pub base_python: Option<PathBuf>,
    /// Start the installer and return without waiting for it
    pub detach: bool,
    pub platform: PlatformKind,
    pub retry: RetryPolicy,
}

impl LaunchOptions {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            config_file: PathBuf::from(CONFIG_FILE),
            script: PathBuf::from(INSTALL_SCRIPT),
            portable_root: PathBuf::from(PORTABLE_ROOT),
            base_python: None,
            detach: false,
            platform: PlatformKind::current(),
            retry: RetryPolicy::default(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallerOutcome {
    Completed(RunSummary),
    Detached { pid: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub provision: ProvisionOutcome,
    pub installer: InstallerOutcome,
}

#[derive(Debug, Clone)]
pub struct Launcher {
    options: LaunchOptions,
}

impl Launcher {
    pub fn new(options: LaunchOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, runner: &mut dyn CommandRunner) -> Result<LaunchOutcome, LaunchError> {
        let opts = &self.options;
        info!("Started!");

        let config = LauncherConfig::load(&opts.resolve(&opts.config_file))?;
        let venv = config.venv_path(&opts.base_dir)?;

        let base = match &opts.base_python {
            Some(path) => BaseInterpreter::Fixed(opts.resolve(path)),
            None => BaseInterpreter::Discover {
                portable_root: opts.resolve(&opts.portable_root),
            },
        };
        let provision =
            Provisioner::new(opts.platform, base).ensure(&venv, config.use_pythonw, runner)?;

        let interpreter = InterpreterLocator::new(&venv, opts.platform, config.use_pythonw)
            .locate_required()?;
        let interpreter = absolute(&interpreter)?;
        let script = absolute(&opts.resolve(&opts.script))?;
        info!("Python script path: {}", script.display());
        info!("Venv Python binary path: {}", interpreter.display());

        let invocation = Invocation::new(interpreter).arg(script.into_os_string());
        let installer = if opts.detach {
            let pid = runner
                .spawn_detached(&invocation)
                .map_err(|source| LaunchError::Spawn {
                    program: invocation.program.clone(),
                    source,
                })?;
            info!("Installer started in the background (pid {pid})");
            InstallerOutcome::Detached { pid }
        } else {
            InstallerOutcome::Completed(InstallerRunner::new(opts.retry).run(runner, &invocation)?)
        };

        Ok(LaunchOutcome {
            provision,
            installer,
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf, LaunchError> {
    std::path::absolute(path).map_err(|source| LaunchError::Resolve {
        path: path.to_path_buf(),
        source,
    })
}
