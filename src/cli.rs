use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Provision a Python venv and run the installer script")]
pub struct Args {
    /// Directory that relative paths are resolved against (default: current directory)
    #[arg(long, short = 'C')]
    pub workdir: Option<PathBuf>,

    /// Path to the JSON configuration file
    #[arg(long, short = 'c', default_value = venv_launcher::config::CONFIG_FILE)]
    pub config: PathBuf,

    /// Installer script run with the venv interpreter
    #[arg(long, default_value = venv_launcher::launcher::INSTALL_SCRIPT)]
    pub script: PathBuf,

    /// Portable Python distribution scanned for a base interpreter
    #[arg(long, default_value = venv_launcher::provision::PORTABLE_ROOT)]
    pub portable_root: PathBuf,

    /// Create the venv with this interpreter instead of discovering one
    #[arg(long)]
    pub base_python: Option<PathBuf>,

    /// Directory for the persistent error log
    #[arg(long, default_value = venv_launcher::logging::LOG_DIR)]
    pub log_dir: PathBuf,

    /// Start the installer and exit without waiting (no restart handling)
    #[arg(long)]
    pub detach: bool,
}
