mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use venv_launcher::logging::{self, ErrorLog};
use venv_launcher::{LaunchOptions, Launcher, SystemRunner};

fn main() {
    logging::init();

    let args = cli::Args::parse();

    let base_dir = match resolve_workdir(args.workdir.clone()) {
        Ok(dir) => dir,
        Err(e) => {
            // No base directory to anchor the log under; use the raw log dir
            ErrorLog::new(&args.log_dir).report(&format!("{e:#}"));
            error!("{e:#}");
            std::process::exit(1);
        }
    };

    let mut options = LaunchOptions::new(&base_dir);
    options.config_file = args.config;
    options.script = args.script;
    options.portable_root = args.portable_root;
    options.base_python = args.base_python;
    options.detach = args.detach;

    let error_log = ErrorLog::new(base_dir.join(&args.log_dir));

    // Single exit point for every launcher failure
    if let Err(e) = Launcher::new(options).run(&mut SystemRunner) {
        error_log.report(&e.to_string());
        error!("[{}] {e}", e.kind());
        std::process::exit(e.exit_code());
    }
}

fn resolve_workdir(workdir: Option<PathBuf>) -> Result<PathBuf> {
    match workdir {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().context("Cannot determine current directory"),
    }
}
