//! Bootstrap launcher library
//!
//! Locates a Python interpreter, provisions the configured virtual
//! environment when it is missing, and runs the installer script, rerunning
//! it while it asks for a restart.

pub mod config;
pub mod error;
pub mod launcher;
pub mod locator;
pub mod logging;
pub mod platform;
pub mod process;
pub mod provision;
pub mod runner;

pub use config::LauncherConfig;
pub use error::{ErrorKind, LaunchError};
pub use launcher::{InstallerOutcome, LaunchOptions, LaunchOutcome, Launcher};
pub use locator::InterpreterLocator;
pub use platform::PlatformKind;
pub use process::{CommandRunner, ExitReport, Invocation, SystemRunner};
pub use provision::{BaseInterpreter, ProvisionOutcome, Provisioner};
pub use runner::{InstallerRunner, MAX_RETRIES, RetryPolicy, RunSummary, SENTINEL_EXIT_CODE};
