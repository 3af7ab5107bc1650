//! Child process seam
//!
//! The provisioner and installer runner only see [`CommandRunner`], so their
//! control flow can be driven by scripted runners in tests.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::platform;

/// One child process to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        platform::hide_console(&mut cmd);
        cmd
    }
}

/// Outcome of a child that ran to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitReport {
    /// `None` when the child was terminated by a signal
    pub code: Option<i32>,
    pub stderr: String,
}

impl ExitReport {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait CommandRunner {
    /// Run to completion, capturing standard error
    fn run(&mut self, invocation: &Invocation) -> io::Result<ExitReport>;

    /// Start without waiting; returns the child pid
    fn spawn_detached(&mut self, invocation: &Invocation) -> io::Result<u32>;
}

/// Runs invocations as real child processes
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> io::Result<ExitReport> {
        let output = invocation
            .command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !stderr.is_empty() {
            log::debug!("{} stderr: {}", invocation.program.display(), stderr.trim_end());
        }

        Ok(ExitReport {
            code: output.status.code(),
            stderr,
        })
    }

    fn spawn_detached(&mut self, invocation: &Invocation) -> io::Result<u32> {
        let child = invocation
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(child.id())
    }
}
