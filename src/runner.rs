//! Installer runner
//!
//! The installer exits with [`SENTINEL_EXIT_CODE`] after it has installed its
//! own prerequisites and needs a fresh interpreter to continue. The runner
//! re-invokes it, at most [`MAX_RETRIES`] extra times.

use log::{info, warn};

use crate::error::LaunchError;
use crate::process::{CommandRunner, Invocation};

/// Exit code meaning "prerequisites installed, run me again"
pub const SENTINEL_EXIT_CODE: i32 = 99;

/// Extra attempts allowed after the first run
pub const MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub sentinel: i32,
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            sentinel: SENTINEL_EXIT_CODE,
            max_retries: MAX_RETRIES,
        }
    }
}

/// States of a single installer run
#[derive(Debug)]
pub enum RunState {
    Run,
    /// Sentinel received; holds the number of retries used so far
    RetryPending(u32),
    Success,
    Failed(LaunchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Total invocations, first run included
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InstallerRunner {
    policy: RetryPolicy,
}

impl InstallerRunner {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Run `invocation` until it succeeds, fails, or exhausts its retries
    pub fn run(
        &self,
        runner: &mut dyn CommandRunner,
        invocation: &Invocation,
    ) -> Result<RunSummary, LaunchError> {
        let mut attempts = 0;
        let mut state = RunState::Run;

        loop {
            state = match state {
                RunState::Run => {
                    attempts += 1;
                    self.attempt(runner, invocation, 0)
                }
                RunState::RetryPending(retries) => {
                    attempts += 1;
                    warn!(
                        "Installer requested a restart, rerunning ({retries}/{})",
                        self.policy.max_retries
                    );
                    self.attempt(runner, invocation, retries)
                }
                RunState::Success => {
                    info!("Installer finished after {attempts} attempt(s)");
                    return Ok(RunSummary { attempts });
                }
                RunState::Failed(err) => return Err(err),
            };
        }
    }

    /// Spawn once and map the exit onto the next state
    fn attempt(
        &self,
        runner: &mut dyn CommandRunner,
        invocation: &Invocation,
        retries: u32,
    ) -> RunState {
        let report = match runner.run(invocation) {
            Ok(report) => report,
            Err(source) => {
                return RunState::Failed(LaunchError::Spawn {
                    program: invocation.program.clone(),
                    source,
                });
            }
        };

        match report.code {
            Some(0) => RunState::Success,
            Some(code) if code == self.policy.sentinel => {
                if retries < self.policy.max_retries {
                    RunState::RetryPending(retries + 1)
                } else {
                    RunState::Failed(LaunchError::RetriesExhausted {
                        attempts: retries + 1,
                    })
                }
            }
            code => RunState::Failed(LaunchError::InstallerFailed {
                code,
                stderr: report.stderr,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ExitReport;
    use std::collections::VecDeque;
    use std::io;

    /// Replays a fixed sequence of exit codes
    struct Scripted {
        codes: VecDeque<Option<i32>>,
        calls: u32,
    }

    impl Scripted {
        fn new(codes: &[Option<i32>]) -> Self {
            Self {
                codes: codes.iter().copied().collect(),
                calls: 0,
            }
        }
    }

    impl CommandRunner for Scripted {
        fn run(&mut self, _invocation: &Invocation) -> io::Result<ExitReport> {
            self.calls += 1;
            let code = self.codes.pop_front().expect("runner called too often");
            Ok(ExitReport {
                code,
                stderr: format!("attempt {}", self.calls),
            })
        }

        fn spawn_detached(&mut self, _invocation: &Invocation) -> io::Result<u32> {
            unreachable!("installer runner never detaches")
        }
    }

    fn invocation() -> Invocation {
        Invocation::new("/venv/bin/python").arg("/app/install.py")
    }

    #[test]
    fn immediate_success_runs_once() {
        let mut runner = Scripted::new(&[Some(0)]);
        let summary = InstallerRunner::default()
            .run(&mut runner, &invocation())
            .unwrap();
        assert_eq!(summary.attempts, 1);
        assert_eq!(runner.calls, 1);
    }

    #[test]
    fn sentinel_k_times_then_success_runs_k_plus_one() {
        for k in 1..=MAX_RETRIES as usize {
            let mut codes = vec![Some(SENTINEL_EXIT_CODE); k];
            codes.push(Some(0));
            let mut runner = Scripted::new(&codes);

            let summary = InstallerRunner::default()
                .run(&mut runner, &invocation())
                .unwrap();
            assert_eq!(summary.attempts as usize, k + 1);
            assert_eq!(runner.calls as usize, k + 1);
        }
    }

    #[test]
    fn endless_sentinel_fails_after_four_invocations() {
        let mut runner = Scripted::new(&[Some(SENTINEL_EXIT_CODE); 10]);
        let err = InstallerRunner::default()
            .run(&mut runner, &invocation())
            .unwrap_err();
        assert!(matches!(err, LaunchError::RetriesExhausted { attempts: 4 }));
        assert_eq!(runner.calls, 4);
    }

    #[test]
    fn other_exit_code_fails_without_retry() {
        let mut runner = Scripted::new(&[Some(2), Some(0)]);
        let err = InstallerRunner::default()
            .run(&mut runner, &invocation())
            .unwrap_err();
        match err {
            LaunchError::InstallerFailed { code, stderr } => {
                assert_eq!(code, Some(2));
                assert_eq!(stderr, "attempt 1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(runner.calls, 1);
    }

    #[test]
    fn failure_after_sentinel_reports_latest_stderr() {
        let mut runner = Scripted::new(&[Some(SENTINEL_EXIT_CODE), Some(1)]);
        let err = InstallerRunner::default()
            .run(&mut runner, &invocation())
            .unwrap_err();
        assert!(matches!(
            err,
            LaunchError::InstallerFailed { code: Some(1), ref stderr } if stderr == "attempt 2"
        ));
    }

    #[test]
    fn signal_termination_is_fatal() {
        let mut runner = Scripted::new(&[None]);
        let err = InstallerRunner::default()
            .run(&mut runner, &invocation())
            .unwrap_err();
        assert!(matches!(err, LaunchError::InstallerFailed { code: None, .. }));
    }

    #[test]
    fn custom_policy_is_honoured() {
        let policy = RetryPolicy {
            sentinel: 42,
            max_retries: 1,
        };
        let mut runner = Scripted::new(&[Some(42), Some(42), Some(0)]);
        let err = InstallerRunner::new(policy)
            .run(&mut runner, &invocation())
            .unwrap_err();
        assert!(matches!(err, LaunchError::RetriesExhausted { attempts: 2 }));
        assert_eq!(runner.calls, 2);
    }

    #[test]
    fn spawn_failure_is_reported() {
        struct Broken;
        impl CommandRunner for Broken {
            fn run(&mut self, _: &Invocation) -> io::Result<ExitReport> {
                Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
            }
            fn spawn_detached(&mut self, _: &Invocation) -> io::Result<u32> {
                unreachable!()
            }
        }

        let err = InstallerRunner::default()
            .run(&mut Broken, &invocation())
            .unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { .. }));
    }
}
