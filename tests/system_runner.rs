#![cfg(unix)]

use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;

use tempfile::TempDir;
use venv_launcher::{
    InstallerOutcome, LaunchError, LaunchOptions, Launcher, PlatformKind, ProvisionOutcome,
    SystemRunner,
};

/// The venv's `python` is a symlink to `/bin/sh`, so `install.py` runs as a
/// shell script. It counts its runs in `runs.txt` and exits 99 until it has
/// run `restarts + 1` times.
fn fake_venv(root: &Path, restarts: u32) {
    link_sh(&root.join("venv"));
    let script = format!(
        r#"counter="$(dirname "$0")/runs.txt"
echo run >> "$counter"
runs=$(wc -l < "$counter" | tr -d ' ')
if [ "$runs" -le {restarts} ]; then
  exit 99
fi
exit 0
"#
    );
    fs::write(root.join("install.py"), script).unwrap();
}

fn link_sh(venv: &Path) {
    let bin = venv.join("bin");
    fs::create_dir_all(&bin).unwrap();
    symlink("/bin/sh", bin.join("python")).unwrap();
}

fn runs(dir: &Path) -> usize {
    fs::read_to_string(dir.join("runs.txt"))
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("repo.json"), r#"{"venv_folder": "venv"}"#).unwrap();
    fs::write(tmp.path().join("install.py"), "").unwrap();
    tmp
}

fn options(dir: &Path) -> LaunchOptions {
    let mut opts = LaunchOptions::new(dir);
    opts.platform = PlatformKind::Unix;
    opts
}

#[test]
fn real_child_restarts_until_done() {
    let tmp = workspace();
    fake_venv(tmp.path(), 2);

    let outcome = Launcher::new(options(tmp.path()))
        .run(&mut SystemRunner)
        .unwrap();

    assert_eq!(outcome.provision, ProvisionOutcome::AlreadyPresent);
    assert!(matches!(
        outcome.installer,
        InstallerOutcome::Completed(summary) if summary.attempts == 3
    ));
    assert_eq!(runs(tmp.path()), 3);
}

#[test]
fn real_child_stuck_on_sentinel_runs_four_times() {
    let tmp = workspace();
    fake_venv(tmp.path(), 100);

    let err = Launcher::new(options(tmp.path()))
        .run(&mut SystemRunner)
        .unwrap_err();

    assert!(matches!(err, LaunchError::RetriesExhausted { attempts: 4 }));
    assert_eq!(runs(tmp.path()), 4);
}

#[test]
fn real_child_stderr_is_captured() {
    let tmp = workspace();
    link_sh(&tmp.path().join("venv"));
    fs::write(
        tmp.path().join("install.py"),
        "echo 'ModuleNotFoundError: dulwich' >&2\nexit 3\n",
    )
    .unwrap();

    let err = Launcher::new(options(tmp.path()))
        .run(&mut SystemRunner)
        .unwrap_err();

    assert_eq!(err.exit_code(), 3);
    assert!(err.to_string().contains("ModuleNotFoundError: dulwich"));
}
