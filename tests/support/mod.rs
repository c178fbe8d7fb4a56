//! Test support utilities for stackform integration tests.
//!
//! Provides an isolated deployment directory per test plus helpers to
//! invoke the binary and assert on its outcome.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated test deployment.
///
/// Each test gets its own temporary directory holding the manifest, the
/// environment file, templates, and rendered output. No process-global
/// state is mutated — child processes use `.current_dir()` so tests run
/// safely in parallel.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    /// Create an empty test deployment directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Create a deployment with a manifest and environment file already
    /// in place.
    pub fn with_files(manifest: &str, env: &str) -> Self {
        let t = Self::new();
        t.write("stackform.toml", manifest);
        t.write("stack.env", env);
        t
    }

    /// Write a file relative to the deployment directory, creating
    /// parent directories as needed.
    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        std::fs::write(path, contents).expect("failed to write test file");
    }

    /// Read a file relative to the deployment directory.
    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(rel)).expect("failed to read test file")
    }

    /// Absolute path of a file relative to the deployment directory.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Whether a file exists relative to the deployment directory.
    pub fn exists(&self, rel: &str) -> bool {
        self.dir.path().join(rel).exists()
    }

    /// Backup files for a given target, sibling `<name>.<stamp>.bak`.
    pub fn backups_of(&self, rel: &str) -> Vec<PathBuf> {
        let target = self.dir.path().join(rel);
        let name = target.file_name().unwrap().to_string_lossy().into_owned();
        let parent = target.parent().unwrap_or(Path::new("."));

        let mut backups: Vec<PathBuf> = std::fs::read_dir(parent)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| {
                        p.file_name()
                            .map(|n| {
                                let n = n.to_string_lossy();
                                n.starts_with(&format!("{}.", name)) && n.ends_with(".bak")
                            })
                            .unwrap_or(false)
                    })
                    .collect()
            })
            .unwrap_or_default();
        backups.sort();
        backups
    }

    /// Create a stackform command rooted in the deployment directory.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("stackform").expect("failed to find stackform binary");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `stackform run`.
    pub fn run(&self) -> Output {
        self.cmd()
            .arg("run")
            .output()
            .expect("failed to run stackform run")
    }

    /// Shortcut for `stackform check`.
    pub fn check(&self) -> Output {
        self.cmd()
            .arg("check")
            .output()
            .expect("failed to run stackform check")
    }
}

/// Assert the command succeeded, with stderr in the failure message.
pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "expected success, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Assert the command failed.
pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "expected failure, stdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
}

/// Stdout as a string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr as a string.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Assert stdout contains a substring.
pub fn assert_stdout_contains(output: &Output, needle: &str) {
    let out = stdout(output);
    assert!(
        out.contains(needle),
        "stdout missing {:?}, was: {}",
        needle,
        out
    );
}

/// Assert stderr contains a substring.
pub fn assert_stderr_contains(output: &Output, needle: &str) {
    let err = stderr(output);
    assert!(
        err.contains(needle),
        "stderr missing {:?}, was: {}",
        needle,
        err
    );
}
