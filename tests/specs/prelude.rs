// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for CLI specs.

use std::path::PathBuf;
use std::sync::OnceLock;
use tempfile::TempDir;

/// Path to the `kp` binary, building it once if the workspace build has not.
fn binary() -> PathBuf {
    static BINARY: OnceLock<PathBuf> = OnceLock::new();
    BINARY
        .get_or_init(|| {
            let path = assert_cmd::cargo::cargo_bin("kp");
            if !path.exists() {
                let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
                let status = std::process::Command::new(cargo)
                    .args(["build", "--quiet", "-p", "kp", "--bin", "kp"])
                    .status()
                    .expect("cargo build runs");
                assert!(status.success(), "building kp failed");
            }
            path
        })
        .clone()
}

/// A scratch directory the binary runs in, with its own log directory and
/// no inherited configuration.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self { dir: TempDir::new().unwrap() }
    }

    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).unwrap_or_default()
    }

    pub fn cli(&self) -> CliBuilder {
        let mut cmd = assert_cmd::Command::new(binary());
        cmd.current_dir(self.dir.path())
            .env("NO_COLOR", "1")
            .env("KP_LOG_DIR", self.dir.path().join("logs"))
            .env_remove("KP_CONFIG")
            .env_remove("KP_LLM_API_KEY")
            .env_remove("KP_POLICY_URL")
            .env_remove("KP_LOG");
        CliBuilder { cmd, _sandbox: None }
    }
}

/// `kp` in a fresh sandbox that lives as long as the builder.
pub fn cli() -> CliBuilder {
    let sandbox = Sandbox::new();
    let builder = sandbox.cli();
    CliBuilder { _sandbox: Some(sandbox), ..builder }
}

pub struct CliBuilder {
    cmd: assert_cmd::Command,
    _sandbox: Option<Sandbox>,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    pub fn passes(mut self) -> Outcome {
        Outcome { output: self.cmd.assert().success().get_output().clone() }
    }

    pub fn fails_with(mut self, code: i32) -> Outcome {
        Outcome { output: self.cmd.assert().code(code).get_output().clone() }
    }
}

pub struct Outcome {
    output: std::process::Output,
}

impl Outcome {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(needle), "stdout missing {needle:?}:\n{stdout}");
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(needle), "stderr missing {needle:?}:\n{stderr}");
        self
    }
}
