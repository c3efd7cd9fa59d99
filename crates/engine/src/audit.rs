// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only audit logs for cluster execution and policy decisions.
//!
//! Each append opens, writes and closes the file. Failures are reported
//! through tracing and never reach the caller.

use chrono::{DateTime, Utc};
use kp_core::ExecutionRecord;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const EXECUTION_LOG_FILE: &str = "cluster_execution.log";
pub const POLICY_LOG_FILE: &str = "policy.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SEPARATOR_WIDTH: usize = 50;

/// Both audit logs, rooted in one directory.
#[derive(Debug, Clone)]
pub struct AuditLogs {
    pub execution: ExecutionLog,
    pub policy: PolicyLog,
}

impl AuditLogs {
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            execution: ExecutionLog::new(dir.join(EXECUTION_LOG_FILE)),
            policy: PolicyLog::new(dir.join(POLICY_LOG_FILE)),
        }
    }
}

/// Log of every command run against the cluster.
///
/// Record format:
/// ```text
/// [2026-01-30 08:14:09] [SUCCESS] Executed: kubectl get pods
/// <output>
/// --------------------------------------------------
/// ```
#[derive(Debug, Clone)]
pub struct ExecutionLog {
    path: PathBuf,
}

impl ExecutionLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &ExecutionRecord) {
        let entry = format!(
            "[{}] [{}] Executed: {}\n{}\n{}\n",
            record.timestamp.format(TIMESTAMP_FORMAT),
            record.status_label(),
            record.command,
            record.output,
            "-".repeat(SEPARATOR_WIDTH),
        );
        if let Err(e) = append_to(&self.path, &entry) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to write execution log"
            );
        }
    }
}

/// One line per policy decision or failed policy query.
#[derive(Debug, Clone)]
pub struct PolicyLog {
    path: PathBuf,
}

impl PolicyLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format: `<ts> - INFO - Policy decision for command '<cmd>': <payload> | Reason: <reason>`
    pub fn decision(&self, command: &str, payload: &str, reason: &str) {
        let line = format!(
            "{} - INFO - Policy decision for command '{command}': {payload} | Reason: {reason}\n",
            timestamp(Utc::now()),
        );
        self.write(&line);
    }

    /// Format: `<ts> - ERROR - Policy check failed for command '<cmd>': <error>`
    pub fn failure(&self, command: &str, error: &str) {
        let line = format!(
            "{} - ERROR - Policy check failed for command '{command}': {error}\n",
            timestamp(Utc::now()),
        );
        self.write(&line);
    }

    fn write(&self, line: &str) {
        if let Err(e) = append_to(&self.path, line) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to write policy log"
            );
        }
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn append_to(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
