// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result of running one command against the cluster.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output shown for a successful command that printed nothing.
pub const NO_OUTPUT_PLACEHOLDER: &str = "Command executed successfully with no output.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Command text actually run (after rewriting)
    pub command: String,
    pub timestamp: DateTime<Utc>,
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    /// Human-readable output derived from the captured streams
    pub output: String,
}

impl ExecutionRecord {
    /// Build a record from captured streams, deriving the display output.
    ///
    /// Success shows trimmed stdout (or the placeholder when empty). Failure
    /// shows both streams so the error text reaches the report.
    pub fn new(
        command: impl Into<String>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        success: bool,
    ) -> Self {
        let stdout = stdout.into();
        let stderr = stderr.into();
        let output = if success {
            let trimmed = stdout.trim();
            if trimmed.is_empty() {
                NO_OUTPUT_PLACEHOLDER.to_string()
            } else {
                trimmed.to_string()
            }
        } else {
            format!("STDOUT: {}\nSTDERR: {}", stdout.trim(), stderr.trim())
        };
        Self { command: command.into(), timestamp: Utc::now(), stdout, stderr, success, output }
    }

    /// A command that never produced an exit status (spawn failure, timeout).
    pub fn failed(command: impl Into<String>, message: &str) -> Self {
        Self {
            command: command.into(),
            timestamp: Utc::now(),
            stdout: String::new(),
            stderr: message.to_string(),
            success: false,
            output: format!("error: {}", message),
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.success {
            "SUCCESS"
        } else {
            "FAILED"
        }
    }

    /// Report block: `Command: <cmd>\nOutput: <output>`
    pub fn render(&self) -> String {
        format!("Command: {}\nOutput: {}", self.command, self.output)
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
