// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single cluster command as it moves through a pipeline run.

use crate::record::ExecutionRecord;
use serde::{Deserialize, Serialize};

/// Policy verdict for a command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    #[default]
    Pending,
    Allowed,
    Denied,
}

crate::simple_display! {
    Verdict {
        Pending => "pending",
        Allowed => "allowed",
        Denied => "denied",
    }
}

/// Execution progress of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Pending,
    Rewritten,
    Executed { success: bool },
}

/// One executable command line.
///
/// Created by the extractor, then mutated by the policy gate, rewriter and
/// executor in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub raw: String,
    /// Text after resource-name repair, when it differs from `raw`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewritten: Option<String>,
    #[serde(default)]
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denial_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ExecutionRecord>,
    /// Set once the rewriter has looked at the command, even if it left it unchanged
    #[serde(skip)]
    rewrite_applied: bool,
}

impl Command {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            rewritten: None,
            verdict: Verdict::Pending,
            denial_reason: None,
            result: None,
            rewrite_applied: false,
        }
    }

    /// The text that will actually run.
    pub fn text(&self) -> &str {
        self.rewritten.as_deref().unwrap_or(&self.raw)
    }

    pub fn allow(&mut self) {
        self.verdict = Verdict::Allowed;
        self.denial_reason = None;
    }

    pub fn deny(&mut self, reason: impl Into<String>) {
        self.verdict = Verdict::Denied;
        self.denial_reason = Some(reason.into());
    }

    pub fn is_allowed(&self) -> bool {
        self.verdict == Verdict::Allowed
    }

    /// Record the rewriter's output. Identical text leaves `rewritten` unset.
    pub fn apply_rewrite(&mut self, text: String) {
        self.rewritten = (text != self.raw).then_some(text);
        self.rewrite_applied = true;
    }

    pub fn record(&mut self, record: ExecutionRecord) {
        self.result = Some(record);
    }

    pub fn state(&self) -> CommandState {
        match &self.result {
            Some(record) => CommandState::Executed { success: record.success },
            None if self.rewrite_applied => CommandState::Rewritten,
            None => CommandState::Pending,
        }
    }
}

impl From<&str> for Command {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Command {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
