// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential command executor

use crate::audit::ExecutionLog;
use crate::registry::ResourceRegistry;
use crate::rewrite::Rewriter;
use crate::text::{self, has_error_marker};
use kp_adapters::CommandRunner;
use kp_core::{Command, ExecutionRecord, Verdict};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Outcome of one executed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub records: Vec<ExecutionRecord>,
    /// The batch stopped early because the run was cancelled
    pub cancelled: bool,
}

impl ExecutionReport {
    /// `Command: ..\nOutput: ..` blocks separated by a blank line.
    pub fn render(&self) -> String {
        self.records.iter().map(ExecutionRecord::render).collect::<Vec<_>>().join("\n\n")
    }

    pub fn has_error(&self) -> bool {
        has_error_marker(&self.render())
    }

    pub fn error_summary(&self) -> String {
        text::error_summary(&self.render())
    }

    pub fn all_succeeded(&self) -> bool {
        self.records.iter().all(|r| r.success)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Runs commands one at a time against the cluster.
///
/// Each command is rewritten against the registry, run, audited, and, when it
/// was a successful listing, mined for resource names before the next one
/// starts. A failing command never stops the batch.
#[derive(Debug, Clone)]
pub struct Executor<R> {
    runner: R,
    registry: ResourceRegistry,
    rewriter: Rewriter,
    log: ExecutionLog,
    keyword: String,
}

impl<R: CommandRunner> Executor<R> {
    pub fn new(
        runner: R,
        registry: ResourceRegistry,
        log: ExecutionLog,
        keyword: impl Into<String>,
    ) -> Self {
        let keyword = keyword.into();
        let rewriter = Rewriter::new(registry.clone(), keyword.clone());
        Self { runner, registry, rewriter, log, keyword }
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Execute every command not denied by policy, in order, pausing `delay`
    /// between commands.
    pub async fn execute(
        &self,
        commands: &mut [Command],
        delay: Duration,
        cancel: &CancellationToken,
    ) -> ExecutionReport {
        let mut report = ExecutionReport::default();
        let runnable = commands.iter_mut().filter(|c| c.verdict != Verdict::Denied);

        for (n, command) in runnable.enumerate() {
            if n > 0 && !delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        report.cancelled = true;
                        break;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            let text = self.rewriter.rewrite(&command.raw);
            command.apply_rewrite(text);
            let Some(record) = self.run_one(command.text(), cancel).await else {
                report.cancelled = true;
                break;
            };
            command.record(record.clone());
            report.records.push(record);
        }

        report
    }

    /// Run, audit and learn from a single command. `None` when cancelled.
    async fn run_one(&self, text: &str, cancel: &CancellationToken) -> Option<ExecutionRecord> {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            outcome = self.runner.run(text) => outcome,
        };

        let record = match outcome {
            Ok(output) => {
                let success = output.success();
                ExecutionRecord::new(text, output.stdout, output.stderr, success)
            }
            Err(e) => {
                tracing::warn!(command = text, error = %e, "command did not complete");
                ExecutionRecord::failed(text, &e.to_string())
            }
        };
        tracing::info!(command = text, success = record.success, "executed command");

        self.log.append(&record);
        if record.success {
            self.learn(text, &record.stdout);
        }
        Some(record)
    }

    fn learn(&self, command: &str, stdout: &str) {
        let Some(kind) = text::listing_kind(command, &self.keyword) else {
            return;
        };
        let names = text::parse_listing_names(stdout);
        if names.is_empty() {
            return;
        }
        let added = self.registry.observe(kind.clone(), names);
        tracing::debug!(kind = %kind, added, "observed resource names");
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
