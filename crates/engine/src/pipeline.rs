// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline orchestrator: one instruction from reasoning to final report.
//!
//! A run is an explicit state machine stepped in a loop. Every state that
//! produces user-visible progress sends a [`StageEvent`] before advancing,
//! and the run always ends with exactly one `final` event.

use crate::executor::{ExecutionReport, Executor};
use crate::gate::PolicyGate;
use crate::registry::ResourceRegistry;
use crate::text::{extract_steps, CommandExtractor, DEFAULT_KEYWORD};
use kp_adapters::{CommandRunner, GenerationError, Generator, PolicyAdapter, RefineRequest};
use kp_core::{Command, PipelineRun, Stage, StageEvent};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

pub const NO_COMMANDS: &str = "No valid Kubernetes commands found.";
pub const UNABLE_TO_REFINE: &str = "Unable to refine commands after error.";
pub const REQUEST_CANCELLED: &str = "Request cancelled.";

/// Tunables for a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub keyword: String,
    /// Pause between commands of the first execution
    pub initial_delay: Duration,
    /// Pause between commands of the refined execution
    pub refined_delay: Duration,
    /// Send refined commands through the policy gate before running them
    pub gate_refined: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_KEYWORD.to_string(),
            initial_delay: Duration::from_secs(5),
            refined_delay: Duration::from_secs(10),
            gate_refined: false,
        }
    }
}

/// Errors that end a run early. Reported to the user as a final event.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("request cancelled")]
    Cancelled,
}

enum State {
    Reasoning,
    Generating { reasoning: String },
    Gating,
    Executing,
    Diagnosing { report: ExecutionReport },
    Refining { summary: String },
    ReExecuting,
    Done,
}

pub struct Pipeline<G, P, R> {
    generator: G,
    gate: PolicyGate<P>,
    executor: Executor<R>,
    extractor: CommandExtractor,
    config: PipelineConfig,
}

impl<G, P, R> Pipeline<G, P, R>
where
    G: Generator,
    P: PolicyAdapter,
    R: CommandRunner,
{
    pub fn new(
        generator: G,
        gate: PolicyGate<P>,
        executor: Executor<R>,
        config: PipelineConfig,
    ) -> Self {
        let extractor = CommandExtractor::new(config.keyword.clone());
        Self { generator, gate, executor, extractor, config }
    }

    pub fn registry(&self) -> &ResourceRegistry {
        self.executor.registry()
    }

    /// Process one instruction, sending progress on `events`.
    ///
    /// Never fails: internal errors and cancellation become the final event.
    pub async fn run(
        &self,
        instruction: &str,
        events: &mpsc::Sender<StageEvent>,
        cancel: &CancellationToken,
    ) -> PipelineRun {
        let mut run = PipelineRun::new(instruction);
        let span = tracing::info_span!("run", id = %run.id.short(8));

        async {
            tracing::info!(instruction, "processing instruction");
            let mut state = State::Reasoning;
            while !matches!(state, State::Done) {
                state = match self.step(state, &mut run, events, cancel).await {
                    Ok(next) => next,
                    Err(PipelineError::Cancelled) => {
                        tracing::info!("run cancelled");
                        emit(&mut run, events, StageEvent::final_message(REQUEST_CANCELLED)).await;
                        State::Done
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "run failed");
                        let message = format!("Error processing request: {e}");
                        emit(&mut run, events, StageEvent::final_message(message)).await;
                        State::Done
                    }
                };
            }
        }
        .instrument(span)
        .await;

        run
    }

    async fn step(
        &self,
        state: State,
        run: &mut PipelineRun,
        events: &mpsc::Sender<StageEvent>,
        cancel: &CancellationToken,
    ) -> Result<State, PipelineError> {
        match state {
            State::Reasoning => {
                let reasoning =
                    or_empty(guard(cancel, self.generator.reasoning(run.instruction())).await?)?;
                let steps = extract_steps(&reasoning);
                emit(run, events, StageEvent::new(Stage::Cot, fenced("Chain-of-Thought:", &steps)))
                    .await;
                Ok(State::Generating { reasoning })
            }

            State::Generating { reasoning } => {
                let text = match guard(cancel, self.generator.commands(&reasoning)).await? {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(error = %e, "command generation failed");
                        String::new()
                    }
                };
                let commands = self.extractor.extract(&text);
                tracing::info!(count = commands.len(), "extracted commands");
                if commands.is_empty() {
                    emit(run, events, StageEvent::final_message(NO_COMMANDS)).await;
                    return Ok(State::Done);
                }
                let pending = commands.iter().map(|c| Command::new(c.as_str())).collect();
                run.replace_commands(pending);
                run.generated = commands;
                Ok(State::Gating)
            }

            State::Gating => {
                let raw: Vec<String> = run.generated.clone();
                let commands = self.review(raw, cancel).await?;
                run.replace_commands(commands);
                if run.allowed().next().is_none() {
                    let message = rejection_listing(&run.commands);
                    emit(run, events, StageEvent::final_message(message)).await;
                    return Ok(State::Done);
                }
                let message = command_listing("Generated Kubernetes Commands:", &run.commands);
                emit(run, events, StageEvent::new(Stage::Commands, message)).await;
                Ok(State::Executing)
            }

            State::Executing => {
                let report = self.execute(run, self.config.initial_delay, cancel).await?;
                Ok(State::Diagnosing { report })
            }

            State::Diagnosing { report } => {
                let rendered = report.render();
                if !report.has_error() {
                    let message = fenced("Execution Results:", &rendered);
                    emit(run, events, StageEvent::final_message(message)).await;
                    return Ok(State::Done);
                }
                let summary = report.error_summary();
                tracing::info!(error = %summary, "execution reported an error");
                let message = fenced("Initial Execution Results (with error):", &rendered);
                emit(run, events, StageEvent::new(Stage::InitialError, message)).await;
                Ok(State::Refining { summary })
            }

            State::Refining { summary } => {
                let request = RefineRequest {
                    instruction: run.instruction(),
                    previous: &run.generated,
                    error: &summary,
                };
                let text = match guard(cancel, self.generator.refine(request)).await? {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(error = %e, "refinement failed");
                        String::new()
                    }
                };
                let refined = self.extractor.extract(&text);
                if refined.is_empty() {
                    emit(run, events, StageEvent::final_message(UNABLE_TO_REFINE)).await;
                    return Ok(State::Done);
                }

                let commands = if self.config.gate_refined {
                    self.review(refined, cancel).await?
                } else {
                    refined.into_iter().map(Command::from).collect()
                };
                run.replace_commands(commands);
                if self.config.gate_refined && run.allowed().next().is_none() {
                    let message = rejection_listing(&run.commands);
                    emit(run, events, StageEvent::final_message(message)).await;
                    return Ok(State::Done);
                }
                let message = command_listing("Refined Kubernetes Commands:", &run.commands);
                emit(run, events, StageEvent::new(Stage::RefinedCommands, message)).await;
                Ok(State::ReExecuting)
            }

            State::ReExecuting => {
                let report = self.execute(run, self.config.refined_delay, cancel).await?;
                let message = fenced("Refined Execution Results:", &report.render());
                emit(run, events, StageEvent::final_message(message)).await;
                Ok(State::Done)
            }

            State::Done => Ok(State::Done),
        }
    }

    /// Gate each command in order, keeping auto-corrected text when accepted.
    async fn review(
        &self,
        raw: Vec<String>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Command>, PipelineError> {
        let mut commands = Vec::with_capacity(raw.len());
        for text in raw {
            let review = guard(cancel, self.gate.review(&text)).await?;
            let mut command = Command::new(review.command);
            if review.allowed {
                command.allow();
            } else {
                command.deny(review.reason);
            }
            commands.push(command);
        }
        Ok(commands)
    }

    async fn execute(
        &self,
        run: &mut PipelineRun,
        delay: Duration,
        cancel: &CancellationToken,
    ) -> Result<ExecutionReport, PipelineError> {
        let report = self.executor.execute(&mut run.commands, delay, cancel).await;
        if report.cancelled {
            return Err(PipelineError::Cancelled);
        }
        Ok(report)
    }
}

/// Await `future` unless the run is cancelled first.
async fn guard<T>(
    cancel: &CancellationToken,
    future: impl Future<Output = T>,
) -> Result<T, PipelineError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PipelineError::Cancelled),
        output = future => Ok(output),
    }
}

/// An empty model response carries no text but is not a failure.
fn or_empty(result: Result<String, GenerationError>) -> Result<String, GenerationError> {
    match result {
        Err(GenerationError::Empty) => Ok(String::new()),
        other => other,
    }
}

async fn emit(run: &mut PipelineRun, events: &mpsc::Sender<StageEvent>, event: StageEvent) {
    run.stage = Some(event.stage);
    tracing::debug!(stage = %event.stage, "stage event");
    if events.send(event).await.is_err() {
        tracing::debug!("progress receiver dropped");
    }
}

fn fenced(title: &str, body: &str) -> String {
    format!("{title}\n```\n{body}\n```")
}

/// Runnable commands in a fence, followed by any rejections.
fn command_listing(title: &str, commands: &[Command]) -> String {
    let runnable: Vec<&str> =
        commands.iter().filter(|c| c.denial_reason.is_none()).map(Command::text).collect();
    let mut message = fenced(title, &runnable.join("\n"));
    let rejected: Vec<&Command> = commands.iter().filter(|c| c.denial_reason.is_some()).collect();
    if !rejected.is_empty() {
        message.push_str("\nRejected by policy:\n");
        message.push_str(&rejection_lines(&rejected));
    }
    message
}

fn rejection_listing(commands: &[Command]) -> String {
    let rejected: Vec<&Command> = commands.iter().collect();
    format!("Generated commands violate policy constraints:\n{}", rejection_lines(&rejected))
}

fn rejection_lines(commands: &[&Command]) -> String {
    commands
        .iter()
        .map(|c| format!("- {}: {}\n", c.raw, c.denial_reason.as_deref().unwrap_or_default()))
        .collect()
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
