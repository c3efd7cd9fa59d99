// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One end-to-end pipeline invocation.

use crate::command::Command;
use crate::stage::Stage;

crate::define_id! {
    /// Unique identifier for a pipeline run.
    pub struct RunId("run-");
}

/// State carried through a single instruction's pipeline.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub id: RunId,
    /// Operator text; never modified after the run starts
    instruction: String,
    /// Commands as first generated, before policy filtering
    pub generated: Vec<String>,
    /// Current command list; replaced wholesale by a refined list
    pub commands: Vec<Command>,
    /// Last stage emitted, `None` before the first event
    pub stage: Option<Stage>,
}

impl PipelineRun {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            id: RunId::new(),
            instruction: instruction.into(),
            generated: Vec::new(),
            commands: Vec::new(),
            stage: None,
        }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Replace the command list (refinement discards the previous list).
    pub fn replace_commands(&mut self, commands: Vec<Command>) {
        self.commands = commands;
    }

    pub fn allowed(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(|c| c.is_allowed())
    }

    pub fn is_finished(&self) -> bool {
        self.stage == Some(Stage::Final)
    }
}
