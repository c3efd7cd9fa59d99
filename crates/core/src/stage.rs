// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Staged progress events emitted to the front-end.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Cot,
    Commands,
    InitialError,
    RefinedCommands,
    Final,
}

crate::simple_display! {
    Stage {
        Cot => "cot",
        Commands => "commands",
        InitialError => "initial_error",
        RefinedCommands => "refined_commands",
        Final => "final",
    }
}

/// One `{stage, message}` progress event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageEvent {
    pub stage: Stage,
    pub message: String,
}

impl StageEvent {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self { stage, message: message.into() }
    }

    pub fn final_message(message: impl Into<String>) -> Self {
        Self::new(Stage::Final, message)
    }

    pub fn is_final(&self) -> bool {
        self.stage == Stage::Final
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
