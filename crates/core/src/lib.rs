// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kp-core: domain types shared by the kubepilot crates

pub mod macros;

pub mod command;
pub mod id;
pub mod record;
pub mod resource;
pub mod run;
pub mod stage;

pub use command::{Command, CommandState, Verdict};
pub use id::short;
pub use record::{ExecutionRecord, NO_OUTPUT_PLACEHOLDER};
pub use resource::{ParseKindError, ResourceKind};
pub use run::{PipelineRun, RunId};
pub use stage::{Stage, StageEvent};
