// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kp-engine: the instruction pipeline and the pieces it drives

pub mod audit;
pub mod executor;
pub mod gate;
pub mod pipeline;
pub mod registry;
pub mod rewrite;
pub mod text;

pub use audit::{AuditLogs, ExecutionLog, PolicyLog, EXECUTION_LOG_FILE, POLICY_LOG_FILE};
pub use executor::{ExecutionReport, Executor};
pub use gate::{classify, GateDecision, PolicyGate, Review, DEFAULT_NAMESPACE, DENIED_BY_POLICY};
pub use pipeline::{
    Pipeline, PipelineConfig, PipelineError, NO_COMMANDS, REQUEST_CANCELLED, UNABLE_TO_REFINE,
};
pub use registry::{Resolution, ResourceRegistry};
pub use rewrite::Rewriter;
pub use text::{CommandExtractor, DEFAULT_KEYWORD};
