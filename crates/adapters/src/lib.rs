// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for external I/O: the cluster shell, the policy decision
//! service and the generation model.

pub mod generation;
pub mod policy;
pub mod subprocess;

pub use generation::{ApiFormat, GenerationError, Generator, LlmGenerator, RefineRequest};
pub use policy::{
    DecisionResult, OpaClient, PolicyAdapter, PolicyError, PolicyResponse, DEFAULT_POLICY_URL,
    POLICY_TIMEOUT,
};
pub use subprocess::{CommandOutput, CommandRunner, RunError, ShellRunner, COMMAND_TIMEOUT};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use generation::{FakeGenerator, RefineCall};
#[cfg(any(test, feature = "test-support"))]
pub use policy::FakePolicy;
#[cfg(any(test, feature = "test-support"))]
pub use subprocess::FakeRunner;

#[cfg(test)]
mod test_http;
