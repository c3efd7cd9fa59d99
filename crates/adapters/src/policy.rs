// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client for the external policy decision service.
//!
//! The service receives `{"input": {"command": "<cmd>"}}` and answers with a
//! `result` document carrying `allow` and `deny`. Classification into a
//! verdict happens in the engine's policy gate; this module only moves bytes
//! and validates shape.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Default decision endpoint (an OPA data API path).
pub const DEFAULT_POLICY_URL: &str = "http://localhost:8181/v1/data/k8s/allow";

/// Default timeout for a single decision request.
pub const POLICY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from talking to the decision service
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("decision service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed decision payload: {0}")]
    Malformed(String),
}

/// The `result` document of a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DecisionResult {
    /// `None` when the service omitted the flag
    #[serde(default)]
    pub allow: Option<bool>,
    #[serde(default)]
    pub deny: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawResult {
    /// Rules that evaluate straight to a boolean
    Flag(bool),
    Document(DecisionResult),
}

/// A decision as returned by the service, plus its raw payload for auditing.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyResponse {
    pub raw: Value,
    /// `None` when the policy path is undefined (no `result` key)
    pub result: Option<DecisionResult>,
}

impl PolicyResponse {
    /// Validate a decision payload.
    pub fn from_json(raw: Value) -> Result<Self, PolicyError> {
        let Some(object) = raw.as_object() else {
            return Err(PolicyError::Malformed(format!("expected a JSON object, got {}", raw)));
        };
        let result = match object.get("result") {
            None | Some(Value::Null) => None,
            Some(value) => match serde_json::from_value::<RawResult>(value.clone()) {
                Ok(RawResult::Flag(allow)) => {
                    Some(DecisionResult { allow: Some(allow), deny: Vec::new() })
                }
                Ok(RawResult::Document(doc)) => Some(doc),
                Err(e) => return Err(PolicyError::Malformed(format!("result: {}", e))),
            },
        };
        Ok(Self { raw, result })
    }
}

/// Adapter for evaluating a command against policy
#[async_trait]
pub trait PolicyAdapter: Clone + Send + Sync + 'static {
    async fn evaluate(&self, command: &str) -> Result<PolicyResponse, PolicyError>;
}

/// HTTP client for an OPA-style decision endpoint.
#[derive(Clone, Debug)]
pub struct OpaClient {
    client: reqwest::Client,
    url: String,
}

impl OpaClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PolicyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PolicyError::Transport(e.to_string()))?;
        Ok(Self { client, url: url.into() })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PolicyAdapter for OpaClient {
    async fn evaluate(&self, command: &str) -> Result<PolicyResponse, PolicyError> {
        let payload = json!({ "input": { "command": command } });
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PolicyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PolicyError::Status { status: status.as_u16(), body: body.trim().into() });
        }

        let raw: Value =
            response.json().await.map_err(|e| PolicyError::Malformed(e.to_string()))?;
        tracing::debug!(command, decision = %raw, "policy decision received");
        PolicyResponse::from_json(raw)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{PolicyAdapter, PolicyError, PolicyResponse};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakePolicyState {
        decisions: HashMap<String, Result<Value, String>>,
        calls: Vec<String>,
    }

    /// Fake decision service for testing.
    ///
    /// Unscripted commands are allowed.
    #[derive(Clone, Default)]
    pub struct FakePolicy {
        inner: Arc<Mutex<FakePolicyState>>,
    }

    impl FakePolicy {
        pub fn new() -> Self {
            Self::default()
        }

        /// Script the raw payload returned for a command.
        pub fn respond(&self, command: &str, payload: Value) -> &Self {
            self.inner.lock().decisions.insert(command.to_string(), Ok(payload));
            self
        }

        /// Script a denial carrying `reason`.
        pub fn deny(&self, command: &str, reason: &str) -> &Self {
            self.respond(command, json!({ "result": { "allow": false, "deny": [reason] } }))
        }

        /// Script a transport failure.
        pub fn unavailable(&self, command: &str, message: &str) -> &Self {
            self.inner.lock().decisions.insert(command.to_string(), Err(message.to_string()));
            self
        }

        /// Commands submitted so far, in order.
        pub fn calls(&self) -> Vec<String> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl PolicyAdapter for FakePolicy {
        async fn evaluate(&self, command: &str) -> Result<PolicyResponse, PolicyError> {
            let scripted = {
                let mut inner = self.inner.lock();
                inner.calls.push(command.to_string());
                inner.decisions.get(command).cloned()
            };
            match scripted {
                Some(Ok(payload)) => PolicyResponse::from_json(payload),
                Some(Err(message)) => Err(PolicyError::Transport(message)),
                None => {
                    PolicyResponse::from_json(json!({ "result": { "allow": true, "deny": [] } }))
                }
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakePolicy;

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
