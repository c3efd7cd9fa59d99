// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Policy gate: turns decision-service answers into verdicts.
//!
//! The gate fails closed. Transport errors, non-2xx answers, malformed
//! payloads and undefined decisions all deny the command. Every decision,
//! including failures, is written to the policy audit log.

use crate::audit::PolicyLog;
use crate::text::has_namespace_flag;
use kp_adapters::{PolicyAdapter, PolicyResponse};

/// Namespace appended by the auto-correction.
pub const DEFAULT_NAMESPACE: &str = "staging";

/// Reason given for a denial that carried no deny messages.
pub const DENIED_BY_POLICY: &str = "denied by policy";

/// Denial reasons that the namespace auto-correction responds to.
const MISSING_NAMESPACE_PHRASES: &[&str] =
    &["no namespace provided", "namespace is required", "missing namespace"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
    pub allowed: bool,
    /// Deny reasons joined by `; `, or empty when allowed
    pub reason: String,
}

impl GateDecision {
    fn allow() -> Self {
        Self { allowed: true, reason: String::new() }
    }

    fn deny(reason: impl Into<String>) -> Self {
        Self { allowed: false, reason: reason.into() }
    }
}

/// Verdict for a command after the auto-correction had its chance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// The command to run: corrected when the correction was accepted
    pub command: String,
    pub allowed: bool,
    pub reason: String,
    pub corrected: bool,
}

#[derive(Debug, Clone)]
pub struct PolicyGate<P> {
    policy: P,
    log: PolicyLog,
    default_namespace: String,
    allow_if_absent: bool,
}

impl<P: PolicyAdapter> PolicyGate<P> {
    pub fn new(policy: P, log: PolicyLog) -> Self {
        Self {
            policy,
            log,
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            allow_if_absent: false,
        }
    }

    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = namespace.into();
        self
    }

    /// Treat a decision document without an `allow` flag as allowing.
    pub fn with_allow_if_absent(mut self, allow: bool) -> Self {
        self.allow_if_absent = allow;
        self
    }

    /// Ask the decision service about one command.
    pub async fn check(&self, command: &str) -> GateDecision {
        match self.policy.evaluate(command).await {
            Ok(response) => {
                let decision = classify(&response, self.allow_if_absent);
                let reason = if decision.allowed { "allowed" } else { decision.reason.as_str() };
                self.log.decision(command, &response.raw.to_string(), reason);
                tracing::info!(command, allowed = decision.allowed, reason, "policy decision");
                decision
            }
            Err(e) => {
                self.log.failure(command, &e.to_string());
                tracing::error!(command, error = %e, "policy check failed");
                GateDecision::deny(format!("policy check failed: {e}"))
            }
        }
    }

    /// Check a command, retrying once with the default namespace when the
    /// denial says the namespace is missing.
    pub async fn review(&self, command: &str) -> Review {
        let decision = self.check(command).await;
        if decision.allowed || !self.should_correct(command, &decision.reason) {
            return Review {
                command: command.to_string(),
                allowed: decision.allowed,
                reason: decision.reason,
                corrected: false,
            };
        }

        let corrected = format!("{command} --namespace={}", self.default_namespace);
        tracing::info!(from = command, to = %corrected, "auto-correcting command");
        let retry = self.check(&corrected).await;
        if retry.allowed {
            Review { command: corrected, allowed: true, reason: retry.reason, corrected: true }
        } else {
            Review {
                command: command.to_string(),
                allowed: false,
                reason: decision.reason,
                corrected: false,
            }
        }
    }

    fn should_correct(&self, command: &str, reason: &str) -> bool {
        let reason = reason.to_lowercase();
        MISSING_NAMESPACE_PHRASES.iter().any(|phrase| reason.contains(phrase))
            && !has_namespace_flag(command)
    }
}

/// Verdict for a well-formed decision.
pub fn classify(response: &PolicyResponse, allow_if_absent: bool) -> GateDecision {
    let Some(result) = &response.result else {
        return GateDecision::deny("policy decision undefined");
    };
    let allow = result.allow.unwrap_or(allow_if_absent);
    if allow && result.deny.is_empty() {
        GateDecision::allow()
    } else if result.deny.is_empty() {
        GateDecision::deny(DENIED_BY_POLICY)
    } else {
        GateDecision::deny(result.deny.join("; "))
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
