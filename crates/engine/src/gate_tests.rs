// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kp_adapters::{FakePolicy, OpaClient};
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::TempDir;

fn response(payload: Value) -> PolicyResponse {
    PolicyResponse::from_json(payload).unwrap()
}

#[yare::parameterized(
    allowed         = { json!({"result": {"allow": true, "deny": []}}), true, "" },
    allow_no_deny   = { json!({"result": {"allow": true}}), true, "" },
    denied_reason   = { json!({"result": {"allow": true, "deny": ["x"]}}), false, "x" },
    joined_reasons  = { json!({"result": {"allow": false, "deny": ["a", "b"]}}), false, "a; b" },
    denied_bare     = { json!({"result": {"allow": false}}), false, "denied by policy" },
    absent_flag     = { json!({"result": {"deny": []}}), false, "denied by policy" },
    boolean_result  = { json!({"result": true}), true, "" },
    undefined       = { json!({}), false, "policy decision undefined" },
)]
fn classifies(payload: Value, allowed: bool, reason: &str) {
    let decision = classify(&response(payload), false);
    assert_eq!(decision, GateDecision { allowed, reason: reason.to_string() });
}

#[test]
fn absent_flag_can_be_configured_to_allow() {
    let decision = classify(&response(json!({"result": {"deny": []}})), true);
    assert!(decision.allowed);
}

struct TestHarness {
    gate: PolicyGate<FakePolicy>,
    policy: FakePolicy,
    dir: TempDir,
}

impl TestHarness {
    fn policy_log(&self) -> String {
        std::fs::read_to_string(self.dir.path().join("policy.log")).unwrap_or_default()
    }
}

fn setup() -> TestHarness {
    let dir = TempDir::new().unwrap();
    let policy = FakePolicy::new();
    let gate = PolicyGate::new(policy.clone(), PolicyLog::new(dir.path().join("policy.log")));
    TestHarness { gate, policy, dir }
}

#[tokio::test]
async fn check_allows_and_audits() {
    let harness = setup();

    let decision = harness.gate.check("kubectl get pods -n demo").await;

    assert!(decision.allowed);
    let log = harness.policy_log();
    assert!(log.contains("INFO - Policy decision for command 'kubectl get pods -n demo'"));
    assert!(log.contains("| Reason: allowed"));
}

#[tokio::test]
async fn transport_failure_is_a_denial() {
    let harness = setup();
    harness.policy.unavailable("kubectl get pods", "connection refused");

    let decision = harness.gate.check("kubectl get pods").await;

    assert!(!decision.allowed);
    assert!(decision.reason.contains("connection refused"), "reason: {}", decision.reason);
    assert!(harness.policy_log().contains("ERROR - Policy check failed for command 'kubectl get pods'"));
}

#[tokio::test]
async fn timeout_is_a_denial() {
    // Accepts the connection but never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/v1/data/k8s/allow", listener.local_addr().unwrap());
    let _server = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });
    let dir = TempDir::new().unwrap();
    let client = OpaClient::new(url, Duration::from_millis(200)).unwrap();
    let gate = PolicyGate::new(client, PolicyLog::new(dir.path().join("policy.log")));

    let decision = gate.check("kubectl get pods").await;

    assert!(!decision.allowed);
    assert!(decision.reason.starts_with("policy check failed"), "reason: {}", decision.reason);
}

#[tokio::test]
async fn missing_namespace_is_auto_corrected() {
    let harness = setup();
    harness.policy.deny("kubectl get pods", "No namespace provided");

    let review = harness.gate.review("kubectl get pods").await;

    assert_eq!(
        review,
        Review {
            command: "kubectl get pods --namespace=staging".to_string(),
            allowed: true,
            reason: String::new(),
            corrected: true,
        }
    );
    assert_eq!(
        harness.policy.calls(),
        vec!["kubectl get pods", "kubectl get pods --namespace=staging"]
    );
}

#[tokio::test]
async fn correction_uses_configured_namespace() {
    let harness = setup();
    harness.policy.deny("kubectl get pods", "no namespace provided");
    let gate = harness.gate.clone().with_default_namespace("dev");

    let review = gate.review("kubectl get pods").await;

    assert_eq!(review.command, "kubectl get pods --namespace=dev");
}

#[tokio::test]
async fn rejected_correction_keeps_original_denial() {
    let harness = setup();
    harness
        .policy
        .deny("kubectl delete pods --all", "no namespace provided")
        .deny("kubectl delete pods --all --namespace=staging", "bulk deletes are forbidden");

    let review = harness.gate.review("kubectl delete pods --all").await;

    assert_eq!(
        review,
        Review {
            command: "kubectl delete pods --all".to_string(),
            allowed: false,
            reason: "no namespace provided".to_string(),
            corrected: false,
        }
    );
}

#[tokio::test]
async fn other_denials_are_not_corrected() {
    let harness = setup();
    harness.policy.deny("kubectl delete ns prod", "production is protected");

    let review = harness.gate.review("kubectl delete ns prod").await;

    assert!(!review.allowed);
    assert_eq!(review.reason, "production is protected");
    assert_eq!(harness.policy.calls().len(), 1);
}

#[tokio::test]
async fn command_with_namespace_flag_is_not_corrected() {
    let harness = setup();
    harness.policy.deny("kubectl get pods -n ''", "no namespace provided");

    let review = harness.gate.review("kubectl get pods -n ''").await;

    assert!(!review.allowed);
    assert_eq!(harness.policy.calls().len(), 1);
}
