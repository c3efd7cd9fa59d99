// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kp check` specs
//!
//! No decision service is running in the sandbox, so every check exercises
//! the fail-closed path.

use crate::prelude::*;

/// Nothing listens on the discard port
const UNREACHABLE: &str = "http://127.0.0.1:9/v1/data/k8s/allow";

#[test]
fn unreachable_policy_service_denies() {
    cli()
        .env("KP_POLICY_URL", UNREACHABLE)
        .args(&["check", "kubectl", "get", "pods", "-n", "demo"])
        .fails_with(1)
        .stdout_has("denied: policy check failed");
}

#[test]
fn failure_is_written_to_policy_audit_log() {
    let sandbox = Sandbox::new();

    sandbox
        .cli()
        .env("KP_POLICY_URL", UNREACHABLE)
        .args(&["check", "kubectl", "delete", "ns", "prod"])
        .fails_with(1);

    let log = sandbox.read("logs/policy.log");
    assert!(
        log.contains("ERROR - Policy check failed for command 'kubectl delete ns prod'"),
        "policy log:\n{log}"
    );
}

#[test]
fn json_output_reports_denial() {
    let out = cli()
        .env("KP_POLICY_URL", UNREACHABLE)
        .args(&["--output", "json", "check", "kubectl", "get", "pods"])
        .fails_with(1);

    let value: serde_json::Value = serde_json::from_str(out.stdout().trim()).unwrap();
    assert_eq!(value["allowed"], false);
    assert_eq!(value["command"], "kubectl get pods");
}
