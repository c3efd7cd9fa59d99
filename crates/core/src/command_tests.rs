// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_command_is_pending() {
    let cmd = Command::new("kubectl get pods");
    assert_eq!(cmd.verdict, Verdict::Pending);
    assert_eq!(cmd.state(), CommandState::Pending);
    assert_eq!(cmd.text(), "kubectl get pods");
}

#[test]
fn rewrite_changes_text_but_keeps_raw() {
    let mut cmd = Command::new("kubectl describe svc my-service");
    cmd.apply_rewrite("kubectl describe svc blue-slack-service".to_string());
    assert_eq!(cmd.raw, "kubectl describe svc my-service");
    assert_eq!(cmd.text(), "kubectl describe svc blue-slack-service");
    assert_eq!(cmd.state(), CommandState::Rewritten);
}

#[test]
fn identical_rewrite_is_not_stored() {
    let mut cmd = Command::new("kubectl get pods");
    cmd.apply_rewrite("kubectl get pods".to_string());
    assert_eq!(cmd.rewritten, None);
    assert_eq!(cmd.state(), CommandState::Rewritten);
}

#[test]
fn deny_then_allow_clears_reason() {
    let mut cmd = Command::new("kubectl delete ns prod");
    cmd.deny("deleting namespaces is forbidden");
    assert_eq!(cmd.verdict, Verdict::Denied);
    assert_eq!(cmd.denial_reason.as_deref(), Some("deleting namespaces is forbidden"));

    cmd.allow();
    assert!(cmd.is_allowed());
    assert_eq!(cmd.denial_reason, None);
}

#[test]
fn recorded_result_drives_state() {
    let mut cmd = Command::new("kubectl get pods");
    cmd.record(ExecutionRecord::new("kubectl get pods", "", "boom", false));
    assert_eq!(cmd.state(), CommandState::Executed { success: false });
}

#[yare::parameterized(
    pending = { Verdict::Pending, "pending" },
    allowed = { Verdict::Allowed, "allowed" },
    denied  = { Verdict::Denied, "denied" },
)]
fn verdict_display(verdict: Verdict, expected: &str) {
    assert_eq!(verdict.to_string(), expected);
}
