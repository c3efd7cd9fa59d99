// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kp_adapters::FakeRunner;
use kp_core::{CommandState, ResourceKind, NO_OUTPUT_PLACEHOLDER};
use tempfile::TempDir;
use tokio::time::Instant;

const SERVICES: &str = "\
NAME                 TYPE        CLUSTER-IP     EXTERNAL-IP   PORT(S)   AGE
blue-slack-service   ClusterIP   10.96.143.18   <none>        80/TCP    3d
";

struct TestHarness {
    executor: Executor<FakeRunner>,
    runner: FakeRunner,
    registry: ResourceRegistry,
    dir: TempDir,
}

fn setup() -> TestHarness {
    let dir = TempDir::new().unwrap();
    let runner = FakeRunner::new();
    let registry = ResourceRegistry::new();
    let log = ExecutionLog::new(dir.path().join("cluster_execution.log"));
    let executor = Executor::new(runner.clone(), registry.clone(), log, "kubectl");
    TestHarness { executor, runner, registry, dir }
}

fn commands(lines: &[&str]) -> Vec<Command> {
    lines.iter().map(|line| Command::from(*line)).collect()
}

#[tokio::test]
async fn empty_stdout_success_uses_placeholder() {
    let harness = setup();
    let mut batch = commands(&["kubectl create ns demo"]);

    let report =
        harness.executor.execute(&mut batch, Duration::ZERO, &CancellationToken::new()).await;

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].output, NO_OUTPUT_PLACEHOLDER);
    assert_eq!(
        report.render(),
        "Command: kubectl create ns demo\nOutput: Command executed successfully with no output."
    );
    assert!(!report.has_error());
}

#[tokio::test]
async fn failure_does_not_abort_batch() {
    let harness = setup();
    harness
        .runner
        .fail("kubectl get nope", "error: the server doesn't have a resource type \"nope\"")
        .succeed("kubectl get ns", "NAME      STATUS   AGE\ndefault   Active   3d\n");
    let mut batch = commands(&["kubectl get nope", "kubectl get ns"]);

    let report =
        harness.executor.execute(&mut batch, Duration::ZERO, &CancellationToken::new()).await;

    assert_eq!(harness.runner.calls(), vec!["kubectl get nope", "kubectl get ns"]);
    assert!(report.has_error());
    assert!(!report.all_succeeded());
    assert_eq!(
        report.error_summary(),
        "STDERR: error: the server doesn't have a resource type \"nope\""
    );
    assert_eq!(batch[0].state(), CommandState::Executed { success: false });
    assert_eq!(batch[1].state(), CommandState::Executed { success: true });
}

#[tokio::test]
async fn report_blocks_are_separated_by_blank_line() {
    let harness = setup();
    harness.runner.succeed("kubectl get ns", "default\n").succeed("kubectl get pods", "web\n");
    let mut batch = commands(&["kubectl get ns", "kubectl get pods"]);

    let report =
        harness.executor.execute(&mut batch, Duration::ZERO, &CancellationToken::new()).await;

    assert_eq!(
        report.render(),
        "Command: kubectl get ns\nOutput: default\n\nCommand: kubectl get pods\nOutput: web"
    );
}

#[tokio::test]
async fn spawn_failure_is_recorded_with_error_marker() {
    let harness = setup();
    harness.runner.spawn_error("kubectl get pods", "No such file or directory");
    let mut batch = commands(&["kubectl get pods"]);

    let report =
        harness.executor.execute(&mut batch, Duration::ZERO, &CancellationToken::new()).await;

    assert!(!report.records[0].success);
    assert!(report.records[0].output.starts_with("error: "));
    assert!(report.has_error());
}

#[tokio::test]
async fn listing_feeds_registry_and_later_commands_are_rewritten() {
    let harness = setup();
    harness.runner.succeed("kubectl get svc", SERVICES);
    let mut batch = commands(&["kubectl get svc", "kubectl describe svc my-service"]);

    let report =
        harness.executor.execute(&mut batch, Duration::ZERO, &CancellationToken::new()).await;

    assert_eq!(
        harness.registry.candidates(&ResourceKind::Service),
        vec!["blue-slack-service"]
    );
    assert_eq!(
        harness.runner.calls(),
        vec!["kubectl get svc", "kubectl describe svc blue-slack-service"]
    );
    assert_eq!(batch[1].rewritten.as_deref(), Some("kubectl describe svc blue-slack-service"));
    assert_eq!(report.records[1].command, "kubectl describe svc blue-slack-service");
}

#[tokio::test]
async fn failed_listing_is_not_learned() {
    let harness = setup();
    harness.runner.fail("kubectl get svc", SERVICES);
    let mut batch = commands(&["kubectl get svc"]);

    harness.executor.execute(&mut batch, Duration::ZERO, &CancellationToken::new()).await;

    assert!(harness.registry.candidates(&ResourceKind::Service).is_empty());
}

#[tokio::test]
async fn denied_commands_are_skipped() {
    let harness = setup();
    let mut batch = commands(&["kubectl get pods", "kubectl delete ns prod"]);
    batch[1].deny("production is protected");

    let report =
        harness.executor.execute(&mut batch, Duration::ZERO, &CancellationToken::new()).await;

    assert_eq!(harness.runner.calls(), vec!["kubectl get pods"]);
    assert_eq!(report.records.len(), 1);
    assert_eq!(batch[1].state(), CommandState::Pending);
}

#[tokio::test]
async fn every_command_is_audited() {
    let harness = setup();
    harness.runner.fail("kubectl get nope", "error: boom");
    let mut batch = commands(&["kubectl get ns", "kubectl get nope"]);

    harness.executor.execute(&mut batch, Duration::ZERO, &CancellationToken::new()).await;

    let log = std::fs::read_to_string(harness.dir.path().join("cluster_execution.log")).unwrap();
    assert!(log.contains("[SUCCESS] Executed: kubectl get ns"));
    assert!(log.contains("[FAILED] Executed: kubectl get nope"));
}

#[tokio::test(start_paused = true)]
async fn delay_between_commands_but_not_after_last() {
    let harness = setup();
    let mut batch = commands(&["kubectl get ns", "kubectl get pods", "kubectl get svc"]);

    let started = Instant::now();
    harness.executor.execute(&mut batch, Duration::from_secs(5), &CancellationToken::new()).await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(10), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(15), "elapsed {elapsed:?}");
}

#[tokio::test]
async fn cancelled_before_start_runs_nothing() {
    let harness = setup();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut batch = commands(&["kubectl get ns"]);

    let report = harness.executor.execute(&mut batch, Duration::ZERO, &cancel).await;

    assert!(report.cancelled);
    assert!(report.is_empty());
    assert!(harness.runner.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancel_during_delay_stops_batch() {
    let harness = setup();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });
    let mut batch = commands(&["kubectl get ns", "kubectl get pods"]);

    let report = harness.executor.execute(&mut batch, Duration::from_secs(5), &cancel).await;

    assert!(report.cancelled);
    assert_eq!(harness.runner.calls(), vec!["kubectl get ns"]);
    assert_eq!(report.records.len(), 1);
}
