// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod chat;
pub mod check;
pub mod extract;
pub mod run;

use anyhow::{Context, Result};
use kp_adapters::{LlmGenerator, OpaClient, ShellRunner};
use kp_core::StageEvent;
use kp_engine::{AuditLogs, Executor, Pipeline, PolicyGate, ResourceRegistry};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::output::{format_event, OutputFormat};

pub type ClusterPipeline = Pipeline<LlmGenerator, OpaClient, ShellRunner>;

/// Policy gate backed by the configured decision service.
pub fn policy_gate(config: &Config) -> Result<PolicyGate<OpaClient>> {
    let client = OpaClient::new(config.policy.url.clone(), config.policy_timeout())?;
    let logs = AuditLogs::from_dir(&config.logs.dir);
    Ok(PolicyGate::new(client, logs.policy)
        .with_default_namespace(config.policy.default_namespace.clone())
        .with_allow_if_absent(config.policy.allow_if_absent))
}

/// Full pipeline over the real cluster, sharing `registry` with other runs.
pub fn cluster_pipeline(config: &Config, registry: ResourceRegistry) -> Result<ClusterPipeline> {
    let api_key = config
        .generation
        .api_key
        .clone()
        .context("LLM API key not set (KP_LLM_API_KEY or [generation].api_key)")?;
    let generator = LlmGenerator::new(
        api_key,
        config.generation.api_url.clone(),
        config.generation.model.clone(),
        config.execution.keyword.clone(),
    );
    let logs = AuditLogs::from_dir(&config.logs.dir);
    let executor = Executor::new(
        ShellRunner::new(config.command_timeout()),
        registry,
        logs.execution,
        config.execution.keyword.clone(),
    );
    Ok(Pipeline::new(generator, policy_gate(config)?, executor, config.pipeline()))
}

/// Run one instruction, printing events as they arrive.
///
/// Ctrl-C cancels the run; the pipeline still reports the cancellation as its
/// final event.
pub async fn drive(
    pipeline: &ClusterPipeline,
    instruction: &str,
    format: OutputFormat,
) -> Result<()> {
    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let (tx, mut rx) = mpsc::channel::<StageEvent>(16);
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match format_event(&event, format) {
                Ok(text) => println!("{text}"),
                Err(e) => tracing::warn!(error = %e, "failed to format event"),
            }
        }
    });

    pipeline.run(instruction, &tx, &cancel).await;
    drop(tx);
    interrupt.abort();
    printer.await?;
    Ok(())
}
