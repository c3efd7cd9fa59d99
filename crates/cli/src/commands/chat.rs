// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kp chat`: one pipeline run per stdin line, sharing what was learned.

use anyhow::Result;
use clap::Args;
use kp_engine::ResourceRegistry;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct ChatArgs {}

pub async fn handle(_args: ChatArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let pipeline = super::cluster_pipeline(config, ResourceRegistry::new())?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let instruction = line.trim();
        if instruction.is_empty() {
            continue;
        }
        super::drive(&pipeline, instruction, format).await?;
    }

    let known: usize = pipeline.registry().snapshot().values().map(Vec::len).sum();
    tracing::info!(known, "chat session ended");
    Ok(())
}
