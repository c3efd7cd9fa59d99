// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kp run`

use anyhow::{bail, Result};
use clap::Args;
use kp_engine::ResourceRegistry;

use crate::config::Config;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct RunArgs {
    /// Instruction in plain language
    #[arg(required = true, trailing_var_arg = true)]
    pub instruction: Vec<String>,
}

pub async fn handle(args: RunArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let instruction = args.instruction.join(" ");
    if instruction.trim().is_empty() {
        bail!("instruction is empty");
    }
    let pipeline = super::cluster_pipeline(config, ResourceRegistry::new())?;
    super::drive(&pipeline, instruction.trim(), format).await
}
