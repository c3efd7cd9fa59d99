// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kp check`

use anyhow::{bail, Result};
use clap::Args;

use crate::config::Config;
use crate::exit_error::ExitError;
use crate::output::{format_review, OutputFormat};

#[derive(Args)]
pub struct CheckArgs {
    /// Command to check, e.g. `kubectl get pods`
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

pub async fn handle(args: CheckArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let command = args.command.join(" ");
    if command.trim().is_empty() {
        bail!("command is empty");
    }
    let gate = super::policy_gate(config)?;
    let review = gate.review(command.trim()).await;

    println!("{}", format_review(&review, format)?);
    if !review.allowed {
        return Err(ExitError::new(1, "").into());
    }
    Ok(())
}
