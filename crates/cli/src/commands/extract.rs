// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kp extract`

use anyhow::{Context, Result};
use clap::Args;
use kp_engine::CommandExtractor;
use std::io::Read;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Args)]
pub struct ExtractArgs {
    /// File holding generated text (default: stdin)
    pub file: Option<PathBuf>,
}

pub fn handle(args: ExtractArgs, config: &Config) -> Result<()> {
    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
            text
        }
    };

    for command in CommandExtractor::new(config.execution.keyword.clone()).extract(&text) {
        println!("{command}");
    }
    Ok(())
}
