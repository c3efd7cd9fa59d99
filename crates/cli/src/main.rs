// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kp: natural-language operations for a Kubernetes cluster

mod color;
mod commands;
mod config;
mod env;
mod exit_error;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{chat, check, extract, run};
use crate::config::Config;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "kp", version, styles = color::styles())]
#[command(about = "Turn operator instructions into policy-checked kubectl commands")]
struct Cli {
    /// Config file (default: $KP_CONFIG or ./kp.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one instruction end to end
    Run(run::RunArgs),
    /// Read instructions from stdin, one per line
    Chat(chat::ChatArgs),
    /// Ask the policy service about a command
    Check(check::CheckArgs),
    /// Print the commands found in generated text
    Extract(extract::ExtractArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = dispatch().await {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            if !exit.message.is_empty() {
                eprintln!("{}", exit.message);
            }
            std::process::exit(exit.code);
        }
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn dispatch() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Extraction is pure text processing and leaves no log behind
    let _guard = match cli.command {
        Commands::Extract(_) => None,
        _ => logging::init(&config.logs.dir),
    };
    match cli.command {
        Commands::Run(args) => run::handle(args, &config, cli.output).await,
        Commands::Chat(args) => chat::handle(args, &config, cli.output).await,
        Commands::Check(args) => check::handle(args, &config, cli.output).await,
        Commands::Extract(args) => extract::handle(args, &config),
    }
}
