// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::color;
use clap::ValueEnum;
use kp_core::StageEvent;
use kp_engine::Review;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One stage event: a labelled block in text mode, a JSON line otherwise.
pub fn format_event(event: &StageEvent, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => format!("{}\n{}\n", color::stage(event.stage), event.message),
        OutputFormat::Json => serde_json::to_string(event)?,
    })
}

pub fn format_review(review: &Review, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text if review.allowed && review.corrected => {
            format!("allowed (corrected): {}", color::literal(&review.command))
        }
        OutputFormat::Text if review.allowed => {
            format!("allowed: {}", color::literal(&review.command))
        }
        OutputFormat::Text => format!("{} {}", color::alert("denied:"), review.reason),
        OutputFormat::Json => serde_json::to_string(&serde_json::json!({
            "command": review.command,
            "allowed": review.allowed,
            "corrected": review.corrected,
            "reason": review.reason,
        }))?,
    })
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
