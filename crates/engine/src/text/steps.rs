// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reasoning step filtering.

use regex::Regex;
use std::sync::LazyLock;

/// Unfilled template lines such as `Step 2: <describe the action>`
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^step\s*\d+:\s*<.*?>\s*$").expect("constant regex pattern is valid")
});

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static STEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^step\s*\d+:").expect("constant regex pattern is valid"));

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.").expect("constant regex pattern is valid"));

/// Keep only step lines of a reasoning text.
///
/// Step lines start with `-`, `N.` or `Step N:`. When the text holds none,
/// the whole text is returned trimmed.
pub fn extract_steps(text: &str) -> String {
    let steps: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !PLACEHOLDER.is_match(line))
        .filter(|line| line.starts_with('-') || NUMBERED.is_match(line) || STEP.is_match(line))
        .collect();
    if steps.is_empty() {
        text.trim().to_string()
    } else {
        steps.join("\n")
    }
}

#[cfg(test)]
#[path = "steps_tests.rs"]
mod tests;
