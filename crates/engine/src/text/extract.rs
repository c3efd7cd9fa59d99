// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command extraction from generated text.

use regex::Regex;
use std::sync::LazyLock;

/// Command keyword every extracted line must start with.
pub const DEFAULT_KEYWORD: &str = "kubectl";

/// Code fence markers, with an optional language tag (```` ```bash ````)
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_+-]*").expect("constant regex pattern is valid"));

/// Turns free-form generated text into an ordered command list.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    keyword: String,
}

impl Default for CommandExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORD)
    }
}

impl CommandExtractor {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self { keyword: keyword.into() }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Extract commands in input order.
    ///
    /// A single line holding `;` is split into segments; any other input is
    /// read one command per line. Code fences are stripped first.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let cleaned = FENCE.replace_all(text, "");
        let mut lines = cleaned.lines().filter(|l| !l.trim().is_empty());
        match (lines.next(), lines.next()) {
            (Some(only), None) if only.contains(';') => split_semicolons(only),
            _ => cleaned.lines().filter_map(|line| self.command_in_line(line)).collect(),
        }
    }

    /// Match `^\s*\d*[:.]?\s*<keyword>\s.+$` and return the trimmed command.
    fn command_in_line(&self, line: &str) -> Option<String> {
        let rest = line.trim_start();
        let rest = rest.trim_start_matches(|c: char| c.is_ascii_digit());
        let rest = rest.strip_prefix([':', '.']).unwrap_or(rest);
        let rest = rest.trim_start();

        let after = rest.strip_prefix(self.keyword.as_str())?;
        let mut chars = after.chars();
        let separator = chars.next()?;
        if !separator.is_whitespace() || chars.as_str().is_empty() {
            return None;
        }
        Some(rest.trim().to_string())
    }
}

fn split_semicolons(line: &str) -> Vec<String> {
    line.split(';').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
