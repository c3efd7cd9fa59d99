// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shallow kubectl argument reading.

/// Flags whose value is the following token when written without `=`.
const VALUE_FLAGS: &[&str] = &[
    "-n",
    "--namespace",
    "--context",
    "--cluster",
    "--kubeconfig",
    "-l",
    "--selector",
    "-o",
    "--output",
    "-f",
    "--filename",
    "-c",
    "--container",
    "--field-selector",
    "--sort-by",
];

/// Positional arguments after the keyword, with flags and their values removed.
///
/// Returns `None` when the command does not start with `keyword`.
pub fn positional_args<'a>(command: &'a str, keyword: &str) -> Option<Vec<&'a str>> {
    let mut tokens = command.split_whitespace();
    if tokens.next()? != keyword {
        return None;
    }
    let mut args = Vec::new();
    let mut skip_value = false;
    for token in tokens {
        if skip_value {
            skip_value = false;
            continue;
        }
        if token == "--" {
            break;
        }
        if token.starts_with('-') {
            skip_value = VALUE_FLAGS.contains(&token);
            continue;
        }
        args.push(token);
    }
    Some(args)
}

/// Value of the `-o`/`--output` flag, if any.
pub(crate) fn output_format(command: &str) -> Option<&str> {
    let mut tokens = command.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "-o" || token == "--output" {
            return tokens.next();
        }
        if let Some(value) = token.strip_prefix("--output=").or_else(|| token.strip_prefix("-o=")) {
            return Some(value);
        }
        if let Some(value) = token.strip_prefix("-o").filter(|v| !v.is_empty()) {
            return Some(value);
        }
    }
    None
}

/// True when the command already selects a namespace (or all of them).
pub fn has_namespace_flag(command: &str) -> bool {
    command.split_whitespace().any(|token| {
        matches!(token, "-n" | "-A" | "--all-namespaces" | "--namespace")
            || token.starts_with("--namespace=")
            || token.starts_with("-n=")
            || token.starts_with("--all-namespaces=")
    })
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
