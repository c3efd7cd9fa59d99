// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource listing detection and kubectl table parsing.

use super::args::{output_format, positional_args};
use kp_core::ResourceKind;

/// The kind listed by a `get <kind>` command that names no resource.
///
/// Commands that name a resource, list several kinds at once or ask for a
/// non-table output format return `None`.
pub fn listing_kind(command: &str, keyword: &str) -> Option<ResourceKind> {
    let args = positional_args(command, keyword)?;
    let [verb, kind] = args.as_slice() else {
        return None;
    };
    if *verb != "get" || kind.contains(',') || kind.contains('/') {
        return None;
    }
    if output_format(command).is_some_and(|format| format != "wide") {
        return None;
    }
    // `deployments.apps` lists the same kind as `deployments`
    let kind = kind.split_once('.').map_or(*kind, |(name, _group)| name);
    kind.parse().ok()
}

/// Resource names from a kubectl table.
///
/// The first non-blank line must be a header starting with `NAME` or, for
/// `-A` listings, `NAMESPACE`; in the latter case names are the second column.
pub fn parse_listing_names(stdout: &str) -> Vec<String> {
    let mut lines = stdout.lines().filter(|line| !line.trim().is_empty());
    let column = match lines.next().and_then(|header| header.split_whitespace().next()) {
        Some("NAME") => 0,
        Some("NAMESPACE") => 1,
        _ => return Vec::new(),
    };
    lines.filter_map(|row| row.split_whitespace().nth(column)).map(String::from).collect()
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
