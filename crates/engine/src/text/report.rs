// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error detection in execution reports.

/// Marker whose presence (any case) means a run needs refinement.
pub const ERROR_MARKER: &str = "error:";

/// Summary used when a report is flagged but no line carries the marker.
pub const UNKNOWN_ERROR: &str = "Unknown error";

pub fn has_error_marker(report: &str) -> bool {
    report.to_ascii_lowercase().contains(ERROR_MARKER)
}

/// Lines of `report` that carry the error marker, joined by newlines.
pub fn error_summary(report: &str) -> String {
    let lines: Vec<&str> =
        report.lines().filter(|line| has_error_marker(line)).map(str::trim).collect();
    if lines.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
