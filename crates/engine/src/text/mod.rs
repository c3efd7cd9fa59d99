// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort text heuristics.
//!
//! Everything that reads model output or kubectl output lives here so that a
//! change in either format breaks a pinned test instead of silently
//! mis-parsing in the executor or pipeline.

mod args;
mod extract;
mod report;
mod steps;
mod table;

pub use args::{has_namespace_flag, positional_args};
pub use extract::{CommandExtractor, DEFAULT_KEYWORD};
pub use report::{error_summary, has_error_marker, ERROR_MARKER, UNKNOWN_ERROR};
pub use steps::extract_steps;
pub use table::{listing_kind, parse_listing_names};
