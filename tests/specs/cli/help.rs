// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn kp_no_args_shows_usage() {
    cli().fails_with(2).stderr_has("Usage:");
}

#[test]
fn kp_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("run")
        .stdout_has("chat")
        .stdout_has("check")
        .stdout_has("extract");
}

#[test]
fn kp_run_help_shows_usage() {
    cli().args(&["run", "--help"]).passes().stdout_has("Usage:");
}

#[test]
fn kp_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

#[test]
fn kp_run_requires_an_instruction() {
    cli().args(&["run"]).fails_with(2).stderr_has("Usage:");
}
