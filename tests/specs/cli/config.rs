// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration specs

use crate::prelude::*;

#[test]
fn invalid_config_is_reported() {
    let sandbox = Sandbox::new();
    sandbox.file("kp.toml", "[cluster]\nname = \"prod\"\n");

    sandbox.cli().args(&["extract"]).stdin("").fails_with(1).stderr_has("invalid config");
}

#[test]
fn explicit_missing_config_is_an_error() {
    cli()
        .args(&["--config", "nope.toml", "extract"])
        .stdin("")
        .fails_with(1)
        .stderr_has("failed to read config nope.toml");
}

#[test]
fn run_without_api_key_fails() {
    cli().args(&["run", "list", "pods"]).fails_with(1).stderr_has("LLM API key not set");
}
