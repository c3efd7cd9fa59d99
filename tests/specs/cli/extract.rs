// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kp extract` specs

use crate::prelude::*;

#[test]
fn extracts_numbered_lines_from_stdin() {
    let out = cli().args(&["extract"]).stdin("1: kubectl get pods\nnote\n2. kubectl get svc\n").passes();
    similar_asserts::assert_eq!(out.stdout(), "kubectl get pods\nkubectl get svc\n");
}

#[test]
fn extracts_semicolon_form_from_file() {
    let sandbox = Sandbox::new();
    sandbox.file("generated.txt", "```bash\nkubectl get pods; kubectl get svc\n```\n");

    let out = sandbox.cli().args(&["extract", "generated.txt"]).passes();

    similar_asserts::assert_eq!(out.stdout(), "kubectl get pods\nkubectl get svc\n");
}

#[test]
fn prose_yields_nothing() {
    let out = cli().args(&["extract"]).stdin("I cannot help with that.\n").passes();
    similar_asserts::assert_eq!(out.stdout(), "");
}

#[test]
fn missing_file_fails() {
    cli().args(&["extract", "absent.txt"]).fails_with(1).stderr_has("failed to read absent.txt");
}

#[test]
fn keyword_comes_from_config() {
    let sandbox = Sandbox::new();
    sandbox.file("kp.toml", "[execution]\nkeyword = \"oc\"\n");

    let out = sandbox.cli().args(&["extract"]).stdin("oc get pods\nkubectl get pods\n").passes();

    similar_asserts::assert_eq!(out.stdout(), "oc get pods\n");
}
