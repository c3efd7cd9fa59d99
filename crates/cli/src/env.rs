// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;

/// Config file path override
pub fn config_path() -> Option<PathBuf> {
    non_empty("KP_CONFIG").map(PathBuf::from)
}

/// Log filter directive (`tracing_subscriber::EnvFilter` syntax)
pub const LOG_FILTER_VAR: &str = "KP_LOG";

/// Values from the environment that take precedence over `kp.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub llm_api_key: Option<String>,
    pub llm_api_url: Option<String>,
    pub llm_model: Option<String>,
    pub policy_url: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self {
            llm_api_key: non_empty("KP_LLM_API_KEY"),
            llm_api_url: non_empty("KP_LLM_API_URL"),
            llm_model: non_empty("KP_LLM_MODEL"),
            policy_url: non_empty("KP_POLICY_URL"),
            log_dir: non_empty("KP_LOG_DIR").map(PathBuf::from),
        }
    }
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.is_empty())
}
