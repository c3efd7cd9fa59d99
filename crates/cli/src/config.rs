// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kp.toml` configuration.
//!
//! Every key is optional. A missing default file means all defaults; a file
//! named explicitly (flag or `KP_CONFIG`) must exist.

use crate::env::{self, Overrides};
use anyhow::{Context, Result};
use kp_adapters::{COMMAND_TIMEOUT, DEFAULT_POLICY_URL, POLICY_TIMEOUT};
use kp_engine::{PipelineConfig, DEFAULT_KEYWORD, DEFAULT_NAMESPACE};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "kp.toml";
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub generation: GenerationConfig,
    pub policy: PolicyConfig,
    pub execution: ExecutionConfig,
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    pub api_url: String,
    pub model: String,
    /// Prefer `KP_LLM_API_KEY` over storing the key in the file
    pub api_key: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub url: String,
    pub timeout_ms: u64,
    pub default_namespace: String,
    pub allow_if_absent: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_POLICY_URL.to_string(),
            timeout_ms: POLICY_TIMEOUT.as_millis() as u64,
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            allow_if_absent: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionConfig {
    pub keyword: String,
    pub initial_delay_ms: u64,
    pub refined_delay_ms: u64,
    pub command_timeout_ms: u64,
    pub gate_refined: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            keyword: DEFAULT_KEYWORD.to_string(),
            initial_delay_ms: pipeline.initial_delay.as_millis() as u64,
            refined_delay_ms: pipeline.refined_delay.as_millis() as u64,
            command_timeout_ms: COMMAND_TIMEOUT.as_millis() as u64,
            gate_refined: pipeline.gate_refined,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogsConfig {
    pub dir: PathBuf,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("logs") }
    }
}

impl Config {
    /// Load from `explicit`, `KP_CONFIG` or `./kp.toml`, then apply
    /// environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let named = explicit.map(Path::to_path_buf).or_else(env::config_path);
        let mut config = match named {
            Some(path) => Self::read(&path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::read(path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply(Overrides::from_env());
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(key) = overrides.llm_api_key {
            self.generation.api_key = Some(key);
        }
        if let Some(url) = overrides.llm_api_url {
            self.generation.api_url = url;
        }
        if let Some(model) = overrides.llm_model {
            self.generation.model = model;
        }
        if let Some(url) = overrides.policy_url {
            self.policy.url = url;
        }
        if let Some(dir) = overrides.log_dir {
            self.logs.dir = dir;
        }
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            keyword: self.execution.keyword.clone(),
            initial_delay: Duration::from_millis(self.execution.initial_delay_ms),
            refined_delay: Duration::from_millis(self.execution.refined_delay_ms),
            gate_refined: self.execution.gate_refined,
        }
    }

    pub fn policy_timeout(&self) -> Duration {
        Duration::from_millis(self.policy.timeout_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.execution.command_timeout_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
