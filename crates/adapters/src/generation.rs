// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generation collaborator: reasoning, commands and refinements from an LLM.
//!
//! The adapter returns raw text. Extracting steps and commands from it is the
//! engine's job, so a model that ignores the output format degrades into
//! "no commands" rather than an error here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the generation service
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Request(String),
    #[error("generation API error: {0}")]
    Api(String),
    #[error("generation returned an empty response")]
    Empty,
}

/// Context for asking the model to correct a failed command list.
#[derive(Debug, Clone, Copy)]
pub struct RefineRequest<'a> {
    pub instruction: &'a str,
    /// Commands as first generated, before policy filtering
    pub previous: &'a [String],
    /// Error lines extracted from the execution report
    pub error: &'a str,
}

/// Adapter for the text generation service
#[async_trait]
pub trait Generator: Clone + Send + Sync + 'static {
    /// Step-based reasoning for an instruction.
    async fn reasoning(&self, instruction: &str) -> Result<String, GenerationError>;

    /// Commands implementing the given reasoning.
    async fn commands(&self, reasoning: &str) -> Result<String, GenerationError>;

    /// Corrected commands after an execution error.
    async fn refine(&self, request: RefineRequest<'_>) -> Result<String, GenerationError>;
}

/// Wire format of the completion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFormat {
    Anthropic,
    OpenAi,
}

impl ApiFormat {
    /// Detect API format from URL; anything that isn't Anthropic speaks the
    /// OpenAI-compatible chat completions format.
    pub fn detect(url: &str) -> Self {
        if url.contains("anthropic.com") {
            Self::Anthropic
        } else {
            Self::OpenAi
        }
    }
}

/// HTTP client for an LLM completion API.
#[derive(Clone)]
pub struct LlmGenerator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
    format: ApiFormat,
    /// Command keyword the prompts ask every line to start with
    keyword: String,
}

impl LlmGenerator {
    pub fn new(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
        model: impl Into<String>,
        keyword: impl Into<String>,
    ) -> Self {
        let api_url = api_url.into();
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            format: ApiFormat::detect(&api_url),
            api_url,
            model: model.into(),
            keyword: keyword.into(),
        }
    }

    pub fn format(&self) -> ApiFormat {
        self.format
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, GenerationError> {
        let text = match self.format {
            ApiFormat::Anthropic => self.complete_anthropic(system, user, max_tokens).await?,
            ApiFormat::OpenAi => self.complete_openai(system, user, max_tokens).await?,
        };
        tracing::debug!(model = %self.model, output = %text, "completion received");
        if text.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(text)
    }

    async fn complete_anthropic(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, GenerationError> {
        let request = AnthropicRequest {
            model: &self.model,
            max_tokens,
            system,
            messages: vec![Message { role: "user", content: user }],
        };
        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api(error_text));
        }

        let completion: AnthropicResponse =
            response.json().await.map_err(|e| GenerationError::Request(e.to_string()))?;
        completion.content.into_iter().next().map(|c| c.text).ok_or(GenerationError::Empty)
    }

    async fn complete_openai(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, GenerationError> {
        let request = OpenAiRequest {
            model: &self.model,
            max_tokens,
            messages: vec![
                Message { role: "system", content: system },
                Message { role: "user", content: user },
            ],
        };
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api(error_text));
        }

        let completion: OpenAiResponse =
            response.json().await.map_err(|e| GenerationError::Request(e.to_string()))?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(GenerationError::Empty)
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn reasoning(&self, instruction: &str) -> Result<String, GenerationError> {
        tracing::info!(instruction, "generating chain-of-thought");
        self.complete(&prompts::reasoning_system(), instruction, 400).await
    }

    async fn commands(&self, reasoning: &str) -> Result<String, GenerationError> {
        tracing::info!("generating commands from chain-of-thought");
        let user = format!("Chain-of-Thought: {}", reasoning);
        self.complete(&prompts::commands_system(&self.keyword), &user, 300).await
    }

    async fn refine(&self, request: RefineRequest<'_>) -> Result<String, GenerationError> {
        tracing::info!("refining commands with error feedback");
        let user = prompts::refine_user(&request);
        self.complete(&prompts::refine_system(&self.keyword), &user, 300).await
    }
}

mod prompts {
    use super::RefineRequest;

    pub(super) fn reasoning_system() -> String {
        "You are a Kubernetes expert assistant. Provide a step-based chain-of-thought \
         reasoning for the following task. List each step in concise form. Output format:\n\n\
         Step 1: <reasoning>\nStep 2: <reasoning>\nStep 3: <reasoning>\n"
            .to_string()
    }

    pub(super) fn commands_system(keyword: &str) -> String {
        format!(
            "You are a Kubernetes command generator. Given the chain-of-thought reasoning \
             provided, generate valid {keyword} commands that implement that reasoning. \
             Output only the commands, each on a separate line, with no extra commentary. \
             Each command must start with '{keyword}'."
        )
    }

    pub(super) fn refine_system(keyword: &str) -> String {
        format!(
            "You are a Kubernetes command generator. Your task is to produce corrected \
             {keyword} commands based on the following context. Think step by step and output \
             only valid {keyword} commands (one per line), each starting with '{keyword}'."
        )
    }

    pub(super) fn refine_user(request: &RefineRequest<'_>) -> String {
        format!(
            "Original Intent: {}\nPreviously tried commands: {:?}\nError encountered: {}\n\
             Refine your reasoning and generate corrected commands. \
             Output only the commands, each on a new line, with no extra commentary.",
            request.instruction, request.previous, request.error
        )
    }
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

// OpenAI-compatible API format
#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{GenerationError, Generator, RefineRequest};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Owned copy of a refine request, for assertions
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RefineCall {
        pub instruction: String,
        pub previous: Vec<String>,
        pub error: String,
    }

    #[derive(Default)]
    struct FakeGeneratorState {
        reasoning: Option<String>,
        commands: Option<String>,
        refined: Option<String>,
        fail_with: Option<String>,
        refine_calls: Vec<RefineCall>,
        commands_calls: Vec<String>,
    }

    /// Fake generator returning scripted text.
    ///
    /// Unscripted calls return an empty string.
    #[derive(Clone, Default)]
    pub struct FakeGenerator {
        inner: Arc<Mutex<FakeGeneratorState>>,
    }

    impl FakeGenerator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_reasoning(self, text: &str) -> Self {
            self.inner.lock().reasoning = Some(text.to_string());
            self
        }

        pub fn with_commands(self, text: &str) -> Self {
            self.inner.lock().commands = Some(text.to_string());
            self
        }

        pub fn with_refined(self, text: &str) -> Self {
            self.inner.lock().refined = Some(text.to_string());
            self
        }

        /// Make every call fail with a request error.
        pub fn failing(self, message: &str) -> Self {
            self.inner.lock().fail_with = Some(message.to_string());
            self
        }

        pub fn refine_calls(&self) -> Vec<RefineCall> {
            self.inner.lock().refine_calls.clone()
        }

        /// Reasoning texts passed to `commands`.
        pub fn commands_calls(&self) -> Vec<String> {
            self.inner.lock().commands_calls.clone()
        }

        fn check_failure(&self) -> Result<(), GenerationError> {
            match &self.inner.lock().fail_with {
                Some(message) => Err(GenerationError::Request(message.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl Generator for FakeGenerator {
        async fn reasoning(&self, _instruction: &str) -> Result<String, GenerationError> {
            self.check_failure()?;
            Ok(self.inner.lock().reasoning.clone().unwrap_or_default())
        }

        async fn commands(&self, reasoning: &str) -> Result<String, GenerationError> {
            self.check_failure()?;
            let mut inner = self.inner.lock();
            inner.commands_calls.push(reasoning.to_string());
            Ok(inner.commands.clone().unwrap_or_default())
        }

        async fn refine(&self, request: RefineRequest<'_>) -> Result<String, GenerationError> {
            self.check_failure()?;
            let mut inner = self.inner.lock();
            inner.refine_calls.push(RefineCall {
                instruction: request.instruction.to_string(),
                previous: request.previous.to_vec(),
                error: request.error.to_string(),
            });
            Ok(inner.refined.clone().unwrap_or_default())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeGenerator, RefineCall};

#[cfg(test)]
#[path = "generation_tests.rs"]
mod tests;
