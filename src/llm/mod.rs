//! LLM integration.
//!
//! A single OpenAI-compatible chat completions provider. The rest of the
//! crate only sees the [`LlmProvider`] trait.

mod openai;
mod provider;

pub use openai::OpenAiProvider;
pub use provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider, Role,
};

use std::sync::Arc;

use crate::config::LlmConfig;

/// Create an LLM provider from configuration.
pub fn create_llm_provider(config: &LlmConfig) -> Arc<dyn LlmProvider> {
    tracing::info!(model = %config.model, "Using OpenAI-compatible chat completions API");
    Arc::new(OpenAiProvider::new(config.clone()))
}
