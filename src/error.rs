//! Error types shared across the crate.
//!
//! Only backend failures abort a conversation. Retrieval failures degrade to
//! an unaugmented query, and execution failures are fed back into the
//! conversation as ordinary content so the model can react to them.

use std::time::Duration;

use thiserror::Error;

/// Errors from the LLM backend. Not recoverable inside the conversation
/// loop; the session aborts and the error is surfaced to the caller.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM request failed ({provider}): {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Rate limited by {provider}, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Errors from the retrieval store. The augmenter catches these and falls
/// back to the unaugmented query.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Retrieval request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid retrieval response: {0}")]
    InvalidResponse(String),
}

/// Top-level error for a conversation session.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Failed to read user input: {0}")]
    Input(#[from] std::io::Error),
}

/// Configuration errors surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}
