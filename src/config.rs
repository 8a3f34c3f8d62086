//! Environment-backed configuration.
//!
//! Settings are gathered once at startup (after `dotenvy` has loaded any
//! `.env` file) and handed to the components that need them. Nothing reads
//! the environment after that point.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default OpenAI-compatible API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default chat model.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default number of documentation passages per query.
const DEFAULT_TOP_K: usize = 4;

/// Default cap on consecutive auto-executed command turns.
const DEFAULT_MAX_AUTO_TURNS: u32 = 8;

/// LLM backend configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of the chat completions API.
    pub base_url: String,
    /// API key, kept out of Debug output.
    pub api_key: SecretString,
    /// Model identifier.
    pub model: String,
}

/// Retrieval store configuration.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Base URL of the retrieval service. `None` disables augmentation.
    pub base_url: Option<String>,
    /// Passages to fetch per query.
    pub top_k: usize,
}

/// Conversation loop configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Cap on consecutive auto-executed command turns in interactive mode.
    /// `None` means unbounded.
    pub max_auto_turns: Option<u32>,
}

/// All settings, loaded once from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
    pub agent: AgentConfig,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// `OPENAI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|v| !v.is_empty())
            .map(SecretString::from)
            .ok_or(ConfigError::MissingVar("OPENAI_API_KEY"))?;

        let llm = LlmConfig {
            base_url: env_or("K9AI_BASE_URL", DEFAULT_BASE_URL),
            api_key,
            model: env_or("K9AI_MODEL", DEFAULT_MODEL),
        };

        let retrieval = RetrievalConfig {
            base_url: std::env::var("K9AI_RETRIEVAL_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            top_k: match std::env::var("K9AI_RETRIEVAL_TOP_K") {
                Ok(v) => parse_top_k(&v)?,
                Err(_) => DEFAULT_TOP_K,
            },
        };

        let agent = AgentConfig {
            max_auto_turns: match std::env::var("K9AI_MAX_AUTO_TURNS") {
                Ok(v) => parse_max_auto_turns(&v)?,
                Err(_) => Some(DEFAULT_MAX_AUTO_TURNS),
            },
        };

        Ok(Self {
            llm,
            retrieval,
            agent,
        })
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parse `K9AI_RETRIEVAL_TOP_K`. Zero is rejected; an empty store query
/// is expressed by unsetting `K9AI_RETRIEVAL_URL` instead.
fn parse_top_k(value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err(ConfigError::InvalidVar {
            var: "K9AI_RETRIEVAL_TOP_K",
            reason: "must be at least 1".to_string(),
        }),
        Ok(n) => Ok(n),
        Err(e) => Err(ConfigError::InvalidVar {
            var: "K9AI_RETRIEVAL_TOP_K",
            reason: e.to_string(),
        }),
    }
}

/// Parse `K9AI_MAX_AUTO_TURNS`. Zero means unbounded.
fn parse_max_auto_turns(value: &str) -> Result<Option<u32>, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(0) => Ok(None),
        Ok(n) => Ok(Some(n)),
        Err(e) => Err(ConfigError::InvalidVar {
            var: "K9AI_MAX_AUTO_TURNS",
            reason: e.to_string(),
        }),
    }
}
