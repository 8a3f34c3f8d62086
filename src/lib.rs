//! k9ai: a retrieval-augmented conversational assistant for Kubernetes
//! operators.
//!
//! The crate is organized around four boundaries:
//! - [`llm`]: the chat-completion backend behind the [`llm::LlmProvider`] trait
//! - [`retrieval`]: documentation lookup and ephemeral query augmentation
//! - [`agent`]: the conversation loop, command extraction, and the gated
//!   executor that runs proposed `kubectl` commands
//! - [`ui`]: injected presentation and input capabilities, so the loop itself
//!   never touches the terminal

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod retrieval;
pub mod ui;
