//! Conversation loop and command handling.
//!
//! The agent orchestrates:
//! - Retrieval augmentation of each outgoing query
//! - Backend calls and the append-only message history
//! - Extraction of proposed `kubectl` commands from replies
//! - Gated execution, with results fed back as conversational turns
//! - The termination protocol (terminal mode, `exit`, auto-turn cap)

mod chat;
mod executor;
mod proposal;
mod session;

pub use chat::{Agent, AgentDeps};
pub use executor::{CommandGate, ExecutionResult};
pub use proposal::{KUBECTL, ProposedCommand, extract};
pub use session::SessionOptions;
