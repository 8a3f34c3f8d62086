//! The conversation loop.
//!
//! The agent owns the message history and drives the exchange: augment the
//! latest user turn, call the backend, scan the reply for a proposed
//! command, and either execute it through the gate (feeding the result back
//! as the next user turn without human input) or hand control back to the
//! human. History is append-only and discarded when the conversation ends.
//!
//! Augmentation is visible only to the outgoing backend call. The history
//! always stores the raw user text and the raw assistant reply.

use std::sync::Arc;

use crate::agent::executor::CommandGate;
use crate::agent::proposal::{self, ProposedCommand};
use crate::agent::session::SessionOptions;
use crate::error::AgentError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider, Role};
use crate::retrieval::Augmenter;
use crate::ui::{Presenter, PromptReader};

/// The literal input that ends an interactive conversation. Matched exactly
/// after trimming whitespace, case-sensitive.
const EXIT_COMMAND: &str = "exit";

/// Where the loop is between suspension points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    AwaitingModel,
    AwaitingCommandDecision,
    AwaitingHumanInput,
    Done,
}

/// Collaborators injected into the agent.
pub struct AgentDeps {
    pub llm: Arc<dyn LlmProvider>,
    pub augmenter: Augmenter,
    pub gate: CommandGate,
    pub presenter: Arc<dyn Presenter>,
}

/// The conversation agent.
pub struct Agent {
    deps: AgentDeps,
    options: SessionOptions,
    history: Vec<ChatMessage>,
}

impl Agent {
    /// Create an agent with a seeded system message.
    pub fn new(deps: AgentDeps, options: SessionOptions) -> Self {
        let system = system_prompt(options.execution_enabled);
        Self {
            deps,
            options,
            history: vec![ChatMessage::system(system)],
        }
    }

    /// The conversation history so far. The first element is always the
    /// single system message.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Drive the conversation to completion.
    ///
    /// `command_output`, when supplied, is prepended context from a command
    /// the caller already ran (the `explain` flow). In terminal mode exactly
    /// one backend call is made; in interactive mode the loop runs until the
    /// human types `exit` or input ends.
    pub async fn start(
        &mut self,
        initial_prompt: &str,
        command_output: Option<&str>,
        reader: &mut dyn PromptReader,
    ) -> Result<(), AgentError> {
        let first_turn = match command_output {
            Some(output) => format!("{initial_prompt}\n\nCommand output:\n{output}"),
            None => initial_prompt.to_string(),
        };
        self.history.push(ChatMessage::user(first_turn));

        // Consecutive auto-executed command turns since the last human turn.
        let mut auto_turns: u32 = 0;
        let mut state = LoopState::AwaitingModel;

        while state != LoopState::Done {
            state = match state {
                LoopState::AwaitingModel => {
                    let reply = self.exchange().await?;
                    self.deps.presenter.assistant_reply(&reply);
                    self.history.push(ChatMessage::assistant(reply));
                    LoopState::AwaitingCommandDecision
                }

                LoopState::AwaitingCommandDecision => {
                    let reply = self
                        .history
                        .last()
                        .map(|m| m.content.as_str())
                        .unwrap_or_default();

                    match proposal::extract(reply) {
                        Some(cmd) => {
                            let result = self.execute(&cmd).await;
                            self.history.push(ChatMessage::user(result));

                            if self.options.terminal {
                                LoopState::Done
                            } else {
                                auto_turns += 1;
                                if self.auto_turn_cap_hit(auto_turns) {
                                    self.deps.presenter.notice(
                                        "Auto-execution limit reached, handing control back to you.",
                                    );
                                    LoopState::AwaitingHumanInput
                                } else {
                                    LoopState::AwaitingModel
                                }
                            }
                        }
                        None => {
                            if self.options.terminal {
                                LoopState::Done
                            } else {
                                LoopState::AwaitingHumanInput
                            }
                        }
                    }
                }

                LoopState::AwaitingHumanInput => {
                    auto_turns = 0;
                    match reader.read_line()? {
                        None => LoopState::Done,
                        Some(line) if line.trim() == EXIT_COMMAND => LoopState::Done,
                        Some(line) => {
                            self.history.push(ChatMessage::user(line));
                            LoopState::AwaitingModel
                        }
                    }
                }

                LoopState::Done => LoopState::Done,
            };
        }

        tracing::debug!(turns = self.history.len(), "Conversation ended");
        Ok(())
    }

    /// One backend round trip. The latest user turn is augmented for this
    /// call only; the stored history is left untouched.
    async fn exchange(&self) -> Result<String, AgentError> {
        let mut outgoing = self.history.clone();
        if let Some(last) = outgoing.last_mut() {
            if last.role == Role::User {
                last.content = self.deps.augmenter.augment(&last.content).await;
            }
        }

        let response = self
            .deps
            .llm
            .complete(CompletionRequest::new(outgoing))
            .await?;

        Ok(response.content)
    }

    /// Run a proposed command through the gate, announcing it around the
    /// execution. The returned text becomes the next user turn verbatim.
    async fn execute(&self, cmd: &ProposedCommand) -> String {
        self.deps.presenter.command_started(&cmd.raw_text);
        let result = self.deps.gate.run(cmd).await;
        self.deps.presenter.command_finished(&result);
        result.output
    }

    fn auto_turn_cap_hit(&self, auto_turns: u32) -> bool {
        self.options
            .max_auto_turns
            .is_some_and(|max| auto_turns >= max)
    }
}

/// Fixed persona, with the capability description matching whether the gate
/// will actually execute anything.
fn system_prompt(execution_enabled: bool) -> String {
    let mut prompt = String::from(
        "You are k9ai, an assistant for Kubernetes operators. You answer \
         questions about Kubernetes clusters using the reference context \
         supplied with each question when it is present. Be concise and \
         practical.",
    );

    if execution_enabled {
        prompt.push_str(
            " When inspecting the cluster would help, propose a single \
             kubectl command in a fenced code block; it will be executed and \
             its output returned to you as the next message.",
        );
    } else {
        prompt.push_str(
            " Command execution is disabled for this session: you may \
             suggest kubectl commands for the operator to run themselves, \
             but nothing will be executed on your behalf.",
        );
    }

    prompt
}
