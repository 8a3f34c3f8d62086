//! Immutable per-conversation options.

/// Options bound once at conversation start from caller-supplied flags.
/// Never mutated mid-conversation; the agent takes them by value at
/// construction instead of threading booleans through call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Whether proposed commands may actually be executed.
    pub execution_enabled: bool,
    /// Terminal mode: one question, one answer, then exit.
    pub terminal: bool,
    /// Cap on consecutive auto-executed command turns in interactive mode.
    /// When hit, the loop asks the human instead of calling the model again.
    /// `None` means unbounded.
    pub max_auto_turns: Option<u32>,
}

impl SessionOptions {
    pub fn new(execution_enabled: bool, terminal: bool) -> Self {
        Self {
            execution_enabled,
            terminal,
            max_auto_turns: None,
        }
    }

    pub fn with_max_auto_turns(mut self, max: Option<u32>) -> Self {
        self.max_auto_turns = max;
        self
    }
}
