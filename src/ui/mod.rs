//! Presentation and input boundaries.
//!
//! The conversation loop never touches the terminal directly; it emits
//! events through [`Presenter`] and reads human turns through
//! [`PromptReader`]. Tests substitute both.

mod console;

pub use console::{ConsolePresenter, ConsolePrompt};

use std::io;

use crate::agent::ExecutionResult;

/// Output events emitted by the conversation loop.
pub trait Presenter: Send + Sync {
    /// An informational line (banners, hints, cap notices).
    fn notice(&self, text: &str);

    /// The assistant's reply for this turn.
    fn assistant_reply(&self, text: &str);

    /// A proposed command is about to run.
    fn command_started(&self, command: &str);

    /// A proposed command finished (or was refused).
    fn command_finished(&self, result: &ExecutionResult);
}

/// One line of human input per turn.
///
/// The read blocks the loop; the session is strictly sequential with at most
/// one outstanding suspension point. `None` signals end of input (EOF or
/// interrupt) and is treated like `exit`.
pub trait PromptReader: Send {
    fn read_line(&mut self) -> io::Result<Option<String>>;
}
