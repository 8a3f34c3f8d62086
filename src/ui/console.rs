//! Terminal implementations of the presentation and input boundaries.

use std::io;

use crossterm::style::Stylize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::agent::ExecutionResult;
use crate::ui::{Presenter, PromptReader};

/// Styled console output.
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn notice(&self, text: &str) {
        println!("{}", text.dark_grey());
    }

    fn assistant_reply(&self, text: &str) {
        println!("\n{}", "k9ai".green().bold());
        println!("{}\n", text);
    }

    fn command_started(&self, command: &str) {
        println!("{} {}", "running:".yellow(), command);
    }

    fn command_finished(&self, result: &ExecutionResult) {
        if result.succeeded {
            println!("{}", "command complete".green());
        } else {
            println!("{}", "command failed".red());
        }
        if !result.output.is_empty() {
            println!("{}", result.output);
        }
    }
}

/// Line editor for interactive turns.
pub struct ConsolePrompt {
    editor: DefaultEditor,
}

impl ConsolePrompt {
    pub fn new() -> io::Result<Self> {
        let editor = DefaultEditor::new().map_err(io::Error::other)?;
        Ok(Self { editor })
    }
}

impl PromptReader for ConsolePrompt {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        match self.editor.readline("you> ") {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
            Err(e) => Err(io::Error::other(e)),
        }
    }
}
