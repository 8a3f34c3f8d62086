//! Command-line front end.
//!
//! Three entry points into the same conversation loop: open chat, explain
//! the output of a kubectl command, and troubleshoot a described problem.

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::agent::{Agent, AgentDeps, CommandGate, KUBECTL, ProposedCommand, SessionOptions};
use crate::config::Settings;
use crate::llm::create_llm_provider;
use crate::retrieval::create_augmenter;
use crate::ui::{ConsolePresenter, ConsolePrompt, Presenter, PromptReader};

#[derive(Parser, Debug)]
#[command(
    name = "k9ai",
    version,
    about = "Retrieval-augmented Kubernetes assistant",
    long_about = "Chat about your Kubernetes cluster with an LLM grounded in \
                  k8s documentation. The model can propose kubectl commands; \
                  with execution enabled they are run and their output is fed \
                  back into the conversation. Prompts and command output are \
                  sent to the configured LLM backend."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start an open conversation about the cluster
    Chat {
        /// Initial prompt to start the conversation
        #[arg(short, long)]
        prompt: Option<String>,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Run a kubectl command and have its output explained
    Explain {
        /// kubectl command whose output will be explained
        #[arg(long)]
        cmd: String,

        /// Additional prompt to go along with the command output
        #[arg(short, long)]
        prompt: Option<String>,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Suggest a fix for a described (or discovered) problem
    Fix {
        /// Description of the problem
        #[arg(short, long)]
        prompt: Option<String>,

        #[command(flatten)]
        session: SessionArgs,
    },
}

/// Flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// End the conversation after a single exchange
    #[arg(short, long)]
    pub terminal: bool,

    /// Never execute proposed kubectl commands
    #[arg(long)]
    pub disable_execution: bool,
}

impl SessionArgs {
    fn options(&self, settings: &Settings) -> SessionOptions {
        SessionOptions::new(!self.disable_execution, self.terminal)
            .with_max_auto_turns(settings.agent.max_auto_turns)
    }
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    match cli.command {
        Command::Chat { prompt, session } => run_chat(prompt, session, settings).await,
        Command::Explain {
            cmd,
            prompt,
            session,
        } => run_explain(cmd, prompt, session, settings).await,
        Command::Fix { prompt, session } => run_fix(prompt, session, settings).await,
    }
}

async fn run_chat(
    prompt: Option<String>,
    session: SessionArgs,
    settings: Settings,
) -> anyhow::Result<()> {
    let presenter: Arc<dyn Presenter> = Arc::new(ConsolePresenter);
    let mut reader = ConsolePrompt::new()?;

    presenter.notice("Starting conversation with k9ai...");
    if !session.terminal {
        presenter.notice("Type 'exit' to end the conversation.");
    }

    let initial = match prompt {
        Some(p) => p,
        None => {
            if session.terminal {
                anyhow::bail!("--terminal requires an initial --prompt");
            }
            match reader.read_line()? {
                Some(line) if !line.trim().is_empty() => line,
                _ => return Ok(()),
            }
        }
    };

    let mut agent = build_agent(&settings, &session, presenter);
    agent.start(&initial, None, &mut reader).await?;
    Ok(())
}

async fn run_explain(
    cmd: String,
    prompt: Option<String>,
    session: SessionArgs,
    settings: Settings,
) -> anyhow::Result<()> {
    if cmd.split_whitespace().next() != Some(KUBECTL) {
        anyhow::bail!("command must be a {} command", KUBECTL);
    }

    let presenter: Arc<dyn Presenter> = Arc::new(ConsolePresenter);
    let mut reader = ConsolePrompt::new()?;

    // The user's own command runs regardless of --disable-execution; that
    // flag only governs commands the model proposes.
    presenter.command_started(&cmd);
    let result = CommandGate::new(true)
        .run(&ProposedCommand {
            raw_text: cmd.clone(),
        })
        .await;
    presenter.command_finished(&result);
    if !result.succeeded {
        anyhow::bail!("command failed:\n{}", result.output);
    }

    let initial = prompt.unwrap_or_else(|| {
        format!(
            "Concisely explain the output of the following command: {}",
            cmd
        )
    });

    presenter.notice("Explaining kubectl results with k9ai...");
    if !session.terminal {
        presenter.notice("Type 'exit' to end the conversation.");
    }

    let mut agent = build_agent(&settings, &session, presenter);
    agent
        .start(&initial, Some(&result.output), &mut reader)
        .await?;
    Ok(())
}

async fn run_fix(
    prompt: Option<String>,
    session: SessionArgs,
    settings: Settings,
) -> anyhow::Result<()> {
    let presenter: Arc<dyn Presenter> = Arc::new(ConsolePresenter);
    let mut reader = ConsolePrompt::new()?;

    let initial = fix_prompt(prompt.as_deref());

    presenter.notice("Looking for a fix with k9ai...");
    if !session.terminal {
        presenter.notice("Type 'exit' to end the conversation.");
    }

    let mut agent = build_agent(&settings, &session, presenter);
    agent.start(&initial, None, &mut reader).await?;
    Ok(())
}

/// Compose the troubleshooting prompt for `fix`.
fn fix_prompt(problem: Option<&str>) -> String {
    let mut prompt =
        String::from("Look for the root cause of the problem and suggest a fix. ");
    match problem {
        Some(p) => {
            prompt.push_str("The problem is:\n");
            prompt.push_str(p);
        }
        None => prompt.push_str(
            "Try to find the problem with your tools, following your best \
             instincts for troubleshooting.",
        ),
    }
    prompt
}

fn build_agent(
    settings: &Settings,
    session: &SessionArgs,
    presenter: Arc<dyn Presenter>,
) -> Agent {
    let options = session.options(settings);
    Agent::new(
        AgentDeps {
            llm: create_llm_provider(&settings.llm),
            augmenter: create_augmenter(&settings.retrieval),
            gate: CommandGate::new(options.execution_enabled),
            presenter,
        },
        options,
    )
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_parse_chat_flags() {
        let cli = Cli::parse_from([
            "k9ai",
            "chat",
            "-p",
            "list pods",
            "--terminal",
            "--disable-execution",
        ]);

        match cli.command {
            Command::Chat { prompt, session } => {
                assert_eq!(prompt.as_deref(), Some("list pods"));
                assert!(session.terminal);
                assert!(session.disable_execution);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_explain_requires_cmd() {
        assert!(Cli::try_parse_from(["k9ai", "explain"]).is_err());

        let cli = Cli::parse_from(["k9ai", "explain", "--cmd", "kubectl get pods"]);
        match cli.command {
            Command::Explain { cmd, session, .. } => {
                assert_eq!(cmd, "kubectl get pods");
                assert!(!session.terminal);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_fix_prompt_composition() {
        let described = fix_prompt(Some("web-0 is CrashLoopBackOff"));
        assert!(described.contains("root cause"));
        assert!(described.contains("CrashLoopBackOff"));

        let open_ended = fix_prompt(None);
        assert!(open_ended.contains("best"));
    }
}
