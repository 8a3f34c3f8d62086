//! The single choke point through which proposed commands reach the shell.
//!
//! The gate enforces the execution toggle and validates that the command's
//! first token is `kubectl` before anything is spawned. The prefix check is
//! advisory, not a security boundary: it does not stop the model from
//! attaching destructive flags to a cluster operation, and an executed
//! command runs with the operator's own credentials against the live
//! cluster. Nothing here is sandboxed or reversible.
//!
//! Every outcome, including refusals and non-zero exits, is packaged as an
//! [`ExecutionResult`] so it can become the next conversational turn. Shell
//! failures are never retried and never swallowed.

use std::process::Stdio;

use tokio::process::Command;

use crate::agent::proposal::{KUBECTL, ProposedCommand};

/// Maximum captured output before truncation (64KB).
const MAX_OUTPUT_SIZE: usize = 64 * 1024;

/// Outcome of one gated execution, consumed immediately to build the next
/// user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub succeeded: bool,
    /// Captured output on success, captured error text or refusal otherwise.
    pub output: String,
}

/// Gate deciding whether a proposed command may run.
///
/// The execution toggle is bound at construction and cannot change for the
/// lifetime of the session. This is the sole enforcement point of the
/// `--disable-execution` flag.
pub struct CommandGate {
    execution_enabled: bool,
}

impl CommandGate {
    pub fn new(execution_enabled: bool) -> Self {
        Self { execution_enabled }
    }

    pub fn execution_enabled(&self) -> bool {
        self.execution_enabled
    }

    /// Run the proposed command, or refuse it.
    ///
    /// With execution disabled, returns immediately without spawning
    /// anything. With execution enabled, the command must start with
    /// `kubectl` or it is rejected, again without a spawn.
    pub async fn run(&self, cmd: &ProposedCommand) -> ExecutionResult {
        if !self.execution_enabled {
            tracing::info!("Refusing proposed command, execution is disabled");
            return ExecutionResult {
                succeeded: false,
                output: "Command execution is disabled for this session. The proposed \
                         command was not run; continue the conversation without \
                         executing commands."
                    .to_string(),
            };
        }

        if cmd.raw_text.split_whitespace().next() != Some(KUBECTL) {
            tracing::warn!("Rejecting non-kubectl command: {}", cmd.raw_text);
            return ExecutionResult {
                succeeded: false,
                output: format!(
                    "Refusing to run a command that is not a {} invocation: {}",
                    KUBECTL, cmd.raw_text
                ),
            };
        }

        tracing::info!("Executing: {}", cmd.raw_text);
        run_shell(&cmd.raw_text).await
    }
}

/// Run a command line through the shell and capture its output.
///
/// Runs to completion; there is no timeout or cancellation. A hanging
/// command blocks the conversation, which is accepted for a single-user
/// session.
async fn run_shell(command_text: &str) -> ExecutionResult {
    let output = Command::new("sh")
        .args(["-c", command_text])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            return ExecutionResult {
                succeeded: false,
                output: format!("Failed to spawn command: {}", e),
            };
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let combined = if stderr.trim().is_empty() {
        stdout.trim_end().to_string()
    } else if stdout.trim().is_empty() {
        stderr.trim_end().to_string()
    } else {
        format!(
            "{}\n\n--- stderr ---\n{}",
            stdout.trim_end(),
            stderr.trim_end()
        )
    };

    ExecutionResult {
        succeeded: output.status.success(),
        output: truncate_output(&combined),
    }
}

/// Keep the head and tail when output exceeds the cap.
fn truncate_output(s: &str) -> String {
    if s.len() <= MAX_OUTPUT_SIZE {
        s.to_string()
    } else {
        let half = MAX_OUTPUT_SIZE / 2;
        let mut head_end = half;
        while !s.is_char_boundary(head_end) {
            head_end -= 1;
        }
        let mut tail_start = s.len() - half;
        while !s.is_char_boundary(tail_start) {
            tail_start += 1;
        }
        format!(
            "{}\n\n... [truncated {} bytes] ...\n\n{}",
            &s[..head_end],
            s.len() - MAX_OUTPUT_SIZE,
            &s[tail_start..]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposed(raw: &str) -> ProposedCommand {
        ProposedCommand {
            raw_text: raw.to_string(),
        }
    }

    #[tokio::test]
    async fn test_disabled_gate_refuses_without_spawning() {
        let gate = CommandGate::new(false);
        let result = gate.run(&proposed("kubectl get pods")).await;

        assert!(!result.succeeded);
        assert!(result.output.contains("disabled"));
    }

    #[tokio::test]
    async fn test_non_kubectl_command_rejected_without_spawning() {
        let gate = CommandGate::new(true);
        let result = gate.run(&proposed("rm -rf /tmp/scratch")).await;

        assert!(!result.succeeded);
        assert!(result.output.contains("kubectl"));
    }

    #[tokio::test]
    async fn test_run_shell_captures_stdout() {
        let result = run_shell("echo hello").await;

        assert!(result.succeeded);
        assert_eq!(result.output, "hello");
    }

    #[tokio::test]
    async fn test_run_shell_nonzero_exit_surfaces_stderr() {
        let result = run_shell("echo NotFound >&2; exit 1").await;

        assert!(!result.succeeded);
        assert_eq!(result.output, "NotFound");
    }

    #[tokio::test]
    async fn test_run_shell_combines_streams() {
        let result = run_shell("echo out; echo err >&2").await;

        assert!(result.succeeded);
        assert!(result.output.contains("out"));
        assert!(result.output.contains("--- stderr ---"));
        assert!(result.output.contains("err"));
    }

    #[test]
    fn test_truncate_output() {
        let short = "x".repeat(100);
        assert_eq!(truncate_output(&short), short);

        let long = "y".repeat(MAX_OUTPUT_SIZE + 1000);
        let truncated = truncate_output(&long);
        assert!(truncated.len() < long.len());
        assert!(truncated.contains("truncated 1000 bytes"));
    }
}
