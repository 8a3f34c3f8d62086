//! Extraction of proposed `kubectl` commands from model replies.
//!
//! Pure text analysis, no side effects. The extraction rule: fenced code
//! blocks are scanned first, then the reply body; the candidate is the
//! first line whose first token is `kubectl` (an optional `$ ` shell prompt
//! prefix is stripped). When a reply contains several candidates only the
//! first is taken; the rest are ignored. That is a known limitation, not an
//! error.

use std::sync::LazyLock;

use regex::Regex;

/// The only program the executor gate will run.
pub const KUBECTL: &str = "kubectl";

/// A command the model proposed in its reply. Derived per turn, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedCommand {
    pub raw_text: String,
}

/// Fenced code blocks, with or without a language tag.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[a-zA-Z]*\n(.*?)```").expect("valid fence regex"));

/// Find the command the reply proposes, if any.
pub fn extract(reply: &str) -> Option<ProposedCommand> {
    for cap in FENCE_RE.captures_iter(reply) {
        if let Some(cmd) = first_kubectl_line(&cap[1]) {
            return Some(ProposedCommand { raw_text: cmd });
        }
    }

    first_kubectl_line(reply).map(|cmd| ProposedCommand { raw_text: cmd })
}

/// First line in `text` whose first token is `kubectl`.
fn first_kubectl_line(text: &str) -> Option<String> {
    text.lines()
        .map(|line| line.trim().trim_start_matches("$ ").trim())
        .find(|line| line.split_whitespace().next() == Some(KUBECTL))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_extract_bare_line() {
        let reply = "You can list pods with:\nkubectl get pods -n default\nThat shows all pods.";
        let cmd = extract(reply).unwrap();
        assert_eq!(cmd.raw_text, "kubectl get pods -n default");
    }

    #[test]
    fn test_extract_fenced_block_with_language_tag() {
        let reply = "Run this:\n```bash\nkubectl describe pod web-0\n```\n";
        let cmd = extract(reply).unwrap();
        assert_eq!(cmd.raw_text, "kubectl describe pod web-0");
    }

    #[test]
    fn test_extract_strips_shell_prompt_prefix() {
        let reply = "```\n$ kubectl get nodes\n```";
        assert_eq!(extract(reply).unwrap().raw_text, "kubectl get nodes");
    }

    #[test]
    fn test_fenced_block_wins_over_bare_line() {
        let reply = "kubectl get pods\n```sh\nkubectl get services\n```";
        assert_eq!(extract(reply).unwrap().raw_text, "kubectl get services");
    }

    #[test]
    fn test_first_of_multiple_candidates() {
        let reply = "kubectl get pods\nkubectl get deployments";
        assert_eq!(extract(reply).unwrap().raw_text, "kubectl get pods");
    }

    #[test]
    fn test_no_command() {
        assert_eq!(extract("Pods are the smallest deployable units."), None);
        assert_eq!(extract(""), None);
    }

    #[test]
    fn test_kubectl_must_be_its_own_token() {
        assert_eq!(extract("kubectlify your workflow"), None);
        assert_eq!(extract("use kubectl get pods"), None);
    }

    #[test]
    fn test_fenced_block_without_command_falls_through() {
        let reply = "```yaml\nkind: Pod\n```\nkubectl apply -f pod.yaml";
        assert_eq!(extract(reply).unwrap().raw_text, "kubectl apply -f pod.yaml");
    }

    #[test]
    fn test_extract_is_pure() {
        let reply = "kubectl get pods";
        assert_eq!(extract(reply), extract(reply));
    }
}
