use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use chrono::{DateTime, Utc};
use dashboard_core::Msg;

pub const HELP: &str = "\
Commands:
  submit <url>   create a profile job for a company website
  webhook <url>  change the automation webhook endpoint
  clear          clear job history (asks for confirmation)
  yes | no       answer a pending confirmation
  list           show the dashboard again
  help           show this help
  quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Submit(String),
    Webhook(String),
    Clear,
    Confirm,
    Cancel,
    List,
    Help,
    Quit,
    Unknown(String),
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let command = match head.to_ascii_lowercase().as_str() {
            "submit" | "s" => ConsoleCommand::Submit(rest.to_string()),
            "webhook" | "w" => ConsoleCommand::Webhook(rest.to_string()),
            "clear" => ConsoleCommand::Clear,
            "yes" | "y" => ConsoleCommand::Confirm,
            "no" | "n" => ConsoleCommand::Cancel,
            "list" | "ls" => ConsoleCommand::List,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" | "q" => ConsoleCommand::Quit,
            _ => ConsoleCommand::Unknown(line.to_string()),
        };
        Some(command)
    }

    /// Messages this command feeds into the state machine.
    pub fn into_msgs(self, now: DateTime<Utc>) -> Vec<Msg> {
        match self {
            ConsoleCommand::Submit(url) => vec![Msg::InputChanged(url), Msg::SubmitClicked { now }],
            ConsoleCommand::Webhook(url) => vec![Msg::WebhookUrlChanged(url)],
            ConsoleCommand::Clear => vec![Msg::ClearHistoryRequested],
            ConsoleCommand::Confirm => vec![Msg::ClearHistoryConfirmed],
            ConsoleCommand::Cancel => vec![Msg::ClearHistoryCancelled],
            ConsoleCommand::List
            | ConsoleCommand::Help
            | ConsoleCommand::Quit
            | ConsoleCommand::Unknown(_) => Vec::new(),
        }
    }
}

/// Reads stdin lines on a background thread. End of input is reported as `Quit`.
pub fn spawn_stdin_reader(tx: mpsc::Sender<ConsoleCommand>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if let Some(command) = ConsoleCommand::parse(&line) {
                if tx.send(command).is_err() {
                    return;
                }
            }
        }
        let _ = tx.send(ConsoleCommand::Quit);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_arguments() {
        assert_eq!(
            ConsoleCommand::parse("  submit   https://acme.example  "),
            Some(ConsoleCommand::Submit("https://acme.example".to_string()))
        );
        assert_eq!(
            ConsoleCommand::parse("W https://hooks.example/x"),
            Some(ConsoleCommand::Webhook("https://hooks.example/x".to_string()))
        );
        assert_eq!(ConsoleCommand::parse("submit"), Some(ConsoleCommand::Submit(String::new())));
        assert_eq!(ConsoleCommand::parse("y"), Some(ConsoleCommand::Confirm));
        assert_eq!(ConsoleCommand::parse("   "), None);
        assert_eq!(
            ConsoleCommand::parse("frobnicate"),
            Some(ConsoleCommand::Unknown("frobnicate".to_string()))
        );
    }

    #[test]
    fn submit_sets_input_then_submits() {
        let now = Utc::now();
        let msgs = ConsoleCommand::Submit("https://acme.example".to_string()).into_msgs(now);
        assert_eq!(
            msgs,
            vec![
                Msg::InputChanged("https://acme.example".to_string()),
                Msg::SubmitClicked { now },
            ]
        );
        assert!(ConsoleCommand::List.into_msgs(now).is_empty());
    }
}
