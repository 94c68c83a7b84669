//! CLI interface for the telechat client
//!
//! Provides slash-command parsing, display formatting, and async stdin
//! reading for concurrent I/O in the main loop. The CLI is a thin shell;
//! all chat logic lives in the service layer.

use crate::error::{ClientError, Result};
use crate::models::{Conversation, Message};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text to send to the current peer
    Message(String),
    /// `/contacts <query>` - search for chat targets
    Contacts(String),
    /// `/list` - show the conversation listing
    List,
    /// `/read` - mark the current conversation as read
    Read,
    /// `/typing on|off` - signal typing state
    Typing(bool),
    /// `/quit` - stop the client
    Quit,
}

/// Parse a command from user input
pub fn parse_command(input: &str) -> Result<Command> {
    let input = input.trim();

    if !input.starts_with('/') {
        return Ok(Command::Message(input.to_string()));
    }

    let mut parts = input.splitn(2, ' ');
    let word = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();

    match word {
        "/contacts" => {
            if rest.is_empty() {
                Err(ClientError::InvalidCommand(
                    "/contacts needs a query".to_string(),
                ))
            } else {
                Ok(Command::Contacts(rest.to_string()))
            }
        }
        "/list" => Ok(Command::List),
        "/read" => Ok(Command::Read),
        "/typing" => match rest {
            "on" => Ok(Command::Typing(true)),
            "off" => Ok(Command::Typing(false)),
            _ => Err(ClientError::InvalidCommand(
                "/typing takes on or off".to_string(),
            )),
        },
        "/quit" => Ok(Command::Quit),
        other => Err(ClientError::InvalidCommand(other.to_string())),
    }
}

/// Format a message for display
pub fn format_message(message: &Message) -> String {
    format!(
        "[{}] <{}> {}",
        message.created_at.format("%H:%M"),
        message.sender_id,
        message.content
    )
}

/// Format a conversation row for the listing
pub fn format_conversation(conversation: &Conversation) -> String {
    let preview = conversation
        .last_message
        .as_ref()
        .map(|p| p.content.as_str())
        .unwrap_or("");
    format!(
        "{} ({} unread) {}",
        conversation.id, conversation.unread_count, preview
    )
}

/// Async stdin reader that yields one line at a time.
/// Prints the prompt and flushes stdout before blocking on input.
pub async fn read_line_async(reader: &mut BufReader<tokio::io::Stdin>) -> Result<Option<String>> {
    use std::io::stdout;

    print!("> ");
    stdout().flush()?;

    let mut line = String::new();
    match reader.read_line(&mut line).await {
        Ok(0) => Ok(None), // EOF
        Ok(_) => {
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }
            Ok(Some(line))
        }
        Err(e) => Err(e.into()),
    }
}
