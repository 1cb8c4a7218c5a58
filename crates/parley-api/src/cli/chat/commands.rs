//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for the model
//! pick, transcript management, and session lifecycle.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Pick a model; with an argument, switch to it directly.
    Model(Option<String>),
    /// Clear the conversation (asks for confirmation).
    Clear,
    /// Show the transcript for this session.
    History,
    /// Start a new session.
    New,
    /// Exit the chat session.
    Exit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts
        .get(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/model" | "/m" => Some(ChatCommand::Model(arg)),
        "/clear" => Some(ChatCommand::Clear),
        "/history" => Some(ChatCommand::History),
        "/new" => Some(ChatCommand::New),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}    {}", style("/help").cyan(), "Show this help message");
    println!("  {}   {}", style("/model").cyan(), "Pick the AI model (or /model <id>)");
    println!("  {}   {}", style("/clear").cyan(), "Clear the conversation");
    println!("  {} {}", style("/history").cyan(), "Show the transcript");
    println!("  {}     {}", style("/new").cyan(), "Start a new session");
    println!("  {}    {}", style("/exit").cyan(), "End the chat session");
    println!();
    println!("  {}", style("Enter sends; Ctrl+D exits").dim());
    println!();
}
