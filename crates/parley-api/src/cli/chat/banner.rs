//! Welcome banner display for chat sessions.

use console::style;

use parley_core::chat::models::label_for;

/// Print the banner at the start of a chat session: model, session id,
/// backend, and the command hint.
pub fn print_welcome_banner(model: &str, session_id: &str, backend: &str) {
    println!();
    println!("  {}", style("Parley").cyan().bold());
    println!();
    println!(
        "  {}    {}",
        style("Model:").bold(),
        style(label_for(model)).dim()
    );
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(session_id).dim()
    );
    println!(
        "  {}  {}",
        style("Backend:").bold(),
        style(backend).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Enter to send, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}

/// Hint shown when a session has no messages yet.
pub fn print_empty_session_hint() {
    println!(
        "  {}",
        style("Start chatting -- your messages and replies are kept per session.").dim()
    );
    println!();
}
