//! Transcript rendering helpers shared by the chat loop and the one-shot
//! history command.

use chrono::Local;
use console::style;

use parley_core::chat::models::label_for;
use parley_types::message::{Message, MessageRole};

/// Print one message: a dim header line with who and when, then the body.
pub fn print_message(msg: &Message) {
    let time = msg.created_at.with_timezone(&Local).format("%H:%M");
    let header = match msg.role {
        MessageRole::User => format!("{} {}", style("You").green().bold(), style(time).dim()),
        MessageRole::Assistant => format!(
            "{} {}",
            style(label_for(&msg.model)).cyan().bold(),
            style(time).dim()
        ),
    };

    println!("  {header}");
    for line in msg.content.lines() {
        println!("  {line}");
    }
    println!();
}

/// Print a whole transcript followed by its message count.
pub fn print_transcript(messages: &[Message]) {
    for msg in messages {
        print_message(msg);
    }
    println!(
        "  {}",
        style(format!("{} messages", messages.len())).dim()
    );
    println!();
}
