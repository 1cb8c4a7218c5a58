//! Async readline input for the chat loop.
//!
//! Wraps `rustyline_async::Readline` so the loop sees three events: a
//! submitted line, end of file (Ctrl+D), or an interrupt (Ctrl+C).

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// Events produced by the input handler.
#[derive(Debug)]
pub enum InputEvent {
    /// User submitted a line (untrimmed).
    Line(String),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

/// Async input handler for the chat prompt.
pub struct ChatInput {
    rl: Readline,
    // Keeps the shared stdout writer alive for the prompt's lifetime.
    _writer: SharedWriter,
}

impl ChatInput {
    pub fn new(prompt: String) -> Result<Self, ReadlineError> {
        let (rl, writer) = Readline::new(prompt)?;
        Ok(Self { rl, _writer: writer })
    }

    /// Read one line of input. Read errors are folded into `Eof` so the
    /// loop winds down instead of spinning.
    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => InputEvent::Line(line),
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(_) => InputEvent::Eof,
        }
    }
}
