//! CLI command definitions for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing. `chat` is the console
//! conversation loop; `serve` starts the persistence service; the rest are
//! one-shot transcript and catalog commands.

pub mod chat;
pub mod models;
pub mod render;
pub mod transcript;

use clap::{Parser, Subcommand};

/// Chat with hosted AI models from the terminal.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Override the configured store backend (local or server).
    #[arg(long, global = true)]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat {
        /// Model to chat with (defaults to the last selected model).
        #[arg(short, long)]
        model: Option<String>,

        /// Resume an existing session instead of starting a new one.
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Print a session's transcript.
    History {
        /// Session identifier.
        session_id: String,
    },

    /// Clear a session's transcript.
    Clear {
        /// Session identifier.
        session_id: String,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        force: bool,
    },

    /// List the selectable models.
    Models,

    /// Start the persistence service.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "8787")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}
