//! Main chat loop orchestration.
//!
//! Coordinates the console conversation: preference-backed model selection,
//! session creation or resume, the input loop with slash commands, and
//! turn submission through the conversation controller with a spinner
//! while the gateway call is in flight.

use console::style;
use dialoguer::{Confirm, Select};

use parley_core::chat::controller::TurnError;
use parley_core::chat::models::{label_for, MODELS};
use parley_core::chat::session::new_session_id;
use parley_core::store::prefs::{PrefStore, SELECTED_MODEL_KEY};
use parley_infra::config::ParleyConfig;
use parley_infra::localfile::prefs::LocalFilePrefStore;

use crate::cli::render::{print_message, print_transcript};
use crate::state::build_controller;

use super::banner::{print_empty_session_hint, print_welcome_banner};
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

/// Run the interactive chat loop.
pub async fn run_chat_loop(
    config: &ParleyConfig,
    data_dir: &std::path::Path,
    model_override: Option<String>,
    session_override: Option<String>,
) -> anyhow::Result<()> {
    let prefs = LocalFilePrefStore::new(data_dir);

    // Last selected model, init-on-load: CLI flag beats the stored
    // preference beats the configured default.
    let mut model = match model_override {
        Some(m) => {
            let _ = prefs.set(SELECTED_MODEL_KEY, &m).await;
            m
        }
        None => prefs
            .get(SELECTED_MODEL_KEY)
            .await
            .unwrap_or(None)
            .unwrap_or_else(|| config.default_model.clone()),
    };

    let controller = build_controller(config, data_dir);
    let mut session_id = session_override.unwrap_or_else(new_session_id);

    print_welcome_banner(&model, &session_id, &config.backend.to_string());

    // Resuming an existing session shows its transcript first.
    let history = controller.history(&session_id).await.unwrap_or_default();
    if history.is_empty() {
        print_empty_session_hint();
    } else {
        print_transcript(&history);
    }

    let prompt = format!("  {} ", style("You >").green().bold());
    let mut chat_input = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let event = chat_input.read_line().await;
        let text = match event {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Line(line) => line,
        };

        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        if let Some(cmd) = commands::parse(text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Model(arg) => {
                    if let Some(picked) = pick_model(arg, &model)? {
                        let _ = prefs.set(SELECTED_MODEL_KEY, &picked).await;
                        println!(
                            "  {} Model set to {}",
                            style("✓").green(),
                            style(label_for(&picked)).cyan()
                        );
                        println!();
                        model = picked;
                    }
                }
                ChatCommand::Clear => {
                    let confirmed = Confirm::new()
                        .with_prompt("Are you sure you want to clear the conversation?")
                        .default(false)
                        .interact()
                        .unwrap_or(false);
                    if !confirmed {
                        continue;
                    }
                    match controller.clear(&session_id).await {
                        Ok(()) => {
                            println!("  {} Chat cleared", style("✓").green());
                            println!();
                        }
                        Err(e) => {
                            eprintln!("  {} Failed to clear chat: {e}", style("!").red().bold());
                        }
                    }
                }
                ChatCommand::History => match controller.history(&session_id).await {
                    Ok(messages) if messages.is_empty() => {
                        println!("  {}", style("No messages yet.").dim());
                        println!();
                    }
                    Ok(messages) => print_transcript(&messages),
                    Err(e) => {
                        eprintln!("  {} Failed to fetch messages: {e}", style("!").red().bold());
                    }
                },
                ChatCommand::New => {
                    session_id = new_session_id();
                    println!(
                        "  {} New session {}",
                        style("✓").green(),
                        style(&session_id).dim()
                    );
                    println!();
                }
                ChatCommand::Exit => {
                    println!("  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::Unknown(cmd) => {
                    println!(
                        "  {} Unknown command '{}'. Type /help for commands.",
                        style("?").yellow(),
                        cmd
                    );
                }
            }
            continue;
        }

        // A regular message: one turn through the controller.
        let spinner = indicatif::ProgressBar::new_spinner();
        spinner.set_style(
            indicatif::ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("{} is thinking...", label_for(&model)));
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));

        match controller.submit(text, &model, &session_id).await {
            Ok(outcome) => {
                spinner.finish_and_clear();
                print_message(&outcome.assistant_message);
            }
            Err(TurnError::Gateway(e)) => {
                spinner.finish_and_clear();
                eprintln!("  {} {e}", style("!").red().bold());
                println!(
                    "  {}",
                    style("Your message was kept; no reply was stored.").dim()
                );
                println!();
            }
            Err(e) => {
                spinner.finish_and_clear();
                eprintln!("  {} {e}", style("!").red().bold());
                println!();
            }
        }
    }

    Ok(())
}

/// Resolve a `/model` command into a model identifier.
///
/// With an argument, accept it only if it is in the catalog; without one,
/// open an interactive picker. Returns None when nothing changed.
fn pick_model(arg: Option<String>, current: &str) -> anyhow::Result<Option<String>> {
    if let Some(wanted) = arg {
        if MODELS.iter().any(|m| m.value == wanted) {
            return Ok(Some(wanted));
        }
        println!(
            "  {} Unknown model '{}'. Run /model to pick from the list.",
            style("?").yellow(),
            wanted
        );
        return Ok(None);
    }

    let labels: Vec<String> = MODELS
        .iter()
        .map(|m| format!("{} ({})", m.label, m.value))
        .collect();
    let default = MODELS
        .iter()
        .position(|m| m.value == current)
        .unwrap_or(0);

    let picked = Select::new()
        .with_prompt("AI Model")
        .items(&labels)
        .default(default)
        .interact_opt()?;

    Ok(picked.map(|i| MODELS[i].value.to_string()))
}
