//! `parley history` and `parley clear` -- one-shot transcript commands.
//!
//! Both go through the same backend selection as the chat loop, so a
//! transcript written against the server backend is read the same way.

use console::style;
use dialoguer::Confirm;

use parley_infra::config::ParleyConfig;

use crate::cli::render::print_transcript;
use crate::state::build_store;

/// Print a session's transcript.
pub async fn show_history(
    config: &ParleyConfig,
    data_dir: &std::path::Path,
    session_id: &str,
) -> anyhow::Result<()> {
    let store = build_store(config, data_dir);
    let messages = store.list_messages(session_id).await?;

    println!();
    if messages.is_empty() {
        println!(
            "  {}",
            style(format!("No messages for session '{session_id}'")).dim()
        );
        println!();
        return Ok(());
    }

    print_transcript(&messages);
    Ok(())
}

/// Clear a session's transcript, asking first unless forced.
pub async fn clear_session(
    config: &ParleyConfig,
    data_dir: &std::path::Path,
    session_id: &str,
    force: bool,
) -> anyhow::Result<()> {
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Clear the conversation for '{session_id}'?"))
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
    }

    let store = build_store(config, data_dir);
    store.clear_session(session_id).await?;

    println!();
    println!(
        "  {} Session '{}' cleared",
        style("✓").green(),
        style(session_id).cyan()
    );
    println!();
    Ok(())
}
