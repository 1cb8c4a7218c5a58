//! Parley CLI and persistence-service entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, loads configuration from the data directory, then
//! dispatches to the chat loop, a one-shot transcript command, or the
//! persistence service.

mod cli;
mod http;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use parley_infra::config::{load_config, resolve_data_dir};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,parley=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let data_dir = resolve_data_dir();
    tokio::fs::create_dir_all(&data_dir).await?;

    let mut config = load_config(&data_dir).await;
    if let Some(backend) = &cli.backend {
        config.backend = backend
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;
    }

    match cli.command {
        Commands::Chat { model, session } => {
            cli::chat::run_chat_loop(&config, &data_dir, model, session).await?;
        }

        Commands::History { session_id } => {
            cli::transcript::show_history(&config, &data_dir, &session_id).await?;
        }

        Commands::Clear { session_id, force } => {
            cli::transcript::clear_session(&config, &data_dir, &session_id, force).await?;
        }

        Commands::Models => {
            cli::models::list_models(&data_dir).await?;
        }

        Commands::Serve { port, host } => {
            let app_state = AppState::init(&data_dir).await?;

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Parley persistence service listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(app_state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
