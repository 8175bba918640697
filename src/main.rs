// forum - terminal client for a minimal posts forum
//
// Talks to a conductor through a single zome-call primitive and renders the
// posts zome as a TUI: a create form, and a list of posts each of which can be
// edited or deleted in place.
//
// Architecture:
// - Client: the call primitive (HTTP transport, or in-memory for demo/tests)
// - Posts: typed wrapper over the posts zome functions
// - TUI (ratatui): views issue calls through a Remote; finished calls come
//   back to the event loop as Messages and are routed to the issuing view
// - CLI (clap): config management and one-shot headless posts commands

mod cli;
mod client;
mod config;
mod demo;
mod logging;
mod posts;
mod theme;
mod tui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use client::Endpoint;
use config::Config;
use logging::LogBuffer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config commands run before anything is loaded or created
    if let Some(Commands::Config { show, reset, path }) = &cli.command {
        cli::handle_config(*show, *reset, *path);
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    cli.apply(&mut config);

    // TUI mode captures logs into a buffer; headless commands log to stderr
    let tui_mode = cli.command.is_none();
    let log_buffer = LogBuffer::new();
    let _file_guard = logging::init_tracing(&config.logging, tui_mode, &log_buffer);

    let endpoint = if config.demo_mode {
        tracing::info!("Running in DEMO MODE - in-memory backend");
        demo::endpoint()
    } else {
        Endpoint::Conductor(config.connection())
    };

    match cli.command {
        Some(Commands::Posts { action }) => {
            let output = cli::run_posts(&config, &endpoint, action).await?;
            println!("{}", output);
        }
        Some(Commands::Config { .. }) => {}
        None => {
            tracing::info!("Starting TUI ({})", endpoint.describe());
            if let Err(e) = tui::run_tui(config, endpoint, log_buffer).await {
                tracing::error!("TUI error: {:?}", e);
                return Err(e);
            }
            tracing::info!("Shutting down...");
        }
    }

    Ok(())
}
