mod app;
mod backend;
mod clipboard;
mod config;
mod demo;
mod editor;
mod error;
mod events;
mod ipc;
mod prompts;
mod selection;
mod session;
mod theme;
mod timer;
mod toast;
mod util;
mod views;
mod visibility;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::backend::{PromptBackend, SocketBackend};
use crate::config::HudConfig;

/// Floating prompt-library HUD.
#[derive(Parser, Debug)]
#[command(name = "promptmaxx-hud", version = env!("PROMPTMAXX_HUD_VERSION"))]
struct Cli {
    /// Config file (default: ~/.config/promptmaxx/hud.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run against an in-memory store seeded with sample prompts
    #[arg(long)]
    demo: bool,

    /// Debug logging (RUST_LOG still wins when set)
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let config = HudConfig::load(cli.config.as_deref());
    let backend: Arc<dyn PromptBackend> = if cli.demo {
        tracing::info!("demo mode: using in-memory store");
        Arc::new(demo::create_demo_backend())
    } else {
        tracing::info!("backend socket {:?}", config.backend_socket);
        Arc::new(SocketBackend::new(&config.backend_socket))
    };

    app::run(config, backend).map_err(|e| anyhow!("HUD exited with error: {e}"))
}
