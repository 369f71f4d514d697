mod backend_bridge;
mod controller;
mod ui;

use std::{io, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    load_settings, settings::normalize_base_url, AdjustmentFailurePolicy, HttpDraftGateway,
};
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::{spawn_stdin_reader, TerminalApp};

#[derive(Parser, Debug)]
#[command(name = "minuta", about = "Terminal client for the draft generation service")]
struct Args {
    /// Backend base URL; overrides the settings file and environment.
    #[arg(long)]
    api_base_url: Option<String>,
    /// Settings file to load instead of ./minuta.toml or the user config dir.
    #[arg(long)]
    config: Option<PathBuf>,
    /// What a failed adjustment does: keep_last_draft or revert_to_upload.
    #[arg(long)]
    adjustment_failure_policy: Option<AdjustmentFailurePolicy>,
    /// PDF files to select on startup.
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings =
        load_settings(args.config.as_deref()).context("failed to load client settings")?;
    if let Some(url) = args.api_base_url.as_deref() {
        settings.api_base_url = normalize_base_url(url)?;
    }
    if let Some(policy) = args.adjustment_failure_policy {
        settings.adjustment_failure_policy = policy;
    }
    tracing::info!(
        api_base_url = %settings.api_base_url,
        policy = %settings.adjustment_failure_policy,
        "starting terminal client"
    );

    let gateway = HttpDraftGateway::new(&settings.api_base_url)
        .context("failed to initialize backend gateway")?;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, Arc::new(gateway));

    let mut app = TerminalApp::new(&settings, cmd_tx, ui_rx, io::stdout());
    app.start(&settings, &args.files)?;
    app.run(spawn_stdin_reader())?;
    Ok(())
}
