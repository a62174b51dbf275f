//! Command-line interface
//!
//! Drives the restore/save flow against a live host: inspect a block's
//! saved drawing, upload a local one, or watch a local file and autosave
//! edits through the debounced controller.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use blockdraw_host::{BlockRef, EmbedContext, HostBinding, SiyuanClient};
use blockdraw_scene::{parse_document, serialize_document};
use blockdraw_sync::{load_prior_scene, save_snapshot, InitialScene};

use crate::config;
use crate::shell::{CanvasSurface, Shell};

/// How often `watch` polls the local file
const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Blockdraw CLI
#[derive(Parser)]
#[command(name = "blockdraw", version, about = "Drawing canvas persistence for SiYuan hosts")]
pub struct Cli {
    /// Host base URL (overrides configuration)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Host API token (overrides configuration)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Print the drawing saved for a block
    Restore {
        /// Block id to restore
        block_id: String,
        /// Pretty-print the document
        #[arg(long)]
        pretty: bool,
    },
    /// Upload a local drawing file and point the block at it
    Save {
        /// Block id to save to
        block_id: String,
        /// Path to a serialized drawing (.excalidraw)
        file: PathBuf,
    },
    /// Watch a local drawing file and autosave edits to the block
    Watch {
        /// Block id to save to
        block_id: String,
        /// Path to a serialized drawing (.excalidraw)
        file: PathBuf,
    },
    /// Check whether the host requires authorization
    Auth,
}

/// Run the parsed CLI
pub async fn run(cli: Cli) -> Result<()> {
    let mut app = config::load_config()?;
    if let Some(url) = cli.base_url {
        app.host.base_url = url;
    }
    if let Some(token) = cli.token {
        app.host.token = Some(token);
    }
    let client = SiyuanClient::new(app.host);

    match cli.command {
        Command::Restore { block_id, pretty } => restore(&client, &block_id, pretty).await,
        Command::Save { block_id, file } => save(&client, &block_id, &file).await,
        Command::Watch { block_id, file } => watch(client, &block_id, &file).await,
        Command::Auth => auth(&client).await,
    }
}

async fn restore(client: &SiyuanClient, block_id: &str, pretty: bool) -> Result<()> {
    let block = BlockRef::new(block_id);
    let scene = load_prior_scene(client, &block).await;
    if !scene.view_mode {
        warn!(block = %block, "no usable prior drawing; printing fresh defaults");
    }

    let json = serialize_document(&scene.document)?;
    if pretty {
        let value: serde_json::Value = serde_json::from_str(&json)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{json}");
    }
    Ok(())
}

async fn save(client: &SiyuanClient, block_id: &str, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let document =
        parse_document(&content).context("File is not a valid drawing document")?;

    let block = BlockRef::new(block_id);
    let path = save_snapshot(client, &block, &document).await?;
    println!("{path}");
    Ok(())
}

/// Canvas surface backed by a local file
///
/// Seeds the file with the initial scene when it does not exist yet; view
/// and grid toggles have no visual counterpart here.
struct FileSurface {
    path: PathBuf,
}

impl CanvasSurface for FileSurface {
    fn apply_initial_scene(&mut self, scene: &InitialScene) {
        if self.path.exists() {
            return;
        }
        match serialize_document(&scene.document) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    warn!(error = %e, "failed to seed {}", self.path.display());
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize initial scene"),
        }
    }

    fn set_view_mode(&mut self, _enabled: bool) {}

    fn set_grid_mode(&mut self, _enabled: bool) {}
}

async fn watch(client: SiyuanClient, block_id: &str, file: &Path) -> Result<()> {
    let context = EmbedContext::new().with_query(format!("id={block_id}"));
    let surface = FileSurface {
        path: file.to_path_buf(),
    };
    let mut shell = Shell::new(surface, Arc::new(client), &context);

    shell.mount().await;
    info!(block_id, "watching {} for changes", file.display());

    let mut last = std::fs::read_to_string(file).unwrap_or_default();
    let mut ticker = tokio::time::interval(WATCH_POLL_INTERVAL);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let Ok(content) = std::fs::read_to_string(file) else {
                    continue;
                };
                if content == last {
                    continue;
                }
                last = content.clone();
                match parse_document(&content) {
                    Ok(document) => shell.on_change(document),
                    Err(e) => warn!(error = %e, "ignoring unparseable edit"),
                }
            }
        }
    }

    if shell.save_pending() {
        warn!("pending save cancelled on shutdown");
    }
    shell.unmount();
    info!("stopped watching");
    Ok(())
}

async fn auth(client: &SiyuanClient) -> Result<()> {
    let required = client.is_auth_required().await?;
    println!(
        "{}",
        if required {
            "authorization required"
        } else {
            "authorization not required"
        }
    );
    Ok(())
}
