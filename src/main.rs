//! Blockdraw - drawing canvas persistence for SiYuan hosts
//!
//! CLI entry point.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blockdraw::cli;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blockdraw=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run(cli::Cli::parse()).await
}
