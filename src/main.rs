mod app;

use anyhow::Context;
use app::{Cli, run};
use clap::Parser;
use srs_app::SrsConfig;
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "srs=info,srs_app=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = SrsConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        SrsConfig::default()
    });
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }

    run(cli, config).await.context("srs command failed")
}
