mod cli;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use clipper_core::{assemble_document, MessageMetadata};
use clipper_engine::{ReqwestFetcher, Resolver, Syncer};
use clipper_logging::{clip_debug, LogDestination};
use log::LevelFilter;

use crate::cli::{Cli, Command};
use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    clip_debug!("Settings: {:?}", settings);

    match cli.command {
        Command::Resolve {
            input,
            message_id,
            timestamp,
            json,
        } => resolve(&settings, &input, message_id, timestamp, json).await,
        Command::Sync { endpoint, dir } => sync(settings, endpoint, dir).await,
    }
}

fn init_logging(cli: &Cli) {
    // `resolve` writes the document to stdout, so keep info chatter out of it.
    let level = match (&cli.command, cli.verbose) {
        (_, true) => LevelFilter::Debug,
        (Command::Resolve { .. }, false) => LevelFilter::Warn,
        (Command::Sync { .. }, false) => LevelFilter::Info,
    };
    let destination = if cli.log_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    clipper_logging::initialize(destination, level);
}

async fn resolve(
    settings: &Settings,
    input: &str,
    message_id: String,
    timestamp: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let fetcher = Arc::new(ReqwestFetcher::new(settings.fetch.to_fetch_settings()));
    let content = Resolver::new(fetcher)
        .resolve(input)
        .await
        .with_context(|| format!("failed to resolve {input:?}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&content)?);
    } else {
        let timestamp =
            timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp_millis().to_string());
        let metadata = MessageMetadata::new(timestamp, message_id);
        println!("{}", assemble_document(&content, &metadata));
    }
    Ok(())
}

async fn sync(
    settings: Settings,
    endpoint: Option<String>,
    dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let endpoint = endpoint.unwrap_or(settings.message_endpoint);
    if endpoint.is_empty() {
        bail!("no message endpoint configured (use --endpoint or message_endpoint in the settings file)");
    }
    let dir = dir.unwrap_or(settings.document_directory);

    let fetcher = Arc::new(ReqwestFetcher::new(settings.fetch.to_fetch_settings()));
    let report = Syncer::new(fetcher, endpoint, &dir)
        .sync()
        .await
        .context("message sync failed")?;

    println!(
        "{} saved, {} already present, {} failed ({})",
        report.saved(),
        report.skipped(),
        report.failed(),
        dir.display()
    );
    Ok(())
}
