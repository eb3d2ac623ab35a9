use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

mod chat;
mod cli;
mod config;
mod knowledge;
mod semantic;
#[cfg(test)]
mod tests;
mod web;

use chat::{ChatEngine, SelectionPolicy};
use config::Config;
use knowledge::KnowledgeBase;
use semantic::EmbeddingModel;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = cli::Args::parse();

    let base_path = config::base_path();
    let config = Config::load_with(&base_path);

    match args.command {
        cli::Command::Daemon {} => {
            let engine = build_engine(&config, &base_path)?;
            web::start_daemon(engine, &config.bind_addr);
            Ok(())
        }

        cli::Command::Ask { message } => {
            let engine = build_engine(&config, &base_path)?;
            let answer = engine.generate_response(&message, &[])?;
            println!("{answer}");
            Ok(())
        }
    }
}

/// Load the embedding model and build the knowledge index. Fails fast: a
/// model that cannot be loaded prevents startup entirely.
fn build_engine(config: &Config, base_path: &str) -> anyhow::Result<ChatEngine> {
    let retrieval = &config.retrieval;

    let embedder = EmbeddingModel::new(
        &retrieval.model,
        PathBuf::from(base_path),
        Some(Duration::from_secs(retrieval.download_timeout_secs)),
    )
    .context("failed to initialize embedding model")?;

    let engine = ChatEngine::new(
        Arc::new(embedder),
        KnowledgeBase::builtin(),
        SelectionPolicy::from(retrieval),
    )
    .context("failed to build knowledge index")?;

    Ok(engine)
}
