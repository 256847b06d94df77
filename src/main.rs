// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use seo_crawler::app::{create_router, AppState, VERSION};
use seo_crawler::models::storage::Location;
use seo_crawler::services::batch::{run_batch, BatchOptions};
use seo_crawler::services::classifier::{Classifier, StatisticalClassifier};
use seo_crawler::services::config::load_config;
use seo_crawler::services::logging::init_logging;
use seo_crawler::services::metadata::MetadataFetcher;
use seo_crawler::services::robots::RobotsCache;
use seo_crawler::Pipeline;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "seo-crawler", version = VERSION, about = "SEO metadata crawler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the crawl API over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: SocketAddr,
        /// Directory holding <env>.ini files
        #[arg(long, default_value = "etc")]
        config_dir: PathBuf,
    },
    /// Crawl a list of URLs and write the results as CSV
    Batch {
        /// Input file path (local, s3:// or gs://)
        #[arg(long)]
        input: String,
        /// Output CSV path (local, s3:// or gs://)
        #[arg(long)]
        output: String,
        /// Environment name (e.g., dev or prod)
        #[arg(long, default_value = "dev")]
        env: String,
        /// Base path to .ini files
        #[arg(long, default_value = "etc")]
        config_base_path: PathBuf,
        /// Use the statistical classifier instead of the rule-based one
        #[arg(long)]
        use_ml: bool,
        /// URLs processed concurrently
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
    },
}

/// Wire the pipeline: one HTTP client, one robots cache, one trained model
fn build_pipeline() -> Pipeline {
    let client = reqwest::Client::new();
    let statistical = Arc::new(StatisticalClassifier::trained());

    Pipeline::new(
        Arc::new(RobotsCache::new(client.clone())),
        MetadataFetcher::new(client),
        Classifier::new(statistical),
    )
}

async fn serve(addr: SocketAddr, config_dir: PathBuf) -> Result<()> {
    let state = AppState {
        pipeline: Arc::new(build_pipeline()),
        config_dir,
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("seo-crawler v{} listening on {}", VERSION, addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { addr, config_dir } => serve(addr, config_dir).await,
        Command::Batch {
            input,
            output,
            env,
            config_base_path,
            use_ml,
            concurrency,
        } => {
            let config = load_config(&env, &config_base_path)?;
            let options = BatchOptions {
                input: Location::parse(&input)?,
                output: Location::parse(&output)?,
                use_statistical: use_ml,
                concurrency,
            };

            let pipeline = build_pipeline();
            run_batch(&pipeline, &config, &options).await?;
            Ok(())
        }
    }
}
