use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use shopfast_orders::app::{latest_key, GenerateUseCase, ProcessUseCase};
use shopfast_orders::config::Config;
use shopfast_orders::generator::OrderGenerator;
use shopfast_orders::pipeline::processing::DefaultEnricher;
use shopfast_orders::pipeline::storage::{LocalObjectStore, ObjectStore};
use shopfast_orders::{logging, metrics};

#[derive(Parser)]
#[command(name = "shopfast_orders")]
#[command(about = "Generate and enrich ShopFast e-commerce order batches")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the storage data root
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic batch of raw orders
    Generate {
        /// Number of orders (defaults to generator.orders_per_batch)
        #[arg(long)]
        count: Option<usize>,
        /// Seed for reproducible batches
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Enrich a raw order batch and store the processed batch
    Process {
        /// Raw object key to process
        #[arg(long, conflicts_with = "latest", required_unless_present = "latest")]
        key: Option<String>,
        /// Process the newest raw object
        #[arg(long)]
        latest: bool,
    },
    /// Generate a batch and immediately process it
    Run {
        #[arg(long)]
        count: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn build_generator(config: &Config, seed: Option<u64>) -> OrderGenerator {
    match seed {
        Some(seed) => OrderGenerator::seeded(config.generator.clone(), seed),
        None => OrderGenerator::new(config.generator.clone()),
    }
}

fn print_report<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let store: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new(
        &config.storage.data_root,
        &config.storage.bucket,
    ));
    let process_use_case = || {
        ProcessUseCase::new(
            store.clone(),
            DefaultEnricher::with_config(config.enrichment.clone()),
            &config.storage.processed_prefix,
        )
    };

    match cli.command {
        Commands::Generate { count, seed } => {
            let count = count.unwrap_or(config.generator.orders_per_batch);
            let mut use_case =
                GenerateUseCase::new(store.clone(), build_generator(&config, seed), &config.storage.raw_prefix);
            print_report(&use_case.generate(count).await?)?;
        }
        Commands::Process { key, latest } => {
            let key = match key {
                Some(key) => key,
                None if latest => latest_key(store.as_ref(), &config.storage.raw_prefix)
                    .await?
                    .with_context(|| format!("no raw batches under '{}'", config.storage.raw_prefix))?,
                None => anyhow::bail!("either --key or --latest is required"),
            };
            print_report(&process_use_case().process_key(&key).await?)?;
        }
        Commands::Run { count, seed } => {
            let count = count.unwrap_or(config.generator.orders_per_batch);
            let mut generate =
                GenerateUseCase::new(store.clone(), build_generator(&config, seed), &config.storage.raw_prefix);
            let generated = generate.generate(count).await?;
            print_report(&generated)?;

            let processed = process_use_case().process_key(&generated.object.key).await?;
            print_report(&processed)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(root) = &cli.data_root {
        config.storage.data_root = root.clone();
    }

    let _guard = logging::init_logging(&config.logging);
    metrics::init_metrics();
    info!(bucket = %config.storage.bucket, root = %config.storage.data_root.display(), "Starting shopfast_orders");

    if let Err(e) = run(cli, config).await {
        error!("Run failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}
