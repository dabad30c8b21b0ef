use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use blob_store::{BlobStore, FsBlobStore, PgBlobStore};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tagscraper_common::{Config, ScrapeRequest, StoreBackend};
use tagscraper_scout::extractor::Extractors;
use tagscraper_scout::fetcher::HttpFetcher;
use tagscraper_scout::pipeline::Orchestrator;

/// Scrape thread listings and merge them into the stored snapshots.
#[derive(Parser, Debug)]
#[command(name = "tagscraper")]
struct Args {
    /// JSON file mapping source names to keys.
    #[arg(default_value = "input.json")]
    input: PathBuf,

    /// Bucket to read and write (overrides TAGSCRAPER_BUCKET).
    #[arg(long)]
    bucket: Option<String>,

    /// Root directory for the filesystem store (overrides STORE_ROOT).
    #[arg(long)]
    store_root: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing()?;

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(bucket) = args.bucket {
        config.bucket = bucket;
    }
    if let Some(store_root) = args.store_root {
        config.store_root = store_root;
    }
    config.log_redacted();

    let blobs = open_store(&config).await?;
    let fetcher = Arc::new(HttpFetcher::new(config.http_timeout, config.max_connections)?);
    let extractors = Extractors::http(&config, fetcher)?;
    let orchestrator = Orchestrator::new(blobs, extractors).strict_sources(config.strict_sources);

    let input = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let request = ScrapeRequest::from_json(&input)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    info!(input = %args.input.display(), "tagscraper starting");
    match orchestrator.run(request).await {
        Ok(report) => {
            println!("{}", serde_json::to_string(&report)?);
            Ok(())
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("tagscraper=info".parse()?)
        .add_directive("blob_store=info".parse()?);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

async fn open_store(config: &Config) -> Result<Arc<dyn BlobStore>> {
    let store: Arc<dyn BlobStore> = match config.store_backend {
        StoreBackend::Fs => Arc::new(FsBlobStore::new(&config.store_root, &config.bucket)),
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store")?;
            Arc::new(PgBlobStore::connect(url, &config.bucket).await?)
        }
    };
    Ok(store)
}
