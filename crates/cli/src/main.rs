use clap::Parser;
use diskcache::config::named_cache_root;
use diskcache::{DiskCache, DiskCacheConfigLoader, SHARED_CACHE_NAME};
use std::path::PathBuf;

mod commands;

use commands::Commands;

#[derive(Parser)]
#[command(name = "diskcache")]
#[command(about = "Inspect and maintain a diskcache directory", long_about = None)]
#[command(version)]
struct Cli {
    /// Cache root directory (defaults to the shared cache)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Size limit in bytes used when sweeping
    #[arg(long, global = true, value_name = "BYTES")]
    size_limit: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    diskcache_utils::tracing::init().map_err(|e| eyre::eyre!(e))?;

    let cli = Cli::parse();

    let mut config = DiskCacheConfigLoader::load()?;
    if let Some(size_limit) = cli.size_limit {
        config.size_limit = size_limit;
    }

    let root = cli
        .root
        .unwrap_or_else(|| named_cache_root(SHARED_CACHE_NAME));

    // Sweeps only happen on request from the CLI
    let cache = DiskCache::builder(root)
        .config(config)
        .auto_sweep(false)
        .build()?;

    cli.command.execute(cache).await
}
