use clap::{Parser, Subcommand};

use composer_info_lsp::config;
use composer_info_lsp::packagist::cache::MetadataCache;

#[derive(Parser)]
#[command(name = "composer-info-lsp")]
#[command(version, about = "Language Server showing Packagist package info for composer.json")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Cache maintenance
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Delete the local package metadata cache
    Clear,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(composer_info_lsp::lsp::server::run_server()),
        Some(Command::Cache {
            action: CacheAction::Clear,
        }) => clear_cache(),
    }
}

fn clear_cache() -> anyhow::Result<()> {
    let db_path = config::db_path();
    if !db_path.exists() {
        println!("No cache database at {}", db_path.display());
        return Ok(());
    }

    let cache = MetadataCache::new(&db_path, config::DEFAULT_CACHE_MAX_ENTRIES)?;
    cache.clear_all()?;
    println!("Cache cleared: {}", db_path.display());
    Ok(())
}
