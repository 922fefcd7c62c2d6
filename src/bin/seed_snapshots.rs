// seed_snapshots - Build the movies snapshot chain
//
// Usage: seed_snapshots [DIR]
// DIR defaults to SQL_MOVIES_SNAPSHOT_DIR (or `snapshots`).

use anyhow::Result;
use sql_movies::fixtures::{build_snapshots, MoviesDataset};
use sql_movies::HarnessConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = HarnessConfig::from_env()?;
    if let Some(dir) = std::env::args().nth(1) {
        config.snapshot_dir = dir.into();
    }

    println!("Building snapshots in {}...", config.snapshot_dir.display());

    let manifest = build_snapshots::<MoviesDataset>(&config).await?;

    for entry in &manifest.snapshots {
        println!("  ✓ {} ({}) -> {}", entry.label, entry.description, entry.file);
    }
    println!("✓ {} snapshots written", manifest.snapshots.len());

    Ok(())
}
