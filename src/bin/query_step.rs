// query_step - Load a snapshot into a working copy and print a query's rows
//
// Usage: query_step <SOURCE> <TARGET> <SQL>
// Example: query_step 06 07 "SELECT COUNT(*) AS count FROM movies;"

use anyhow::{bail, Result};
use sql_movies::FixtureLoader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [source, target, query] = args.as_slice() else {
        bail!("usage: query_step <SOURCE> <TARGET> <SQL>");
    };

    let loader = FixtureLoader::from_env()?;
    let db = loader.load(source, target).await?;

    // Close on every path so the cleanup policy applies even when the query fails
    let result = db.select_multiple_rows(query).await;
    db.close().await?;
    let rows = result?;

    println!("{}", serde_json::to_string_pretty(&rows)?);
    eprintln!("✓ {} row(s)", rows.len());

    Ok(())
}
