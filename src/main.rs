use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use catalog_sync_lib::infrastructure::config::ConfigManager;
use catalog_sync_lib::infrastructure::init_logging_with_config;
use catalog_sync_lib::{CatalogProfile, CatalogSession, HttpCatalogFetcher, Product};

/// Load the product catalog page by page and print the rows matching a query
#[derive(Debug, Parser)]
#[command(name = "catalog-sync", version, about)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Field profile: storefront or supplier (overrides the config file)
    #[arg(long)]
    profile: Option<String>,

    /// Case-insensitive filter applied to the loaded products
    #[arg(long, short, default_value = "")]
    query: String,

    /// Extra pages to request after the initial load
    #[arg(long, default_value_t = 0)]
    pages: u32,

    /// Maximum rows to print
    #[arg(long, default_value_t = 50)]
    limit: usize,

    /// Print rows as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let config = manager.load_effective().await?;
    init_logging_with_config(&config.logging)?;

    let profile_name = cli.profile.as_deref().unwrap_or(&config.catalog.profile);
    let Some(profile) = CatalogProfile::by_name(profile_name) else {
        bail!("Unknown catalog profile '{profile_name}' (expected storefront or supplier)");
    };

    let fetcher = HttpCatalogFetcher::from_config(&config).context("Catalog feed is not configured")?;
    let session = CatalogSession::new(Arc::new(fetcher), profile);

    let mut failure = session.load_more().await.err();
    for _ in 0..cli.pages {
        if failure.is_some() || !session.snapshot().has_more {
            break;
        }
        failure = session.load_more().await.err();
    }

    session.set_query(cli.query.clone()).await;
    let rows = session.filtered_items().await;
    let snapshot = session.snapshot();
    info!(
        "{} of {} loaded products match '{}'",
        rows.len(),
        snapshot.items.len(),
        cli.query
    );

    if cli.json {
        let shown: Vec<&Product> = rows.iter().take(cli.limit).collect();
        println!("{}", serde_json::to_string_pretty(&shown)?);
    } else {
        print_table(&rows, cli.limit);
        println!(
            "\n{} shown / {} matching / {} loaded / {} total{}",
            rows.len().min(cli.limit),
            rows.len(),
            snapshot.items.len(),
            snapshot.total_count,
            if snapshot.has_more { " (more available)" } else { "" }
        );
    }

    if let Some(error) = failure {
        warn!("Catalog load stopped early: {}", error);
        bail!("Catalog load failed: {error}");
    }
    Ok(())
}

fn print_table(rows: &[Product], limit: usize) {
    println!("{:<16} {:<48} {:<24} {}", "SKU", "NAME", "CATEGORY", "IMAGE");
    for product in rows.iter().take(limit) {
        println!(
            "{:<16} {:<48} {:<24} {}",
            truncate(&product.sku, 16),
            truncate(&product.name, 48),
            truncate(&product.category, 24),
            product.primary_image().unwrap_or("-")
        );
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
