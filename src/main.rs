//! mxr command-line interface

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use mxr::config::AppConfig;
use mxr::db::Database;
use mxr::loader;
use mxr::logging::{init_logging, OperationTimer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bulk-load drinks from a Kaggle cocktail CSV
    Load {
        /// Path to the CSV file (defaults to the configured loader path)
        #[arg(short, long)]
        csv: Option<PathBuf>,
    },
    /// Show drinks by name, with their ingredient measurements
    Show {
        /// Name of the drink
        #[arg(short, long)]
        name: String,
    },
    /// Show catalog row counts
    Stats,
}

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    let _guard = init_logging(
        Some(&config.get_log_level()),
        config.logging.file_path.as_deref().map(std::path::Path::new),
    )?;

    let cli = Cli::parse();

    let db = Database::with_pool_size(
        &config.get_database_url(),
        config.database.max_connections,
        std::time::Duration::from_secs(config.database.connection_timeout_secs),
    )
    .context("failed to open the catalog database")?;

    match &cli.command {
        Commands::Load { csv } => load_drinks(&config, &db, csv.as_deref())?,
        Commands::Show { name } => show_drinks(&db, name)?,
        Commands::Stats => show_stats(&db)?,
    }

    Ok(())
}

/// Bulk-load drinks from CSV
fn load_drinks(config: &AppConfig, db: &Database, csv: Option<&std::path::Path>) -> Result<()> {
    let default_path = PathBuf::from(&config.loader.csv_path);
    let path = csv.unwrap_or(&default_path);

    info!(path = %path.display(), "loading drinks");
    let timer = OperationTimer::new("bulk_load");
    let report = loader::load_csv(db, path).with_context(|| format!("failed to load {}", path.display()))?;
    timer.finish();

    info!(drinks = report.drinks, skipped = report.skipped, "load finished");
    Ok(())
}

/// Show drinks by name with their ingredient measurements
fn show_drinks(db: &Database, name: &str) -> Result<()> {
    let drinks = db.drinks_by_name(name)?;
    if drinks.is_empty() {
        warn!(name, "no drinks found");
        return Ok(());
    }

    for drink in &drinks {
        info!(
            id = drink.id,
            name = %drink.name,
            drink_type = drink.drink_type.as_deref().unwrap_or("-"),
            glass = drink.glass.as_deref().unwrap_or("-"),
            "drink"
        );
        for (ingredient, measurement) in db.ingredients(drink).entries()? {
            info!(ingredient = %ingredient.name, measurement = %measurement, "  ingredient");
        }
        info!(preparation = %drink.preparation, "  preparation");
    }
    Ok(())
}

/// Show catalog row counts
fn show_stats(db: &Database) -> Result<()> {
    let stats = db.catalog_stats()?;
    info!(
        drinks = stats.drinks,
        ingredients = stats.ingredients,
        associations = stats.associations,
        "catalog statistics"
    );
    Ok(())
}
