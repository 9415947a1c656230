use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use film_collection_crawler::infrastructure::{HttpScoreSearch, init_logging};
use film_collection_crawler::{AppConfig, Pipeline, RescoreJob, RunDate, ScoreLookup};

#[derive(Parser)]
#[command(name = "film-collection-crawler")]
#[command(about = "Crawls curated film collections and scores them")]
#[command(version)]
struct Cli {
    /// Config file (TOML, YAML or JSON); FILMCRAWL_* variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl every featured collection and consolidate today's snapshot
    Crawl {
        /// Base directory for the dated output
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Retry the score lookup for unscored rows of a consolidated file
    Rescore {
        path: PathBuf,
        /// Pause between lookups in milliseconds
        #[arg(long)]
        pace_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Crawl { data_dir } => {
            if let Some(data_dir) = data_dir {
                config.crawl.data_dir = data_dir;
            }
            let pipeline = Pipeline::from_config(&config)?;
            let summary = pipeline.run(RunDate::today()).await?;
            info!(
                "Run {}: {} collections, {} films consolidated, {} truncated",
                summary.run_date,
                summary.collections,
                summary.consolidation.rows_written,
                summary.truncated.len()
            );
            println!("All files saved in {} folder", summary.run_dir.display());
        }
        Commands::Rescore { path, pace_ms } => {
            if let Some(pace_ms) = pace_ms {
                config.rescore.pace_ms = pace_ms;
            }
            let search = HttpScoreSearch::new(&config.score_provider, &config.http)?;
            let lookup = ScoreLookup::with_year_tolerance(Arc::new(search), config.score_provider.year_tolerance);
            let report = RescoreJob::new(lookup, config.rescore.clone()).rescore(&path).await?;
            println!(
                "{}: {} / {} scores extracted ({} rows without score)",
                path.display(),
                report.succeeded,
                report.attempted,
                report.candidates
            );
        }
    }

    Ok(())
}
