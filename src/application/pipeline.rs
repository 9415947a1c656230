//! Discovery → crawl every collection → save → consolidate

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::collection_crawler::CollectionCrawler;
use crate::application::consolidator::{ConsolidationSummary, Consolidator};
use crate::application::item_enricher::ItemEnricher;
use crate::application::score_lookup::ScoreLookup;
use crate::domain::{Collection, ExtractionRun, RunDate};
use crate::error::{CrawlError, CrawlResult};
use crate::infrastructure::catalog_api::{CatalogApi, HttpCatalogApi};
use crate::infrastructure::collection_store::CollectionStore;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::score_provider::{HttpScoreSearch, ScoreSearch};

/// Outcome of one pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_date: RunDate,
    pub run_dir: PathBuf,
    pub collections: usize,
    /// Names of collections whose listing stopped early
    pub truncated: Vec<String>,
    pub consolidation: ConsolidationSummary,
}

pub struct Pipeline {
    crawler: CollectionCrawler,
    store: CollectionStore,
    consolidator: Consolidator,
}

impl Pipeline {
    pub fn new(catalog: Arc<dyn CatalogApi>, search: Arc<dyn ScoreSearch>, config: &AppConfig) -> Self {
        let lookup = ScoreLookup::with_year_tolerance(search, config.score_provider.year_tolerance);
        let crawler = CollectionCrawler::with_pool_size(catalog, ItemEnricher::new(lookup), config.crawl.pool_size);
        let store = CollectionStore::new(&config.crawl.data_dir);
        let consolidator = Consolidator::new(store.clone(), config.crawl.suite.clone());
        Self {
            crawler,
            store,
            consolidator,
        }
    }

    /// Pipeline wired to the real HTTP endpoints
    pub fn from_config(config: &AppConfig) -> CrawlResult<Self> {
        let catalog = HttpCatalogApi::new(config.catalog.clone(), &config.http)?;
        let search = HttpScoreSearch::new(&config.score_provider, &config.http)?;
        Ok(Self::new(Arc::new(catalog), Arc::new(search), config))
    }

    /// Collections to crawl this run. A failed discovery request yields an
    /// empty run; an undecodable payload is an error.
    pub async fn discover(&self, run_date: RunDate) -> CrawlResult<ExtractionRun> {
        let mut run = ExtractionRun::new(run_date);
        match self.crawler.catalog().discover_groups().await {
            Ok(groups) => run.collections = groups.into_iter().map(Collection::from).collect(),
            Err(e) if e.is_transient() => warn!("Collection discovery failed: {}", e),
            Err(e) => return Err(CrawlError::Api(e)),
        }
        Ok(run)
    }

    pub async fn run(&self, run_date: RunDate) -> CrawlResult<RunSummary> {
        let run = self.discover(run_date).await?;
        let collections = run.collections.len();
        let mut truncated = Vec::new();

        for mut collection in run.collections {
            info!("🚀 Started crawling of {}", collection);
            self.crawler.crawl(&mut collection).await?;
            self.store.save(&collection, run_date)?;
            if collection.truncated {
                truncated.push(collection.name.clone());
            }
            info!("✅ Completed crawling of {}", collection);
        }

        let consolidation = self.consolidator.consolidate(run_date)?;
        Ok(RunSummary {
            run_date,
            run_dir: self.store.run_dir(run_date),
            collections,
            truncated,
            consolidation,
        })
    }
}
