//! Application layer module
//!
//! Use cases of the crawl: score lookup, enrichment, paginated crawling,
//! consolidation and rescoring, plus the pipeline that chains them.

pub mod collection_crawler;
pub mod consolidator;
pub mod item_enricher;
pub mod pipeline;
pub mod rescore_job;
pub mod score_lookup;

pub use collection_crawler::{CollectionCrawler, EnrichmentPool};
pub use consolidator::{ConsolidationSummary, Consolidator};
pub use item_enricher::ItemEnricher;
pub use pipeline::{Pipeline, RunSummary};
pub use rescore_job::{RescoreJob, RescoreReport};
pub use score_lookup::ScoreLookup;
