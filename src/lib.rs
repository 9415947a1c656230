//! Film Collection Crawler
//!
//! Discovers curated film collections in a streaming catalog, pages through
//! each collection's listing, enriches every film with a critic score from a
//! separate search provider and writes dated CSV snapshots: one per collection
//! plus a deduplicated, score-ranked consolidated file. A separate rescore job
//! retries the lookup for rows that are still without a score.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::{CollectionCrawler, Consolidator, ItemEnricher, Pipeline, RescoreJob, ScoreLookup};
pub use domain::{Collection, Record, RunDate, Score, ScoreMatch};
pub use error::{ApiError, CrawlError, StoreError};
pub use infrastructure::{AppConfig, CollectionStore};
