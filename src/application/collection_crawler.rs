//! # Collection Crawler
//!
//! Walks a collection's listing page by page (`Page(1)`, `Page(next)`, ... until
//! the listing reports no next page) and enriches each page's items on a
//! bounded pool that lives only for that page.
//!
//! A transient failure on a listing page stops the crawl: the records gathered
//! so far are kept and the collection is marked `truncated`.

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::application::item_enricher::ItemEnricher;
use crate::domain::{Collection, Record};
use crate::error::{CrawlError, CrawlResult};
use crate::infrastructure::catalog_api::{CatalogApi, CatalogItem};
use crate::infrastructure::config::defaults;

/// Bounded enrichment workers for one listing page.
///
/// Acquired before a page's items are enriched and consumed by
/// [`EnrichmentPool::enrich_all`], so it is always released before the next
/// page is requested.
pub struct EnrichmentPool {
    permits: Arc<Semaphore>,
    enricher: Arc<ItemEnricher>,
}

impl EnrichmentPool {
    #[must_use]
    pub fn acquire(enricher: Arc<ItemEnricher>, size: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(size.max(1))),
            enricher,
        }
    }

    /// Enriches every item, at most `size` at a time. Result order is not
    /// part of the contract. The first failed item fails the page.
    pub async fn enrich_all(self, items: Vec<CatalogItem>) -> CrawlResult<Vec<Record>> {
        let tasks: Vec<_> = items
            .into_iter()
            .map(|item| {
                let permits = Arc::clone(&self.permits);
                let enricher = Arc::clone(&self.enricher);
                tokio::spawn(async move {
                    let _permit = match permits.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => return Err(CrawlError::WorkerPanicked(e.to_string())),
                    };
                    enricher.enrich(item).await
                })
            })
            .collect();

        let results = join_all(tasks).await;
        let mut records = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(Ok(record)) => records.push(record),
                Ok(Err(e)) => return Err(e),
                Err(e) => return Err(CrawlError::WorkerPanicked(e.to_string())),
            }
        }
        Ok(records)
    }
}

pub struct CollectionCrawler {
    catalog: Arc<dyn CatalogApi>,
    enricher: Arc<ItemEnricher>,
    pool_size: usize,
}

impl CollectionCrawler {
    pub fn new(catalog: Arc<dyn CatalogApi>, enricher: ItemEnricher) -> Self {
        Self::with_pool_size(catalog, enricher, defaults::POOL_SIZE)
    }

    pub fn with_pool_size(catalog: Arc<dyn CatalogApi>, enricher: ItemEnricher, pool_size: usize) -> Self {
        Self {
            catalog,
            enricher: Arc::new(enricher),
            pool_size,
        }
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogApi> {
        &self.catalog
    }

    /// Appends every enriched item of the collection's listing to
    /// `collection.records`.
    pub async fn crawl(&self, collection: &mut Collection) -> CrawlResult<()> {
        let mut next_page = Some(1);

        while let Some(page) = next_page {
            let listing = match self.catalog.fetch_listing_page(collection.id, page).await {
                Ok(listing) => listing,
                Err(e) if e.is_transient() => {
                    warn!(
                        "Listing page {} of '{}' failed, keeping {} films: {}",
                        page,
                        collection.name,
                        collection.records.len(),
                        e
                    );
                    collection.truncated = true;
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            let pool = EnrichmentPool::acquire(Arc::clone(&self.enricher), self.pool_size);
            let records = pool.enrich_all(listing.items).await?;
            debug!("'{}' page {}: {} films", collection.name, page, records.len());
            collection.records.extend(records);

            next_page = match listing.next_page {
                Some(next) if next <= page => {
                    warn!("'{}' page {} points back to page {}, stopping", collection.name, page, next);
                    None
                }
                other => other,
            };
        }

        info!(
            "Crawled '{}': {} films{}",
            collection.name,
            collection.records.len(),
            if collection.truncated { " (truncated)" } else { "" }
        );
        Ok(())
    }
}
