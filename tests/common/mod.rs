//! In-memory catalog and score provider used by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use film_collection_crawler::domain::{CollectionDescriptor, MediaKind, Score, ScoreMatch};
use film_collection_crawler::error::ApiError;
use film_collection_crawler::infrastructure::catalog_api::{CatalogApi, CatalogDirector, CatalogFilm, CatalogItem, ListingPage};
use film_collection_crawler::infrastructure::score_provider::ScoreSearch;

pub fn item(title: &str, year: i32) -> CatalogItem {
    item_with_directors(title, year, &["Director"])
}

pub fn item_with_directors(title: &str, year: i32, directors: &[&str]) -> CatalogItem {
    CatalogItem {
        film: CatalogFilm {
            title: title.to_string(),
            duration: Some(90),
            year: Some(year),
            web_url: Some(format!("https://catalog.test/films/{}", title.to_lowercase().replace(' ', "-"))),
            genres: vec!["Drama".to_string()],
            critic_review_rating: Some(3.5),
            historic_countries: vec!["France".to_string()],
            directors: directors
                .iter()
                .map(|name| CatalogDirector { name: (*name).to_string() })
                .collect(),
        },
    }
}

/// What a listing request for one page returns
pub enum PageReply {
    Items(Vec<CatalogItem>, Option<u32>),
    Status(u16),
    Malformed,
}

#[derive(Default)]
pub struct FakeCatalog {
    pub groups: Vec<CollectionDescriptor>,
    pub discovery_status: Option<u16>,
    pages: HashMap<(u64, u32), PageReply>,
    pub requested: Mutex<Vec<(u64, u32)>>,
}

impl FakeCatalog {
    pub fn with_group(mut self, id: u64, title: &str) -> Self {
        self.groups.push(CollectionDescriptor {
            id,
            title: title.to_string(),
        });
        self
    }

    pub fn with_discovery_status(mut self, status: u16) -> Self {
        self.discovery_status = Some(status);
        self
    }

    pub fn with_page(mut self, id: u64, page: u32, reply: PageReply) -> Self {
        self.pages.insert((id, page), reply);
        self
    }

    pub fn requested_pages(&self, id: u64) -> Vec<u32> {
        self.requested
            .lock()
            .unwrap()
            .iter()
            .filter(|(collection, _)| *collection == id)
            .map(|(_, page)| *page)
            .collect()
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn discover_groups(&self) -> Result<Vec<CollectionDescriptor>, ApiError> {
        if let Some(status) = self.discovery_status {
            return Err(ApiError::Status {
                status,
                url: "fake://film_groups".to_string(),
            });
        }
        Ok(self.groups.clone())
    }

    async fn fetch_listing_page(&self, collection_id: u64, page: u32) -> Result<ListingPage, ApiError> {
        self.requested.lock().unwrap().push((collection_id, page));
        let url = format!("fake://film_groups/{collection_id}/film_group_items?page={page}");
        match self.pages.get(&(collection_id, page)) {
            Some(PageReply::Items(items, next_page)) => Ok(ListingPage {
                items: items.clone(),
                next_page: *next_page,
            }),
            Some(PageReply::Status(status)) => Err(ApiError::Status { status: *status, url }),
            Some(PageReply::Malformed) => Err(ApiError::MalformedResponse {
                url,
                reason: "missing field `film_group_items`".to_string(),
            }),
            None => Err(ApiError::Status { status: 404, url }),
        }
    }
}

/// Score provider answering from a title → candidates table
#[derive(Default)]
pub struct FakeScores {
    results: HashMap<String, Vec<ScoreMatch>>,
    pub queries: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub delay: Option<Duration>,
}

impl FakeScores {
    pub fn with_film(self, title: &str, year: i32, score: Option<i32>) -> Self {
        self.with_candidate(title, "film", year, score)
    }

    pub fn with_candidate(mut self, title: &str, ref_type: &str, year: i32, score: Option<i32>) -> Self {
        self.results.entry(title.to_lowercase()).or_default().push(ScoreMatch {
            name: title.to_string(),
            url: format!("/{ref_type}/{title}"),
            year: Some(year),
            score: score.map_or(Score::NoScore, Score::Scored),
            kind: MediaKind::from_ref_type(ref_type),
        });
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queried(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScoreSearch for FakeScores {
    async fn search(&self, title: &str) -> Result<Vec<ScoreMatch>, ApiError> {
        self.queries.lock().unwrap().push(title.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.results.get(&title.to_lowercase()).cloned().unwrap_or_default())
    }
}
