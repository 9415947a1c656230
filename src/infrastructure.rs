//! Infrastructure layer: configuration, logging, HTTP clients and CSV storage

pub mod catalog_api;
pub mod collection_store;
pub mod config;
pub mod http_client;
pub mod logging;
pub mod score_provider;

pub use catalog_api::{CatalogApi, CatalogItem, HttpCatalogApi, ListingPage};
pub use collection_store::CollectionStore;
pub use config::AppConfig;
pub use http_client::HttpClient;
pub use logging::init_logging;
pub use score_provider::{HttpScoreSearch, ScoreSearch};
