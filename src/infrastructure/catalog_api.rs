//! Streaming catalog client: collection discovery and paginated listings
//!
//! Payloads are decoded into explicit schemas at the boundary; anything that
//! does not fit comes back as `ApiError::MalformedResponse`.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};
use url::Url;

use crate::domain::CollectionDescriptor;
use crate::error::ApiError;
use crate::infrastructure::config::{CatalogConfig, HttpConfig};
use crate::infrastructure::http_client::{HttpClient, HttpClientConfig};

// Lists may be absent or explicitly null upstream
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Director entry of a catalog film
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogDirector {
    pub name: String,
}

/// Film object nested inside a listing item
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogFilm {
    pub title: String,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub critic_review_rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub historic_countries: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub directors: Vec<CatalogDirector>,
}

/// Raw listing item
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogItem {
    pub film: CatalogFilm,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ListingMeta {
    #[serde(default)]
    next_page: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct ListingResponse {
    film_group_items: Vec<CatalogItem>,
    #[serde(default)]
    meta: ListingMeta,
}

/// One page of a collection listing
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub items: Vec<CatalogItem>,
    /// `None` when this is the last page
    pub next_page: Option<u32>,
}

impl From<ListingResponse> for ListingPage {
    fn from(response: ListingResponse) -> Self {
        Self {
            items: response.film_group_items,
            // page numbers start at 1; a zero is as good as absent
            next_page: response.meta.next_page.filter(|page| *page > 0),
        }
    }
}

/// Catalog operations the crawler depends on
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Currently featured collections, in catalog order
    async fn discover_groups(&self) -> Result<Vec<CollectionDescriptor>, ApiError>;

    /// Page `page` (1-based) of the items of `collection_id`
    async fn fetch_listing_page(&self, collection_id: u64, page: u32) -> Result<ListingPage, ApiError>;
}

/// `CatalogApi` over HTTP
pub struct HttpCatalogApi {
    http: HttpClient,
    config: CatalogConfig,
}

impl HttpCatalogApi {
    pub fn new(config: CatalogConfig, http_config: &HttpConfig) -> Result<Self, ApiError> {
        let client_config = HttpClientConfig::from_http_config(http_config)
            .with_header("Accept", "application/json, text/plain, */*")
            .with_header("CLIENT", "web")
            .with_header("Client-Country", &config.client_country);
        let http = HttpClient::with_config(&client_config, "catalog")?;
        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| ApiError::InvalidRequest {
            target: raw,
            reason: e.to_string(),
        })
    }

    fn groups_url(&self) -> Result<Url, ApiError> {
        let mut url = self.endpoint("film_groups")?;
        url.query_pairs_mut()
            .append_pair("size", &self.config.group_count.to_string())
            .append_pair("offset", "0");
        Ok(url)
    }

    fn listing_url(&self, collection_id: u64, page: u32) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&format!("film_groups/{collection_id}/film_group_items"))?;
        url.query_pairs_mut()
            .append_pair("include_upcoming", &self.config.include_upcoming.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &self.config.page_size.to_string());
        Ok(url)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn discover_groups(&self) -> Result<Vec<CollectionDescriptor>, ApiError> {
        let url = self.groups_url()?;
        let groups: Vec<CollectionDescriptor> = self.http.get_json(url.as_str()).await?;
        info!("Discovered {} collections", groups.len());
        Ok(groups)
    }

    async fn fetch_listing_page(&self, collection_id: u64, page: u32) -> Result<ListingPage, ApiError> {
        let url = self.listing_url(collection_id, page)?;
        let response: ListingResponse = self.http.get_json(url.as_str()).await?;
        let page = ListingPage::from(response);
        debug!(
            "Collection {}: {} items, next page {:?}",
            collection_id,
            page.items.len(),
            page.next_page
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_payload_decodes_into_schema() {
        let payload = json!({
            "film_group_items": [{
                "film": {
                    "title": "Drive",
                    "duration": 100,
                    "year": 2011,
                    "web_url": "https://example.test/films/drive",
                    "genres": ["Crime", "Drama"],
                    "critic_review_rating": 4.1,
                    "historic_countries": ["United States"],
                    "directors": [{"name": "Nicolas Winding Refn"}, {"name": "Someone Else"}]
                }
            }],
            "meta": {"next_page": 2}
        });
        let response: ListingResponse = serde_json::from_value(payload).unwrap();
        let page = ListingPage::from(response);
        assert_eq!(page.next_page, Some(2));
        assert_eq!(page.items[0].film.directors[0].name, "Nicolas Winding Refn");
        assert_eq!(page.items[0].film.genres, ["Crime", "Drama"]);
    }

    #[test]
    fn null_or_zero_next_page_ends_pagination() {
        for meta in [json!({"next_page": null}), json!({}), json!({"next_page": 0})] {
            let response: ListingResponse =
                serde_json::from_value(json!({"film_group_items": [], "meta": meta})).unwrap();
            assert_eq!(ListingPage::from(response).next_page, None);
        }
    }

    #[test]
    fn null_lists_decode_as_empty() {
        let film: CatalogFilm = serde_json::from_value(json!({
            "title": "Untitled",
            "genres": null,
            "directors": null
        }))
        .unwrap();
        assert!(film.genres.is_empty());
        assert!(film.directors.is_empty());
        assert!(film.historic_countries.is_empty());
        assert_eq!(film.year, None);
    }

    #[test]
    fn missing_items_array_is_malformed() {
        let result = serde_json::from_value::<ListingResponse>(json!({"meta": {"next_page": null}}));
        assert!(result.is_err());
    }

    #[test]
    fn endpoints_carry_paging_parameters() {
        let api = HttpCatalogApi::new(
            CatalogConfig {
                base_url: "https://catalog.test/v3/".to_string(),
                ..CatalogConfig::default()
            },
            &HttpConfig::default(),
        )
        .unwrap();

        assert_eq!(
            api.groups_url().unwrap().as_str(),
            "https://catalog.test/v3/film_groups?size=40&offset=0"
        );
        assert_eq!(
            api.listing_url(17, 3).unwrap().as_str(),
            "https://catalog.test/v3/film_groups/17/film_group_items?include_upcoming=true&page=3&per_page=40"
        );
    }
}
