//! Critic score provider client (title autosearch)

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use crate::domain::{MediaKind, Score, ScoreMatch};
use crate::error::ApiError;
use crate::infrastructure::config::{HttpConfig, ScoreProviderConfig};
use crate::infrastructure::http_client::{HttpClient, HttpClientConfig};

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("year pattern is a valid regex"));

/// `itemDate` comes through either as a bare year or as free text
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ItemDate {
    Year(i64),
    Text(String),
}

impl ItemDate {
    fn year(&self) -> Option<i32> {
        match self {
            Self::Year(year) => i32::try_from(*year).ok(),
            Self::Text(text) => YEAR_PATTERN.find(text).and_then(|m| m.as_str().parse().ok()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    #[serde(default)]
    url: String,
    name: String,
    #[serde(rename = "metaScore", default)]
    meta_score: Option<i32>,
    #[serde(rename = "refType")]
    ref_type: String,
    #[serde(rename = "itemDate", default)]
    item_date: Option<ItemDate>,
}

impl From<Candidate> for ScoreMatch {
    fn from(candidate: Candidate) -> Self {
        Self {
            year: candidate.item_date.as_ref().and_then(ItemDate::year),
            score: candidate.meta_score.map_or(Score::NoScore, Score::Scored),
            kind: MediaKind::from_ref_type(&candidate.ref_type),
            name: candidate.name,
            url: candidate.url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AutoComplete {
    #[serde(default)]
    results: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct AutoSearchResponse {
    #[serde(rename = "autoComplete")]
    auto_complete: AutoComplete,
}

fn decode_candidates(response: AutoSearchResponse) -> Vec<ScoreMatch> {
    response
        .auto_complete
        .results
        .into_iter()
        .map(ScoreMatch::from)
        .collect()
}

/// Free-text title search against the score provider
#[async_trait]
pub trait ScoreSearch: Send + Sync {
    /// Candidates in provider ranking order
    async fn search(&self, title: &str) -> Result<Vec<ScoreMatch>, ApiError>;
}

/// `ScoreSearch` over HTTP
pub struct HttpScoreSearch {
    http: HttpClient,
    search_url: String,
}

impl HttpScoreSearch {
    pub fn new(config: &ScoreProviderConfig, http_config: &HttpConfig) -> Result<Self, ApiError> {
        let client_config = HttpClientConfig::from_http_config(http_config)
            .with_header("Accept", "*/*")
            .with_header("X-Requested-With", "XMLHttpRequest");
        let http = HttpClient::with_config(&client_config, "score-provider")?;
        Ok(Self {
            http,
            search_url: config.search_url.clone(),
        })
    }
}

#[async_trait]
impl ScoreSearch for HttpScoreSearch {
    async fn search(&self, title: &str) -> Result<Vec<ScoreMatch>, ApiError> {
        let term = title.to_lowercase();
        let form = [
            ("search_term", term.as_str()),
            ("image_size", "98"),
            ("search_each", "true"),
        ];
        let response: AutoSearchResponse = self.http.post_form_json(&self.search_url, &form).await?;
        Ok(decode_candidates(response))
    }
}
