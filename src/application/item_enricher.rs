//! Projects a catalog item into a `Record` and attaches its critic score

use crate::application::score_lookup::ScoreLookup;
use crate::domain::{Record, Score};
use crate::error::{CrawlError, CrawlResult};
use crate::infrastructure::catalog_api::CatalogItem;

#[derive(Clone)]
pub struct ItemEnricher {
    lookup: ScoreLookup,
}

impl ItemEnricher {
    #[must_use]
    pub fn new(lookup: ScoreLookup) -> Self {
        Self { lookup }
    }

    /// Fails with `MissingDirector` when the item lists no director.
    /// A lookup without a match leaves the score `Unscored`.
    pub async fn enrich(&self, item: CatalogItem) -> CrawlResult<Record> {
        let mut record = project(item)?;
        if let Some(found) = self.lookup.find(&record.title, record.year).await {
            record.score = found.score;
        }
        Ok(record)
    }
}

fn project(item: CatalogItem) -> CrawlResult<Record> {
    let film = item.film;
    let director = film
        .directors
        .into_iter()
        .next()
        .map(|director| director.name)
        .ok_or_else(|| CrawlError::MissingDirector {
            title: film.title.clone(),
        })?;

    Ok(Record {
        title: film.title,
        duration: film.duration,
        year: film.year,
        web_url: film.web_url.unwrap_or_default(),
        critic_review_rating: film.critic_review_rating,
        director,
        genres: film.genres,
        historic_countries: film.historic_countries,
        score: Score::Unscored,
    })
}
