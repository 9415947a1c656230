//! Best-effort critic score lookup
//!
//! Never fails: provider errors are logged and read as "no match".

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::ScoreMatch;
use crate::infrastructure::config::defaults;
use crate::infrastructure::score_provider::ScoreSearch;

#[derive(Clone)]
pub struct ScoreLookup {
    search: Arc<dyn ScoreSearch>,
    year_tolerance: i32,
}

impl ScoreLookup {
    pub fn new(search: Arc<dyn ScoreSearch>) -> Self {
        Self::with_year_tolerance(search, defaults::YEAR_TOLERANCE)
    }

    pub fn with_year_tolerance(search: Arc<dyn ScoreSearch>, year_tolerance: i32) -> Self {
        Self {
            search,
            year_tolerance,
        }
    }

    /// First candidate that is a film released within the year tolerance of
    /// `year`. Without a year only the media type is checked.
    pub async fn find(&self, title: &str, year: Option<i32>) -> Option<ScoreMatch> {
        let candidates = match self.search.search(title).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Score provider error for '{}': {}", title, e);
                return None;
            }
        };

        let found = candidates
            .into_iter()
            .find(|candidate| candidate.kind.is_film() && candidate.matches_year(year, self.year_tolerance));

        if found.is_none() {
            debug!("Score provider: no results found for '{}' ({:?})", title, year);
        }
        found
    }
}
