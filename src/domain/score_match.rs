//! Critic score search results

use serde::{Deserialize, Serialize};

use super::record::Score;

/// Media type tag of a score provider result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Film,
    Other(String),
}

impl MediaKind {
    /// Maps the provider's `refType` tag. Both "film" and "Movie" denote films.
    #[must_use]
    pub fn from_ref_type(ref_type: &str) -> Self {
        let tag = ref_type.trim();
        if tag.eq_ignore_ascii_case("film") || tag.eq_ignore_ascii_case("movie") {
            Self::Film
        } else {
            Self::Other(tag.to_string())
        }
    }

    #[must_use]
    pub const fn is_film(&self) -> bool {
        matches!(self, Self::Film)
    }
}

/// A candidate returned by the score provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreMatch {
    pub name: String,
    pub url: String,
    pub year: Option<i32>,
    /// Never `Unscored`: a candidate without a score is `NoScore`
    pub score: Score,
    pub kind: MediaKind,
}

impl ScoreMatch {
    /// `true` when the candidate year is within `tolerance` of `year`.
    /// Without a requested year any candidate year is accepted.
    #[must_use]
    pub fn matches_year(&self, year: Option<i32>, tolerance: i32) -> bool {
        match (year, self.year) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(wanted), Some(found)) => found.abs_diff(wanted) <= tolerance.unsigned_abs(),
        }
    }
}
