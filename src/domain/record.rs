//! # Film Record
//!
//! The unit of output: one enriched film row, plus the score states it can be in.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Critic score state of a record.
///
/// `Unscored` means no lookup result was ever attached (empty cell on disk),
/// `NoScore` means a film was matched but the provider had no score for it
/// (`-1` on disk).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Score {
    #[default]
    Unscored,
    NoScore,
    Scored(i32),
}

impl Score {
    /// On-disk sentinel for a matched film without a score
    pub const NO_SCORE_SENTINEL: i32 = -1;

    /// Rows the rescore job should query again
    #[must_use]
    pub const fn needs_rescore(self) -> bool {
        matches!(self, Self::Unscored | Self::NoScore)
    }

    /// Decodes the CSV cell value
    #[must_use]
    pub const fn from_cell(value: Option<i32>) -> Self {
        match value {
            None => Self::Unscored,
            Some(Self::NO_SCORE_SENTINEL) => Self::NoScore,
            Some(n) => Self::Scored(n),
        }
    }

    /// Encodes the CSV cell value
    #[must_use]
    pub const fn to_cell(self) -> Option<i32> {
        match self {
            Self::Unscored => None,
            Self::NoScore => Some(Self::NO_SCORE_SENTINEL),
            Self::Scored(n) => Some(n),
        }
    }
}

// Unscored < NoScore < Scored(n); sorting descending puts nulls last.
impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Scored(a), Self::Scored(b)) => a.cmp(b),
            (Self::Scored(_), _) => Ordering::Greater,
            (_, Self::Scored(_)) => Ordering::Less,
            (Self::NoScore, Self::NoScore) | (Self::Unscored, Self::Unscored) => Ordering::Equal,
            (Self::NoScore, Self::Unscored) => Ordering::Greater,
            (Self::Unscored, Self::NoScore) => Ordering::Less,
        }
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unscored => write!(f, "unscored"),
            Self::NoScore => write!(f, "no score"),
            Self::Scored(n) => write!(f, "{n}"),
        }
    }
}

/// Deduplication identity of a film
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub title: String,
    pub year: Option<i32>,
}

/// One enriched film
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    /// Running time in minutes
    pub duration: Option<u32>,
    pub year: Option<i32>,
    pub web_url: String,
    pub critic_review_rating: Option<f64>,
    pub director: String,
    pub genres: Vec<String>,
    pub historic_countries: Vec<String>,
    pub score: Score,
}

impl Record {
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey {
            title: self.title.clone(),
            year: self.year,
        }
    }
}

/// Stable sort by score, highest first. Unscored rows end up last.
pub fn sort_by_score_desc(records: &mut [Record]) {
    records.sort_by(|a, b| b.score.cmp(&a.score));
}
