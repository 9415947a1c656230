//! Collections and extraction runs

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::record::Record;

const RUN_DATE_FORMAT: &str = "%Y%m%d";

/// Partition key shared by every file one run produces (`YYYYMMDD`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunDate(NaiveDate);

impl RunDate {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Local calendar date at the time of the call
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

}

impl fmt::Display for RunDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(RUN_DATE_FORMAT))
    }
}

impl FromStr for RunDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, RUN_DATE_FORMAT).map(Self)
    }
}

/// Collection entry as returned by catalog group discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDescriptor {
    pub id: u64,
    pub title: String,
}

/// A curated collection and the records crawled from it
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub name: String,
    pub id: u64,
    /// Page-fetch order; only meaningful until the score sort at write time
    pub records: Vec<Record>,
    /// Set when a listing page failed and the remaining pages were skipped
    pub truncated: bool,
}

impl Collection {
    #[must_use]
    pub fn new(name: impl Into<String>, id: u64) -> Self {
        Self {
            name: name.into(),
            id,
            records: Vec::new(),
            truncated: false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// File stem for this collection: lower-cased, whitespace runs collapsed to `_`.
    /// A blank name falls back to `collection_<id>`.
    #[must_use]
    pub fn slug(&self) -> String {
        let slug = self
            .name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .replace(['/', '\\'], "_");
        if slug.is_empty() {
            format!("collection_{}", self.id)
        } else {
            slug
        }
    }
}

impl From<CollectionDescriptor> for Collection {
    fn from(descriptor: CollectionDescriptor) -> Self {
        Self::new(descriptor.title, descriptor.id)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id: {}, films: {})", self.name, self.id, self.records.len())
    }
}

/// One invocation of the pipeline
#[derive(Debug, Clone)]
pub struct ExtractionRun {
    pub run_date: RunDate,
    pub collections: Vec<Collection>,
}

impl ExtractionRun {
    #[must_use]
    pub const fn new(run_date: RunDate) -> Self {
        Self {
            run_date,
            collections: Vec::new(),
        }
    }
}
