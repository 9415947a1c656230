//! Merges every per-collection file of a run into one ranked file

use std::collections::HashSet;
use std::path::PathBuf;
use tracing::info;

use crate::domain::record::sort_by_score_desc;
use crate::domain::{Record, RunDate};
use crate::error::CrawlResult;
use crate::infrastructure::collection_store::{CollectionStore, write_records};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidationSummary {
    pub path: PathBuf,
    pub files: usize,
    pub rows_read: usize,
    pub rows_written: usize,
}

impl ConsolidationSummary {
    #[must_use]
    pub const fn duplicates_dropped(&self) -> usize {
        self.rows_read - self.rows_written
    }
}

pub struct Consolidator {
    store: CollectionStore,
    suite: String,
}

impl Consolidator {
    pub fn new(store: CollectionStore, suite: impl Into<String>) -> Self {
        Self {
            store,
            suite: suite.into(),
        }
    }

    /// Reads the run's files in file-name order, keeps the first row seen for
    /// each (title, year), sorts by score and writes `<run_date>_<suite>.csv`.
    pub fn consolidate(&self, run_date: RunDate) -> CrawlResult<ConsolidationSummary> {
        let tables = self.store.load_all(run_date)?;
        let files = tables.len();
        let rows_read: usize = tables.iter().map(|(_, rows)| rows.len()).sum();

        let merged = merge(tables.into_iter().map(|(_, rows)| rows));
        let path = self.store.consolidated_path(run_date, &self.suite);
        write_records(&path, &merged)?;

        let summary = ConsolidationSummary {
            path,
            files,
            rows_read,
            rows_written: merged.len(),
        };
        info!(
            "📚 Consolidated {} files into {} ({} films, {} duplicates dropped)",
            summary.files,
            summary.path.display(),
            summary.rows_written,
            summary.duplicates_dropped()
        );
        Ok(summary)
    }
}

/// Concatenates `tables` in order, drops later rows whose (title, year) was
/// already seen and sorts the survivors by score, highest first.
pub fn merge<I>(tables: I) -> Vec<Record>
where
    I: IntoIterator<Item = Vec<Record>>,
{
    let mut seen = HashSet::new();
    let mut merged: Vec<Record> = tables
        .into_iter()
        .flatten()
        .filter(|record| seen.insert(record.key()))
        .collect();
    sort_by_score_desc(&mut merged);
    merged
}
