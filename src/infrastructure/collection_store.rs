//! Dated CSV snapshots of crawled collections
//!
//! Layout under the base path:
//! - `<YYYYMMDD>/<collection_slug>.csv`, one per collection
//! - `<YYYYMMDD>_<suite>.csv`, the consolidated file

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::record::sort_by_score_desc;
use crate::domain::{Collection, Record, RunDate, Score};
use crate::error::StoreError;

/// Header shared by every file the store writes
pub const COLUMNS: [&str; 9] = [
    "title",
    "duration",
    "year",
    "web_url",
    "critic_review_rating",
    "director",
    "genres",
    "historic_countries",
    "meta_score",
];

const EXTENSION: &str = "csv";

/// On-disk row. List columns hold JSON arrays.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    title: String,
    duration: Option<u32>,
    year: Option<i32>,
    web_url: String,
    critic_review_rating: Option<f64>,
    director: String,
    genres: String,
    historic_countries: String,
    meta_score: Option<i32>,
}

impl CsvRow {
    fn from_record(record: &Record) -> Self {
        Self {
            title: record.title.clone(),
            duration: record.duration,
            year: record.year,
            web_url: record.web_url.clone(),
            critic_review_rating: record.critic_review_rating,
            director: record.director.clone(),
            genres: encode_list(&record.genres),
            historic_countries: encode_list(&record.historic_countries),
            meta_score: record.score.to_cell(),
        }
    }

    fn into_record(self, path: &Path) -> Result<Record, StoreError> {
        Ok(Record {
            genres: decode_list(&self.genres, path)?,
            historic_countries: decode_list(&self.historic_countries, path)?,
            score: Score::from_cell(self.meta_score),
            title: self.title,
            duration: self.duration,
            year: self.year,
            web_url: self.web_url,
            critic_review_rating: self.critic_review_rating,
            director: self.director,
        })
    }
}

fn encode_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

fn decode_list(cell: &str, path: &Path) -> Result<Vec<String>, StoreError> {
    if cell.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(cell).map_err(|e| StoreError::InvalidRow {
        path: path.to_path_buf(),
        reason: format!("list column '{cell}' is not a JSON array: {e}"),
    })
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> StoreError + '_ {
    move |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes `records` to `path` in the given order, replacing any existing file
pub fn write_records(path: &Path, records: &[Record]) -> Result<(), StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error(path))?;

    writer.write_record(COLUMNS).map_err(csv_error(path))?;
    for record in records {
        writer.serialize(CsvRow::from_record(record)).map_err(csv_error(path))?;
    }
    writer.flush().map_err(io_error(path))?;
    Ok(())
}

/// Reads every row of a file written by [`write_records`]
pub fn read_records(path: &Path) -> Result<Vec<Record>, StoreError> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_error(path))?;

    let headers = reader.headers().map_err(csv_error(path))?;
    if headers.iter().ne(COLUMNS) {
        return Err(StoreError::InvalidRow {
            path: path.to_path_buf(),
            reason: format!("unexpected header: {}", headers.iter().collect::<Vec<_>>().join(",")),
        });
    }

    reader
        .deserialize::<CsvRow>()
        .map(|row| row.map_err(csv_error(path))?.into_record(path))
        .collect()
}

/// Per-collection and consolidated CSV files under one base directory
#[derive(Debug, Clone)]
pub struct CollectionStore {
    base_path: PathBuf,
}

impl CollectionStore {
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    #[must_use]
    pub fn run_dir(&self, run_date: RunDate) -> PathBuf {
        self.base_path.join(run_date.to_string())
    }

    #[must_use]
    pub fn collection_path(&self, collection: &Collection, run_date: RunDate) -> PathBuf {
        self.run_dir(run_date)
            .join(format!("{}.{EXTENSION}", collection.slug()))
    }

    #[must_use]
    pub fn consolidated_path(&self, run_date: RunDate, suite: &str) -> PathBuf {
        self.base_path.join(format!("{run_date}_{suite}.{EXTENSION}"))
    }

    /// Writes the collection sorted by score, overwriting an earlier file for
    /// the same collection and date.
    pub fn save(&self, collection: &Collection, run_date: RunDate) -> Result<PathBuf, StoreError> {
        let dir = self.run_dir(run_date);
        fs::create_dir_all(&dir).map_err(io_error(&dir))?;

        let mut records = collection.records.clone();
        sort_by_score_desc(&mut records);

        let path = self.collection_path(collection, run_date);
        write_records(&path, &records)?;
        info!("💾 Saved {} films of '{}' to {}", records.len(), collection.name, path.display());
        Ok(path)
    }

    /// All per-collection files of `run_date`, ordered by file name.
    /// A missing run directory yields no tables.
    pub fn load_all(&self, run_date: RunDate) -> Result<Vec<(PathBuf, Vec<Record>)>, StoreError> {
        let dir = self.run_dir(run_date);
        if !dir.exists() {
            debug!("No run directory at {}", dir.display());
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir).map_err(io_error(&dir))? {
            let path = entry.map_err(io_error(&dir))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();

        paths
            .into_iter()
            .map(|path| {
                let records = read_records(&path)?;
                Ok((path, records))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(title: &str, year: i32, score: Score) -> Record {
        Record {
            title: title.to_string(),
            duration: Some(95),
            year: Some(year),
            web_url: format!("https://catalog.test/films/{}", title.to_lowercase()),
            critic_review_rating: Some(3.8),
            director: "Agnès Varda".to_string(),
            genres: vec!["Drama".to_string(), "Comedy, Dark".to_string()],
            historic_countries: vec!["France".to_string()],
            score,
        }
    }

    fn run_date() -> RunDate {
        "20221208".parse().unwrap()
    }

    #[test]
    fn save_then_load_preserves_every_column() {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::new(dir.path());
        let mut collection = Collection::new("Now Showing", 1);
        let mut sparse = record("Sparse", 2001, Score::Unscored);
        sparse.duration = None;
        sparse.critic_review_rating = None;
        sparse.year = None;
        collection.records = vec![sparse.clone(), record("Cleo", 1962, Score::NoScore)];

        let path = store.save(&collection, run_date()).unwrap();
        assert_eq!(path, dir.path().join("20221208").join("now_showing.csv"));

        let tables = store.load_all(run_date()).unwrap();
        assert_eq!(tables.len(), 1);
        let loaded = &tables[0].1;
        // NoScore sorts above Unscored
        assert_eq!(loaded[0], record("Cleo", 1962, Score::NoScore));
        assert_eq!(loaded[1], sparse);
    }

    #[test]
    fn saved_file_is_sorted_and_has_fixed_header() {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::new(dir.path());
        let mut collection = Collection::new("Ranked", 2);
        collection.records = vec![
            record("Low", 2000, Score::Scored(40)),
            record("None", 2000, Score::Unscored),
            record("High", 2000, Score::Scored(90)),
        ];

        let path = store.save(&collection, run_date()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(&COLUMNS.join(",")));

        let titles: Vec<_> = read_records(&path).unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, ["High", "Low", "None"]);
    }

    #[test]
    fn saving_twice_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::new(dir.path());
        let mut collection = Collection::new("Again", 3);
        collection.records = vec![record("A", 2000, Score::Scored(1)), record("B", 2000, Score::Scored(2))];
        store.save(&collection, run_date()).unwrap();

        collection.records.truncate(1);
        let path = store.save(&collection, run_date()).unwrap();
        assert_eq!(read_records(&path).unwrap().len(), 1);
    }

    #[test]
    fn empty_collection_still_writes_header() {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::new(dir.path());
        let path = store.save(&Collection::new("Empty", 4), run_date()).unwrap();
        assert!(read_records(&path).unwrap().is_empty());
    }

    #[test]
    fn load_all_orders_by_file_name_and_ignores_other_files() {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::new(dir.path());
        for name in ["Zeta", "Alpha", "Mid"] {
            store.save(&Collection::new(name, 1), run_date()).unwrap();
        }
        fs::write(store.run_dir(run_date()).join("notes.txt"), "skip me").unwrap();

        let names: Vec<_> = store
            .load_all(run_date())
            .unwrap()
            .into_iter()
            .map(|(path, _)| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["alpha.csv", "mid.csv", "zeta.csv"]);
    }

    #[test]
    fn blank_collection_name_is_saved_under_its_id() {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::new(dir.path());
        let mut blank = Collection::new("", 12);
        blank.records = vec![record("Cléo", 1962, Score::Scored(80))];
        let path = store.save(&blank, run_date()).unwrap();
        assert_eq!(path, store.run_dir(run_date()).join("collection_12.csv"));

        let tables = store.load_all(run_date()).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].1.len(), 1);
    }

    #[test]
    fn missing_run_directory_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::new(dir.path());
        assert!(store.load_all(run_date()).unwrap().is_empty());
    }

    #[test]
    fn foreign_header_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.csv");
        fs::write(&path, "name,score\nx,1\n").unwrap();
        assert!(matches!(read_records(&path), Err(StoreError::InvalidRow { .. })));
    }
}
