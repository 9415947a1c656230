//! Error types for the crawl pipeline
//!
//! Transient API failures are absorbed close to where they happen (logged and
//! turned into "no match" or a truncated collection). Everything that reaches
//! the caller through these types aborts the run.

use std::path::PathBuf;
use thiserror::Error;

/// Failure talking to the catalog or the score provider
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error {status}: {url}")]
    Status { status: u16, url: String },

    #[error("HTTP request failed for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("Invalid request for {target}: {reason}")]
    InvalidRequest { target: String, reason: String },
}

impl ApiError {
    /// Non-success status or a transport failure; safe to skip past
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Transport { .. })
    }
}

/// Reading or writing the CSV snapshots
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid row in {path}: {reason}")]
    InvalidRow { path: PathBuf, reason: String },
}

/// Fatal errors of the crawl, consolidation and rescore steps
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Catalog item '{title}' has no director listed")]
    MissingDirector { title: String },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Enrichment worker failed: {0}")]
    WorkerPanicked(String),
}

/// Configuration loading and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    FileLoad {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

pub type CrawlResult<T> = Result<T, CrawlError>;
