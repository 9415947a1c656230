//! Domain module - films, collections and critic scores
//!
//! Plain data types shared by the crawl pipeline. Nothing in here touches the
//! network or the file system.

pub mod collection;
pub mod record;
pub mod score_match;

pub use collection::{Collection, CollectionDescriptor, ExtractionRun, RunDate};
pub use record::{Record, RecordKey, Score};
pub use score_match::{MediaKind, ScoreMatch};
