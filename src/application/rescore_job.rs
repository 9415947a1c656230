//! Re-queries the score provider for rows of a consolidated file that have
//! no score yet (never scored, or matched without a score).

use std::path::Path;
use tokio::time::sleep;
use tracing::info;

use crate::application::score_lookup::ScoreLookup;
use crate::domain::record::sort_by_score_desc;
use crate::error::CrawlResult;
use crate::infrastructure::collection_store::{read_records, write_records};
use crate::infrastructure::config::RescoreSettings;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RescoreReport {
    /// Rows selected for another lookup
    pub candidates: usize,
    pub attempted: usize,
    pub succeeded: usize,
}

pub struct RescoreJob {
    lookup: ScoreLookup,
    settings: RescoreSettings,
}

impl RescoreJob {
    pub fn new(lookup: ScoreLookup, settings: RescoreSettings) -> Self {
        Self { lookup, settings }
    }

    /// Looks up every unscored row of `path` one at a time, pausing between
    /// requests, then rewrites the file sorted by score.
    pub async fn rescore(&self, path: &Path) -> CrawlResult<RescoreReport> {
        let mut records = read_records(path)?;
        let selected: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.score.needs_rescore())
            .map(|(index, _)| index)
            .collect();

        let mut report = RescoreReport {
            candidates: selected.len(),
            ..RescoreReport::default()
        };
        info!("Score recall: started with {} films without score", report.candidates);

        for (position, &index) in selected.iter().enumerate() {
            if position > 0 {
                sleep(self.settings.pace()).await;
            }

            let record = &mut records[index];
            report.attempted += 1;
            if let Some(found) = self.lookup.find(&record.title, record.year).await {
                record.score = found.score;
                report.succeeded += 1;
            }

            if self.settings.progress_due(report.attempted) {
                info!(
                    "Score recall: {:>5} / {:>5} scores extracted",
                    report.succeeded, report.attempted
                );
            }
        }

        sort_by_score_desc(&mut records);
        write_records(path, &records)?;
        info!(
            "Score recall finished for {}: {} / {} scores extracted",
            path.display(),
            report.succeeded,
            report.attempted
        );
        Ok(report)
    }
}
