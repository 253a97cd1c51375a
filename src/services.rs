use crate::config::Config;
use crate::errors::AppError;
use crate::loader;
use crate::models::*;
use crate::scoring::{score_dataframe, score_lead};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Serves scored leads from a CSV file.
///
/// Holds only the file location. The table is read, scored and filtered from
/// scratch on every call; nothing is cached and the file is never written.
#[derive(Debug, Clone)]
pub struct LeadService {
    data_path: PathBuf,
}

impl LeadService {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.data_path.clone())
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Reads the backing file. A missing or unreadable file is an empty table.
    pub fn load_table(&self) -> LeadTable {
        match loader::load_leads(&self.data_path) {
            Ok(table) => table,
            Err(e) if e.is_not_found() => {
                tracing::debug!("No lead data at {}", self.data_path.display());
                LeadTable::default()
            }
            Err(e) => {
                tracing::warn!("Failed to load leads, serving none: {}", e);
                LeadTable::default()
            }
        }
    }

    /// Loads, scores and filters the lead table.
    ///
    /// Every row is scored before filtering, so `min_score` sees fresh scores.
    pub fn filtered_table(&self, filters: &LeadFilters) -> LeadTable {
        let table = self.load_table();
        if table.columns().is_empty() {
            return table;
        }

        let mut scored = score_dataframe(&table);
        scored.retain(|record| filters.matches(record));

        tracing::info!(
            "Scored {} leads, {} after filters {:?}",
            table.len(),
            scored.len(),
            filters
        );
        scored
    }

    /// Scored leads matching `filters`, in source order.
    pub fn list_leads(&self, filters: &LeadFilters) -> Vec<LeadRecord> {
        self.filtered_table(filters).into_rows()
    }

    /// Histogram of scores for the leads matching `filters`.
    pub fn score_distribution(&self, filters: &LeadFilters) -> ScoreDistribution {
        let table = self.filtered_table(filters);
        ScoreDistribution::from_scores(
            table
                .rows()
                .iter()
                .filter_map(|row| row.get(SCORE_COLUMN).and_then(Value::as_u64))
                .map(|score| score.min(u64::from(u8::MAX)) as u8),
        )
    }

    /// The leads matching `filters` as CSV bytes, `score` as the last column.
    pub fn export_csv(&self, filters: &LeadFilters) -> Result<Vec<u8>, AppError> {
        let table = self.filtered_table(filters);
        let mut buffer = Vec::new();
        loader::write_leads(&table, &mut buffer)?;
        Ok(buffer)
    }

    /// Scores caller-supplied data. Anything that is not a JSON object is
    /// scored as an empty record.
    pub fn score_submitted(payload: &Value) -> u8 {
        match payload {
            Value::Object(record) => score_lead(record),
            _ => score_lead(&LeadRecord::new()),
        }
    }
}
