use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::num::IntErrorKind;

// ============ Lead Data Models ============

/// A single lead: field name to raw value.
///
/// Columns are not fixed. Any field may be absent, and `null` is treated
/// exactly like an absent field by the scoring engine.
pub type LeadRecord = Map<String, Value>;

/// Name of the derived column added by [`crate::scoring::score_dataframe`].
pub const SCORE_COLUMN: &str = "score";

/// An ordered set of lead records sharing a column list.
///
/// The column list is kept separately from the rows so that an empty table
/// still knows its shape (an empty scored table still has a `score` column).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadTable {
    /// Column names in source order.
    columns: Vec<String>,
    /// Rows in source order.
    rows: Vec<LeadRecord>,
}

impl LeadTable {
    pub fn new(columns: Vec<String>, rows: Vec<LeadRecord>) -> Self {
        Self { columns, rows }
    }

    /// Builds a table from bare records, deriving the column list from the
    /// order in which fields first appear.
    pub fn from_records(rows: Vec<LeadRecord>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[LeadRecord] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<LeadRecord> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Appends `name` to the column list unless it is already there.
    pub fn ensure_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<LeadRecord> {
        &mut self.rows
    }

    /// Keeps only the rows matching `predicate`, preserving order and columns.
    pub fn retain<F>(&mut self, predicate: F)
    where
        F: FnMut(&LeadRecord) -> bool,
    {
        self.rows.retain(predicate);
    }
}

/// Renders a cell the way it reads as text.
///
/// `null` has no text. Booleans render as `True`/`False`, numbers use their
/// JSON form and nested values their compact JSON.
pub fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

// ============ API Request/Response Models ============

/// Filters accepted by the list, insights and export endpoints.
///
/// Values are kept as the caller sent them; interpretation (case folding,
/// integer parsing) happens in [`LeadFilters::matches`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadFilters {
    pub industry: Option<String>,
    pub region: Option<String>,
    pub min_score: Option<String>,
}

impl LeadFilters {
    /// Builds filters from raw query pairs. The first occurrence of a key wins.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut filters = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "industry" => &mut filters.industry,
                "region" => &mut filters.region,
                "min_score" => &mut filters.min_score,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        filters
    }

    /// Industry filter, if one was given and it is not empty.
    pub fn industry(&self) -> Option<&str> {
        self.industry.as_deref().filter(|s| !s.is_empty())
    }

    /// Region filter, if one was given and it is not empty.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref().filter(|s| !s.is_empty())
    }

    /// Minimum score as an integer. Unparseable input disables the filter.
    ///
    /// Integers too large for `i64` saturate, so they still filter.
    pub fn min_score(&self) -> Option<i64> {
        let raw = self.min_score.as_deref()?.trim();
        match raw.parse::<i64>() {
            Ok(value) => Some(value),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Some(i64::MAX),
                IntErrorKind::NegOverflow => Some(i64::MIN),
                _ => None,
            },
        }
    }

    /// Returns true when a scored record passes every active filter.
    ///
    /// A record without a `score` field never passes an active `min_score`.
    /// A null or absent industry/region never matches, not even `none`.
    pub fn matches(&self, record: &LeadRecord) -> bool {
        if let Some(industry) = self.industry() {
            if !field_equals_ignore_case(record, "industry", industry) {
                return false;
            }
        }
        if let Some(region) = self.region() {
            if !field_equals_ignore_case(record, "region", region) {
                return false;
            }
        }
        if let Some(min_score) = self.min_score() {
            let score = record.get(SCORE_COLUMN).and_then(Value::as_i64);
            if !score.is_some_and(|s| s >= min_score) {
                return false;
            }
        }
        true
    }
}

fn field_equals_ignore_case(record: &LeadRecord, field: &str, expected: &str) -> bool {
    record
        .get(field)
        .and_then(render_value)
        .is_some_and(|actual| actual.to_lowercase() == expected.to_lowercase())
}

/// Response body of `POST /api/score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: u8,
}

/// One band of the score histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBand {
    /// Display label, e.g. `"40-59"`.
    pub range: String,
    pub min: u8,
    pub max: u8,
    pub count: usize,
}

/// Score histogram returned by `GET /api/insights`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub total: usize,
    pub bands: Vec<ScoreBand>,
}

/// Inclusive band bounds used by the insights endpoint.
pub const SCORE_BANDS: [(u8, u8); 5] = [(0, 19), (20, 39), (40, 59), (60, 79), (80, 100)];

impl ScoreDistribution {
    /// Counts scores into [`SCORE_BANDS`]. Out-of-range scores are counted in
    /// `total` only.
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let mut bands: Vec<ScoreBand> = SCORE_BANDS
            .iter()
            .map(|&(min, max)| ScoreBand {
                range: format!("{}-{}", min, max),
                min,
                max,
                count: 0,
            })
            .collect();

        let mut total = 0;
        for score in scores {
            total += 1;
            if let Some(band) = bands
                .iter_mut()
                .find(|b| score >= b.min && score <= b.max)
            {
                band.count += 1;
            }
        }

        Self { total, bands }
    }
}
