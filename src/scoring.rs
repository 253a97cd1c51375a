//! Lead quality scoring.
//!
//! A lead's score is the sum of five sub-scores plus a bonus, capped at 100:
//!
//! | Factor              | Points |
//! |---------------------|--------|
//! | Industry potential  | 0-25   |
//! | Revenue tier        | 0-25   |
//! | Contact quality     | 0-20   |
//! | Geographic market   | 0-15   |
//! | Data completeness   | 0-15   |
//! | High-value bonus    | +5     |
//!
//! Scoring never fails. Missing or malformed fields fall back to a default
//! contribution, so every record (including `{}`) gets a score.

use serde_json::Value;

use crate::models::{render_value, LeadRecord, LeadTable, SCORE_COLUMN};

/// Upper bound of every score.
pub const MAX_SCORE: u8 = 100;

/// Industry potential by lower-cased industry name.
pub const INDUSTRY_SCORES: &[(&str, u32)] = &[
    ("saas", 25),
    ("tech", 25),
    ("fintech", 25),
    ("software", 25),
    ("finance", 20),
    ("banking", 20),
    ("insurance", 18),
    ("healthcare", 15),
    ("medtech", 20),
    ("biotech", 18),
    ("ecommerce", 15),
    ("retail", 12),
    ("logistics", 10),
    ("energy", 12),
    ("cleantech", 15),
    ("edtech", 15),
    ("travel", 8),
    ("hospitality", 6),
    ("food", 5),
    ("agriculture", 4),
    ("manufacturing", 8),
];

/// Points for an industry outside [`INDUSTRY_SCORES`].
pub const DEFAULT_INDUSTRY_SCORE: u32 = 5;

/// Revenue buckets as `(lower bound, points)`, highest bound first.
pub const REVENUE_TIERS: &[(f64, u32)] = &[
    (50_000_000.0, 25),
    (20_000_000.0, 22),
    (10_000_000.0, 18),
    (5_000_000.0, 15),
    (2_000_000.0, 10),
    (1_000_000.0, 5),
];

/// Geographic market by upper-cased region code.
pub const REGION_SCORES: &[(&str, u32)] = &[
    ("US", 15),
    ("CANADA", 12),
    ("UK", 12),
    ("EU", 10),
    ("AUSTRALIA", 8),
    ("SINGAPORE", 8),
    ("JAPAN", 8),
    ("APAC", 6),
    ("LATAM", 5),
    ("AFRICA", 4),
    ("ME", 6),
];

/// Points for a region outside [`REGION_SCORES`].
pub const DEFAULT_REGION_SCORE: u32 = 3;

pub const PERSONAL_EMAIL_DOMAINS: &[&str] = &["gmail.com", "yahoo.com", "hotmail.com"];
/// Placeholder list; kept literally for compatibility with existing scores.
pub const CORPORATE_EMAIL_DOMAINS: &[&str] = &["company.com", "corp.com", "inc.com"];

pub const PERSONAL_EMAIL_SCORE: u32 = 8;
pub const CORPORATE_EMAIL_SCORE: u32 = 15;
pub const OTHER_EMAIL_SCORE: u32 = 12;
pub const VALID_PHONE_SCORE: u32 = 5;
/// Minimum length of a phone number once separators are removed.
pub const MIN_PHONE_LENGTH: usize = 10;

pub const REQUIRED_FIELDS: [&str; 4] = ["company_name", "industry", "region", "revenue_estimate"];
pub const OPTIONAL_FIELDS: [&str; 2] = ["contact_email", "contact_phone"];
const REQUIRED_FIELDS_WEIGHT: f64 = 10.0;
const OPTIONAL_FIELDS_WEIGHT: f64 = 5.0;

pub const BONUS_INDUSTRIES: [&str; 3] = ["saas", "tech", "fintech"];
pub const BONUS_REGIONS: [&str; 3] = ["US", "UK", "CANADA"];
pub const BONUS_MIN_REVENUE: f64 = 10_000_000.0;
pub const BONUS_SCORE: u32 = 5;

/// Computes the lead score for one record, in `0..=100`.
pub fn score_lead(record: &LeadRecord) -> u8 {
    let industry = normalized_industry(record);
    let region = normalized_region(record);
    let revenue = parse_revenue(record.get("revenue_estimate"));

    let mut score = industry_score(&industry)
        + revenue_score(revenue)
        + contact_score(record)
        + region_score(&region)
        + completeness_score(record);

    if qualifies_for_bonus(&industry, revenue, &region) {
        score += BONUS_SCORE;
    }

    score.min(u32::from(MAX_SCORE)) as u8
}

/// Returns a copy of `table` with a `score` column set on every row.
///
/// An existing `score` column is overwritten. An empty table comes back empty,
/// with the `score` column declared.
pub fn score_dataframe(table: &LeadTable) -> LeadTable {
    let mut scored = table.clone();
    scored.ensure_column(SCORE_COLUMN);
    for row in scored.rows_mut().iter_mut() {
        let score = score_lead(row);
        row.insert(SCORE_COLUMN.to_string(), Value::from(score));
    }
    scored
}

/// Industry potential for an already lower-cased industry name.
pub fn industry_score(industry: &str) -> u32 {
    lookup(INDUSTRY_SCORES, industry).unwrap_or(DEFAULT_INDUSTRY_SCORE)
}

/// Revenue tier points. NaN falls into no bucket.
pub fn revenue_score(revenue: f64) -> u32 {
    REVENUE_TIERS
        .iter()
        .find(|(threshold, _)| revenue >= *threshold)
        .map(|&(_, points)| points)
        .unwrap_or(0)
}

/// Geographic market points for an already upper-cased region code.
pub fn region_score(region: &str) -> u32 {
    lookup(REGION_SCORES, region).unwrap_or(DEFAULT_REGION_SCORE)
}

/// Contact quality: email points plus phone points.
pub fn contact_score(record: &LeadRecord) -> u32 {
    email_score(record.get("contact_email")) + phone_score(record.get("contact_phone"))
}

/// Email points by domain class. Blank values and the literal `nan` score 0.
pub fn email_score(value: Option<&Value>) -> u32 {
    let Some(email) = value.and_then(render_value) else {
        return 0;
    };
    let trimmed = email.trim();
    if trimmed.is_empty() || trimmed == "nan" {
        return 0;
    }

    // Everything after the last '@'; the whole value if there is none.
    let domain = email.rsplit('@').next().unwrap_or_default().to_lowercase();
    if PERSONAL_EMAIL_DOMAINS.contains(&domain.as_str()) {
        PERSONAL_EMAIL_SCORE
    } else if CORPORATE_EMAIL_DOMAINS.contains(&domain.as_str()) {
        CORPORATE_EMAIL_SCORE
    } else {
        OTHER_EMAIL_SCORE
    }
}

/// Phone points: long enough once `-`, space and parentheses are removed.
pub fn phone_score(value: Option<&Value>) -> u32 {
    let Some(phone) = value.and_then(render_value) else {
        return 0;
    };
    if phone.trim().is_empty() {
        return 0;
    }

    let length = phone
        .chars()
        .filter(|c| !matches!(c, '-' | ' ' | '(' | ')'))
        .count();
    if length >= MIN_PHONE_LENGTH {
        VALID_PHONE_SCORE
    } else {
        0
    }
}

/// Data completeness points, truncated to an integer.
pub fn completeness_score(record: &LeadRecord) -> u32 {
    let required = count_filled(record, &REQUIRED_FIELDS);
    let optional = count_filled(record, &OPTIONAL_FIELDS);

    let points = (required as f64 / REQUIRED_FIELDS.len() as f64) * REQUIRED_FIELDS_WEIGHT
        + (optional as f64 / OPTIONAL_FIELDS.len() as f64) * OPTIONAL_FIELDS_WEIGHT;
    points as u32
}

/// Reads the revenue estimate as a float. Anything unparseable is 0.
pub fn parse_revenue(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// True when the field exists, is not null and is not blank.
pub fn is_filled(record: &LeadRecord, field: &str) -> bool {
    record
        .get(field)
        .and_then(render_value)
        .is_some_and(|text| !text.trim().is_empty())
}

fn count_filled(record: &LeadRecord, fields: &[&str]) -> usize {
    fields.iter().filter(|f| is_filled(record, f)).count()
}

fn qualifies_for_bonus(industry: &str, revenue: f64, region: &str) -> bool {
    BONUS_INDUSTRIES.contains(&industry)
        && revenue >= BONUS_MIN_REVENUE
        && BONUS_REGIONS.contains(&region)
}

fn normalized_industry(record: &LeadRecord) -> String {
    field_text(record, "industry").trim().to_lowercase()
}

fn normalized_region(record: &LeadRecord) -> String {
    field_text(record, "region").trim().to_uppercase()
}

fn field_text(record: &LeadRecord, field: &str) -> String {
    record.get(field).and_then(render_value).unwrap_or_default()
}

fn lookup(table: &[(&str, u32)], key: &str) -> Option<u32> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|&(_, points)| points)
}
