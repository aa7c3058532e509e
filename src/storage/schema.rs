//! Versioned column layouts and row codecs for the persisted collections

use super::TabularRecord;
use crate::types::{FeedbackRecord, Identity, Sentiment, SentimentLabel, SuggestionRecord};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// Fixed column layout of one persisted collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub version: u32,
    pub columns: &'static [&'static str],
}

impl Schema {
    pub fn header_line(&self) -> String {
        self.columns.join(",")
    }

    /// Exact, ordered header comparison; no column coercion
    pub fn matches(&self, header: &csv::StringRecord) -> bool {
        header.len() == self.columns.len()
            && header.iter().zip(self.columns).all(|(found, expected)| found == *expected)
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

pub const FEEDBACK_SCHEMA: Schema = Schema {
    name: "feedback",
    version: 1,
    columns: &[
        "name",
        "email",
        "location",
        "feedback",
        "sentiment",
        "score",
        "timestamp",
    ],
};

pub const SUGGESTION_SCHEMA: Schema = Schema {
    name: "suggestions",
    version: 1,
    columns: &[
        "name",
        "category",
        "suggestion",
        "sentiment",
        "score",
        "timestamp",
    ],
};

/// RFC 3339, UTC, microsecond precision
pub(crate) fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Micros, true))
        .unwrap_or_default()
}

/// True when `timestamp` survives a write and re-read unchanged
///
/// RFC 3339 has four-digit years only, so anything outside 0000-9999 fails.
pub(crate) fn timestamp_round_trips(timestamp: DateTime<Utc>) -> bool {
    parse_timestamp(&format_timestamp(Some(timestamp)))
        .map(|parsed| parsed == timestamp.trunc_subsecs(6))
        .unwrap_or(false)
}

fn parse_timestamp(field: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(field)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp '{}': {}", field, e))
}

fn parse_sentiment(label: &str, score: &str) -> Result<Sentiment, String> {
    let label: SentimentLabel = label.parse()?;
    let score: f64 = score
        .parse()
        .map_err(|e| format!("invalid score '{}': {}", score, e))?;
    if !score.is_finite() || !(-1.0..=1.0).contains(&score) {
        return Err(format!("score {} outside [-1, 1]", score));
    }
    Ok(Sentiment::new(label, score))
}

fn required_text(field: &str, column: &str) -> Result<String, String> {
    if field.trim().is_empty() {
        return Err(format!("empty {} column", column));
    }
    Ok(field.to_string())
}

fn field<'r>(row: &'r csv::StringRecord, idx: usize) -> Result<&'r str, String> {
    row.get(idx)
        .ok_or_else(|| format!("missing column {}", idx + 1))
}

impl TabularRecord for FeedbackRecord {
    fn schema() -> &'static Schema {
        &FEEDBACK_SCHEMA
    }

    fn text(&self) -> &str {
        FeedbackRecord::text(self)
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        FeedbackRecord::timestamp(self)
    }

    fn with_timestamp(self, timestamp: DateTime<Utc>) -> Self {
        FeedbackRecord::with_timestamp(self, timestamp)
    }

    fn to_row(&self) -> Vec<String> {
        let identity = self.identity();
        vec![
            identity.name.clone(),
            identity.email.clone(),
            identity.location.clone(),
            self.text().to_string(),
            self.sentiment().label().to_string(),
            self.sentiment().score().to_string(),
            format_timestamp(self.timestamp()),
        ]
    }

    fn from_row(row: &csv::StringRecord) -> Result<Self, String> {
        let identity = Identity {
            name: field(row, 0)?.to_string(),
            email: field(row, 1)?.to_string(),
            location: field(row, 2)?.to_string(),
        };
        let text = required_text(field(row, 3)?, "feedback")?;
        let sentiment = parse_sentiment(field(row, 4)?, field(row, 5)?)?;
        let timestamp = parse_timestamp(field(row, 6)?)?;

        Ok(FeedbackRecord::new(identity, text, sentiment).with_timestamp(timestamp))
    }
}

impl TabularRecord for SuggestionRecord {
    fn schema() -> &'static Schema {
        &SUGGESTION_SCHEMA
    }

    fn text(&self) -> &str {
        SuggestionRecord::text(self)
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        SuggestionRecord::timestamp(self)
    }

    fn with_timestamp(self, timestamp: DateTime<Utc>) -> Self {
        SuggestionRecord::with_timestamp(self, timestamp)
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.name().to_string(),
            self.category().to_string(),
            self.text().to_string(),
            self.sentiment().label().to_string(),
            self.sentiment().score().to_string(),
            format_timestamp(self.timestamp()),
        ]
    }

    fn from_row(row: &csv::StringRecord) -> Result<Self, String> {
        let text = required_text(field(row, 2)?, "suggestion")?;
        let sentiment = parse_sentiment(field(row, 3)?, field(row, 4)?)?;
        let timestamp = parse_timestamp(field(row, 5)?)?;

        Ok(
            SuggestionRecord::new(field(row, 0)?, field(row, 1)?, text, sentiment)
                .with_timestamp(timestamp),
        )
    }
}
