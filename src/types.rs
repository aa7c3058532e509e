//! Core data types for the feedback portal
//!
//! Records are immutable once built. Sentiment is always derived by the
//! classifier (or decoded from a persisted row), never supplied by callers,
//! which is why [`Sentiment`] has no public constructor.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Optional free-text identity attached to a submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub location: String,
}

impl Identity {
    /// Identity with only a name, as the web form collects
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.trim().is_empty() && self.email.trim().is_empty()
    }
}

/// Three-way sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Positive" => Ok(SentimentLabel::Positive),
            "Negative" => Ok(SentimentLabel::Negative),
            "Neutral" => Ok(SentimentLabel::Neutral),
            other => Err(format!("unknown sentiment label '{}'", other)),
        }
    }
}

/// Derived sentiment: a label and the polarity score it was derived from
///
/// Score is always finite and within [-1.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sentiment {
    label: SentimentLabel,
    score: f64,
}

impl Sentiment {
    pub(crate) fn new(label: SentimentLabel, score: f64) -> Self {
        Self { label, score }
    }

    pub fn label(&self) -> SentimentLabel {
        self.label
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

/// One citizen feedback submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRecord {
    identity: Identity,
    text: String,
    sentiment: Sentiment,
    timestamp: Option<DateTime<Utc>>,
}

impl FeedbackRecord {
    /// Build an unstamped record; the store assigns the timestamp on append
    pub fn new(identity: Identity, text: impl Into<String>, sentiment: Sentiment) -> Self {
        Self {
            identity,
            text: text.into(),
            sentiment,
            timestamp: None,
        }
    }

    /// Pin the capture time instead of letting the store assign it
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

/// One suggestion, kept in its own collection with its own schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionRecord {
    name: String,
    category: String,
    text: String,
    sentiment: Sentiment,
    timestamp: Option<DateTime<Utc>>,
}

impl SuggestionRecord {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        text: impl Into<String>,
        sentiment: Sentiment,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            text: text.into(),
            sentiment,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}
