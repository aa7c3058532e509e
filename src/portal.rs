//! Feedback ingestion pipeline
//!
//! Validates a submission, classifies it, and appends the resulting record
//! to the matching store. The classifier and both stores are constructed by
//! the caller and handed in; the portal owns no global state.

use crate::error::{PortalError, Result};
use crate::sentiment::SentimentClassifier;
use crate::storage::{FeedbackStore, TabularRecord};
use crate::types::{FeedbackRecord, Identity, SentimentLabel, SuggestionRecord};
use serde::Serialize;
use tracing::{debug, info};

/// Per-label counts over a collection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    /// Mean score, `None` for an empty collection
    pub mean_score: Option<f64>,
}

impl SentimentSummary {
    pub fn from_sentiments(sentiments: impl IntoIterator<Item = (SentimentLabel, f64)>) -> Self {
        let mut summary = SentimentSummary::default();
        let mut score_sum = 0.0;

        for (label, score) in sentiments {
            summary.total += 1;
            score_sum += score;
            match label {
                SentimentLabel::Positive => summary.positive += 1,
                SentimentLabel::Negative => summary.negative += 1,
                SentimentLabel::Neutral => summary.neutral += 1,
            }
        }

        if summary.total > 0 {
            summary.mean_score = Some(score_sum / summary.total as f64);
        }
        summary
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    /// Share of `label` in [0, 1]; zero for an empty collection
    pub fn share(&self, label: SentimentLabel) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count(label) as f64 / self.total as f64
        }
    }
}

/// Classifier plus the two collections it feeds
pub struct FeedbackPortal {
    classifier: SentimentClassifier,
    feedback: FeedbackStore<FeedbackRecord>,
    suggestions: FeedbackStore<SuggestionRecord>,
}

fn require_text(text: &str, what: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(PortalError::Validation(format!("{} must not be empty", what)));
    }
    Ok(())
}

impl FeedbackPortal {
    pub fn new(
        classifier: SentimentClassifier,
        feedback: FeedbackStore<FeedbackRecord>,
        suggestions: FeedbackStore<SuggestionRecord>,
    ) -> Self {
        Self {
            classifier,
            feedback,
            suggestions,
        }
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    /// Classify and persist one feedback submission
    pub fn submit_feedback(&mut self, identity: Identity, text: &str) -> Result<FeedbackRecord> {
        require_text(text, "feedback")?;
        let sentiment = self.classifier.classify(text)?;
        debug!(
            "Feedback from {} classified {}",
            if identity.is_anonymous() { "anonymous" } else { "named citizen" },
            sentiment.label()
        );

        let stored = self
            .feedback
            .append(FeedbackRecord::new(identity, text, sentiment))?;
        info!("Stored feedback ({})", sentiment.label());
        Ok(stored)
    }

    /// Classify and persist one suggestion
    pub fn submit_suggestion(
        &mut self,
        name: &str,
        category: &str,
        text: &str,
    ) -> Result<SuggestionRecord> {
        require_text(text, "suggestion")?;
        let sentiment = self.classifier.classify(text)?;

        let stored = self
            .suggestions
            .append(SuggestionRecord::new(name, category, text, sentiment))?;
        info!("Stored suggestion ({})", sentiment.label());
        Ok(stored)
    }

    pub fn feedback(&self) -> &FeedbackStore<FeedbackRecord> {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut FeedbackStore<FeedbackRecord> {
        &mut self.feedback
    }

    pub fn suggestions(&self) -> &FeedbackStore<SuggestionRecord> {
        &self.suggestions
    }

    pub fn suggestions_mut(&mut self) -> &mut FeedbackStore<SuggestionRecord> {
        &mut self.suggestions
    }

    pub fn feedback_summary(&self) -> SentimentSummary {
        summarize(&self.feedback)
    }

    pub fn suggestion_summary(&self) -> SentimentSummary {
        summarize(&self.suggestions)
    }
}

fn summarize<R>(store: &FeedbackStore<R>) -> SentimentSummary
where
    R: TabularRecord + HasSentiment,
{
    SentimentSummary::from_sentiments(
        store
            .collection()
            .iter()
            .map(|r| (r.sentiment_label(), r.sentiment_score())),
    )
}

/// Records that carry a derived sentiment
pub trait HasSentiment {
    fn sentiment_label(&self) -> SentimentLabel;
    fn sentiment_score(&self) -> f64;
}

impl HasSentiment for FeedbackRecord {
    fn sentiment_label(&self) -> SentimentLabel {
        self.sentiment().label()
    }

    fn sentiment_score(&self) -> f64 {
        self.sentiment().score()
    }
}

impl HasSentiment for SuggestionRecord {
    fn sentiment_label(&self) -> SentimentLabel {
        self.sentiment().label()
    }

    fn sentiment_score(&self) -> f64 {
        self.sentiment().score()
    }
}
