//! Feedback Portal - citizen feedback ingestion with sentiment tagging
//!
//! Citizens submit free text; a lexicon classifier tags it positive,
//! negative or neutral with a score in [-1, 1]; the tagged record is
//! appended to a durable CSV collection that survives restarts.
//!
//! # Architecture
//!
//! - **Types**: submission and record types (`FeedbackRecord`, `SuggestionRecord`)
//! - **Sentiment**: `SentimentClassifier` over a pluggable `PolarityBackend`
//! - **Storage**: `FeedbackStore`, a locked append-only CSV collection
//! - **Portal**: the submit pipeline tying classifier and stores together
//! - **Services**: optional text generation for the assistant
//!
//! # Example
//!
//! ```no_run
//! use feedback_core::{FeedbackPortal, FeedbackStore, Identity, LexiconBackend, SentimentClassifier};
//! use std::sync::Arc;
//!
//! fn main() -> feedback_core::Result<()> {
//!     let classifier = SentimentClassifier::new(Arc::new(LexiconBackend::builtin()));
//!     let mut portal = FeedbackPortal::new(
//!         classifier,
//!         FeedbackStore::open("data/feedback.csv")?,
//!         FeedbackStore::open("data/suggestions.csv")?,
//!     );
//!
//!     let record = portal.submit_feedback(Identity::default(), "Roads need repair")?;
//!     println!("{} ({:.3})", record.sentiment().label(), record.sentiment().score());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod portal;
pub mod sentiment;
pub mod services;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use crate::config::PortalConfig;
pub use error::{PortalError, Result};
pub use portal::{FeedbackPortal, HasSentiment, SentimentSummary};
pub use sentiment::{
    label_for_score, Lexicon, LexiconBackend, PolarityBackend, SentimentClassifier,
    NEUTRAL_EPSILON,
};
pub use services::{LlmConfig, LlmService, TextGenerator};
pub use storage::{FeedbackCollection, FeedbackStore, TabularRecord};
pub use types::{FeedbackRecord, Identity, Sentiment, SentimentLabel, SuggestionRecord};

/// Build a portal from configuration
///
/// Opens (or lazily creates) both collections under the configured data
/// directory and loads the configured lexicon.
pub fn open_portal(config: &PortalConfig) -> Result<FeedbackPortal> {
    let backend = LexiconBackend::from_optional_path(config.sentiment.lexicon_path.as_deref())?;
    let classifier = SentimentClassifier::with_epsilon(
        std::sync::Arc::new(backend),
        config.sentiment.neutral_epsilon,
    )?;

    Ok(FeedbackPortal::new(
        classifier,
        FeedbackStore::open(config.feedback_path())?,
        FeedbackStore::open(config.suggestions_path())?,
    ))
}
