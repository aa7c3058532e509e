//! Sentiment classification
//!
//! [`SentimentClassifier`] turns free text into a three-way [`SentimentLabel`]
//! plus the polarity score it was derived from. The polarity itself comes
//! from an injected [`PolarityBackend`]; the default is the rule-based
//! [`LexiconBackend`].
//!
//! Label rule, with `ε = NEUTRAL_EPSILON`:
//! - `score > ε`  → Positive
//! - `score < -ε` → Negative
//! - otherwise    → Neutral

pub mod lexicon;

pub use lexicon::{Lexicon, LexiconBackend};

use crate::error::{PortalError, Result};
use crate::types::{Sentiment, SentimentLabel};
use std::sync::Arc;
use tracing::debug;

/// Half-width of the neutral band around zero
pub const NEUTRAL_EPSILON: f64 = 0.05;

/// Source of continuous polarity scores
///
/// Implementations return a value in [-1.0, 1.0] or
/// [`PortalError::BackendUnavailable`] when they cannot score at all.
pub trait PolarityBackend: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Polarity of non-empty text
    fn polarity(&self, text: &str) -> Result<f64>;
}

/// Map a polarity score to a label using the neutral band `epsilon`
pub fn label_for_score(score: f64, epsilon: f64) -> SentimentLabel {
    if score > epsilon {
        SentimentLabel::Positive
    } else if score < -epsilon {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Classifier over an explicitly injected backend
#[derive(Clone)]
pub struct SentimentClassifier {
    backend: Arc<dyn PolarityBackend>,
    epsilon: f64,
}

impl SentimentClassifier {
    /// Create a classifier with the default neutral band
    pub fn new(backend: Arc<dyn PolarityBackend>) -> Self {
        Self {
            backend,
            epsilon: NEUTRAL_EPSILON,
        }
    }

    /// Create a classifier with a custom neutral band in `[0, 1)`
    pub fn with_epsilon(backend: Arc<dyn PolarityBackend>, epsilon: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&epsilon) {
            return Err(PortalError::Validation(format!(
                "neutral epsilon must be in [0, 1), got {}",
                epsilon
            )));
        }
        Ok(Self { backend, epsilon })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Classify text into a label and score
    ///
    /// Empty or whitespace-only text is a validation error, not Neutral.
    pub fn classify(&self, text: &str) -> Result<Sentiment> {
        if text.trim().is_empty() {
            return Err(PortalError::Validation(
                "cannot classify empty text".to_string(),
            ));
        }

        let raw = self.backend.polarity(text)?;
        if !raw.is_finite() {
            return Err(PortalError::BackendUnavailable(format!(
                "{} returned a non-finite polarity",
                self.backend.name()
            )));
        }

        let score = raw.clamp(-1.0, 1.0);
        let label = label_for_score(score, self.epsilon);
        debug!(
            "Classified {} chars via {}: {} ({:.4})",
            text.len(),
            self.backend.name(),
            label,
            score
        );

        Ok(Sentiment::new(label, score))
    }
}

impl std::fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentClassifier")
            .field("backend", &self.backend.name())
            .field("epsilon", &self.epsilon)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct FixedBackend(f64);

    impl PolarityBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        fn polarity(&self, _text: &str) -> Result<f64> {
            Ok(self.0)
        }
    }

    struct OfflineBackend;

    impl PolarityBackend for OfflineBackend {
        fn name(&self) -> &str {
            "offline"
        }

        fn polarity(&self, _text: &str) -> Result<f64> {
            Err(PortalError::BackendUnavailable("model not loaded".to_string()))
        }
    }

    fn lexicon_classifier() -> SentimentClassifier {
        SentimentClassifier::new(Arc::new(LexiconBackend::builtin()))
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(label_for_score(0.05, NEUTRAL_EPSILON), SentimentLabel::Neutral);
        assert_eq!(label_for_score(-0.05, NEUTRAL_EPSILON), SentimentLabel::Neutral);
        assert_eq!(label_for_score(0.0501, NEUTRAL_EPSILON), SentimentLabel::Positive);
        assert_eq!(label_for_score(-0.0501, NEUTRAL_EPSILON), SentimentLabel::Negative);
        assert_eq!(label_for_score(0.0, 0.0), SentimentLabel::Neutral);
        assert_eq!(label_for_score(0.0001, 0.0), SentimentLabel::Positive);
    }

    #[test]
    fn test_empty_text_is_validation_error() {
        let classifier = lexicon_classifier();
        assert!(classifier.classify("").unwrap_err().is_validation());
        assert!(classifier.classify("   ").unwrap_err().is_validation());
        assert!(classifier.classify("\n\t").unwrap_err().is_validation());
    }

    #[test]
    fn test_backend_unavailable_is_not_neutral() {
        let classifier = SentimentClassifier::new(Arc::new(OfflineBackend));
        let err = classifier.classify("The clinic is great").unwrap_err();
        assert!(matches!(err, PortalError::BackendUnavailable(_)));
    }

    #[test]
    fn test_non_finite_polarity_rejected() {
        let classifier = SentimentClassifier::new(Arc::new(FixedBackend(f64::NAN)));
        let err = classifier.classify("anything").unwrap_err();
        assert!(matches!(err, PortalError::BackendUnavailable(_)));
    }

    #[test]
    fn test_out_of_range_backend_is_clamped() {
        let classifier = SentimentClassifier::new(Arc::new(FixedBackend(3.5)));
        let sentiment = classifier.classify("anything").unwrap();
        assert_eq!(sentiment.score(), 1.0);
        assert_eq!(sentiment.label(), SentimentLabel::Positive);
    }

    #[test]
    fn test_custom_epsilon() {
        let classifier =
            SentimentClassifier::with_epsilon(Arc::new(FixedBackend(0.03)), 0.0).unwrap();
        assert_eq!(
            classifier.classify("x").unwrap().label(),
            SentimentLabel::Positive
        );

        assert!(SentimentClassifier::with_epsilon(Arc::new(FixedBackend(0.0)), 1.0).is_err());
        assert!(SentimentClassifier::with_epsilon(Arc::new(FixedBackend(0.0)), -0.1).is_err());
    }

    #[test]
    fn test_road_repair_is_negative() {
        let sentiment = lexicon_classifier().classify("Roads need repair").unwrap();
        assert_eq!(sentiment.label(), SentimentLabel::Negative);
        assert!(sentiment.score() < -NEUTRAL_EPSILON);
    }

    #[test]
    fn test_deterministic() {
        let classifier = lexicon_classifier();
        let a = classifier.classify("The new clinic is great, thank you!").unwrap();
        let b = classifier.classify("The new clinic is great, thank you!").unwrap();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_score_bounded_and_label_consistent(text in "\\PC{1,200}") {
            prop_assume!(!text.trim().is_empty());
            let sentiment = lexicon_classifier().classify(&text).unwrap();
            prop_assert!((-1.0..=1.0).contains(&sentiment.score()));
            prop_assert_eq!(
                sentiment.label(),
                label_for_score(sentiment.score(), NEUTRAL_EPSILON)
            );
        }

        #[test]
        fn prop_lexicon_words_bounded(words in proptest::collection::vec(
            prop::sample::select(vec![
                "great", "terrible", "not", "very", "but", "GOOD", "bad", "!!!",
                "roads", "thank", "never", "corrupt", "extremely", "helpful",
            ]),
            1..40,
        )) {
            let text = words.join(" ");
            let sentiment = lexicon_classifier().classify(&text).unwrap();
            prop_assert!(sentiment.score().is_finite());
            prop_assert!((-1.0..=1.0).contains(&sentiment.score()));
        }
    }
}
