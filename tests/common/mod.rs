//! Common test utilities and helpers

#![allow(dead_code)]

use feedback_core::{
    FeedbackPortal, FeedbackRecord, FeedbackStore, Identity, LexiconBackend, SentimentClassifier,
    SuggestionRecord,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Classifier over the built-in lexicon
pub fn builtin_classifier() -> SentimentClassifier {
    SentimentClassifier::new(Arc::new(LexiconBackend::builtin()))
}

pub fn feedback_path(dir: &TempDir) -> PathBuf {
    dir.path().join("feedback.csv")
}

pub fn suggestions_path(dir: &TempDir) -> PathBuf {
    dir.path().join("suggestions.csv")
}

/// Portal writing into a scratch directory
pub fn create_test_portal(dir: &TempDir) -> FeedbackPortal {
    FeedbackPortal::new(
        builtin_classifier(),
        FeedbackStore::open(feedback_path(dir)).expect("Failed to open feedback store"),
        FeedbackStore::open(suggestions_path(dir)).expect("Failed to open suggestions store"),
    )
}

pub fn open_feedback(path: &Path) -> FeedbackStore<FeedbackRecord> {
    FeedbackStore::open(path).expect("Failed to open feedback store")
}

pub fn open_suggestions(path: &Path) -> FeedbackStore<SuggestionRecord> {
    FeedbackStore::open(path).expect("Failed to open suggestions store")
}

/// A classified but unsaved feedback record
pub fn classified_feedback(name: &str, text: &str) -> FeedbackRecord {
    let sentiment = builtin_classifier()
        .classify(text)
        .expect("Failed to classify test text");
    FeedbackRecord::new(Identity::named(name), text, sentiment)
}

/// Names of `.tmp` files left in a directory
pub fn temp_leftovers(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".tmp"))
        .collect()
}
