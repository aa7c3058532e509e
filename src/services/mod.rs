//! Services layer for the feedback portal
//!
//! Wraps the upstream text-generation backend used to answer free-text
//! citizen questions.

pub mod llm;

pub use llm::{LlmConfig, LlmService, TextGenerator};
