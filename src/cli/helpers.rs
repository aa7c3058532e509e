//! Shared helper functions for CLI commands
//!
//! Configuration resolution, output formats and record rendering used
//! across several subcommands.

use clap::ValueEnum;
use feedback_core::{
    error::Result, FeedbackRecord, PortalConfig, SuggestionRecord, TabularRecord,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Which collection a command operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Collection {
    Feedback,
    Suggestions,
}

/// Global options shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub config_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

/// Load configuration, then apply the `--data-dir` override
pub fn load_config(opts: &GlobalOpts) -> Result<PortalConfig> {
    let mut config = PortalConfig::load(opts.config_path.as_deref())?;
    if let Some(dir) = &opts.data_dir {
        config.storage.data_dir = dir.clone();
    }
    debug!("Data directory: {}", config.storage.data_dir.display());
    Ok(config)
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn timestamp_label<R: TabularRecord>(record: &R) -> String {
    record
        .timestamp()
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One-line human summary of a feedback record
pub fn feedback_line(record: &FeedbackRecord) -> String {
    let name = if record.identity().is_anonymous() {
        "anonymous"
    } else {
        record.identity().name.as_str()
    };
    format!(
        "[{}] {:<8} {:+.4}  {}: {}",
        timestamp_label(record),
        record.sentiment().label(),
        record.sentiment().score(),
        name,
        record.text()
    )
}

/// One-line human summary of a suggestion record
pub fn suggestion_line(record: &SuggestionRecord) -> String {
    let category = if record.category().is_empty() {
        "general"
    } else {
        record.category()
    };
    format!(
        "[{}] {:<8} {:+.4}  ({}) {}",
        timestamp_label(record),
        record.sentiment().label(),
        record.sentiment().score(),
        category,
        record.text()
    )
}
