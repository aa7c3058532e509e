//! Storage layer for the feedback portal
//!
//! Collections are persisted as UTF-8 CSV with a fixed, versioned header.
//! A store owns one file; feedback and suggestions live in separate files
//! with distinct schemas, sharing the same engine through [`TabularRecord`].

pub mod csv_store;
pub mod lock;
pub mod schema;

pub use csv_store::FeedbackStore;
pub use lock::StoreLock;
pub use schema::{Schema, FEEDBACK_SCHEMA, SUGGESTION_SCHEMA};

use crate::error::{PortalError, Result};
use chrono::{DateTime, Utc};
use std::path::Path;

/// A record that can be persisted as one CSV row
pub trait TabularRecord: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// Schema shared by every row of this record type
    fn schema() -> &'static Schema;

    /// Body text; must be non-empty to be stored
    fn text(&self) -> &str;

    fn timestamp(&self) -> Option<DateTime<Utc>>;

    fn with_timestamp(self, timestamp: DateTime<Utc>) -> Self;

    /// Fields in schema column order
    fn to_row(&self) -> Vec<String>;

    /// Decode fields in schema column order
    fn from_row(row: &csv::StringRecord) -> std::result::Result<Self, String>;
}

/// Append-ordered sequence of records
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackCollection<R> {
    records: Vec<R>,
}

impl<R> Default for FeedbackCollection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: TabularRecord> FeedbackCollection<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// The `n` most recently appended records, oldest first
    pub fn latest(&self, n: usize) -> &[R] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.records.last().and_then(|r| r.timestamp())
    }

    pub fn into_vec(self) -> Vec<R> {
        self.records
    }

    pub(crate) fn from_records(records: Vec<R>) -> Self {
        Self { records }
    }

    pub(crate) fn push(&mut self, record: R) {
        self.records.push(record);
    }

    /// Canonical CSV bytes: header row then one row per record
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer.write_record(R::schema().columns)?;
        for record in &self.records {
            writer.write_record(record.to_row())?;
        }

        writer
            .into_inner()
            .map_err(|e| PortalError::Other(format!("Failed to finish CSV buffer: {}", e)))
    }

    /// Decode canonical CSV bytes, checking the header against the schema
    ///
    /// `origin` only labels errors.
    pub fn decode(bytes: &[u8], origin: &Path) -> Result<Self> {
        let schema = R::schema();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(bytes);

        let header = reader.headers().map_err(|e| PortalError::MalformedRow {
            path: origin.to_path_buf(),
            row: 0,
            reason: e.to_string(),
        })?;
        if !schema.matches(header) {
            return Err(PortalError::SchemaMismatch {
                path: origin.to_path_buf(),
                expected: schema.header_line(),
                found: header.iter().collect::<Vec<_>>().join(","),
            });
        }

        let mut records = Vec::new();
        for (idx, row) in reader.records().enumerate() {
            let row_number = idx + 1;
            let row = row.map_err(|e| PortalError::MalformedRow {
                path: origin.to_path_buf(),
                row: row_number,
                reason: e.to_string(),
            })?;
            let record = R::from_row(&row).map_err(|reason| PortalError::MalformedRow {
                path: origin.to_path_buf(),
                row: row_number,
                reason,
            })?;
            records.push(record);
        }

        Ok(Self { records })
    }
}

impl<'a, R> IntoIterator for &'a FeedbackCollection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
