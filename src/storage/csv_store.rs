//! Durable append-only CSV store
//!
//! Every append runs one locked cycle:
//! 1. take the exclusive sidecar lock
//! 2. reload the persisted collection (picks up other writers' rows)
//! 3. stamp and push the new record
//! 4. write the whole collection to a temp file in the same directory,
//!    fsync it, and rename it over the data file
//! 5. commit the new collection to memory
//!
//! A failure at any step leaves both the data file and the in-memory
//! collection as they were.

use super::schema::timestamp_round_trips;
use super::{FeedbackCollection, StoreLock, TabularRecord};
use crate::error::{PortalError, Result};
use chrono::{SubsecRound, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Store for one collection, backed by one CSV file
#[derive(Debug)]
pub struct FeedbackStore<R: TabularRecord> {
    path: PathBuf,
    lock_path: PathBuf,
    collection: FeedbackCollection<R>,
    #[cfg(test)]
    fail_next_commit: bool,
}

impl<R: TabularRecord> FeedbackStore<R> {
    /// Open a store and load whatever is persisted at `path`
    ///
    /// A missing file is an empty collection, not an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let lock_path = StoreLock::path_for(&path);
        let collection = read_persisted(&path)?;

        debug!(
            "Opened {} store at {} ({} records)",
            R::schema(),
            path.display(),
            collection.len()
        );

        Ok(Self {
            path,
            lock_path,
            collection,
            #[cfg(test)]
            fail_next_commit: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the persisted collection and refresh the in-memory copy
    pub fn load(&mut self) -> Result<FeedbackCollection<R>> {
        self.collection = read_persisted(&self.path)?;
        Ok(self.collection.clone())
    }

    /// Append one record and persist the full collection before returning
    ///
    /// Returns the record as stored, with its timestamp assigned.
    pub fn append(&mut self, record: R) -> Result<R> {
        if record.text().trim().is_empty() {
            return Err(PortalError::Validation(format!(
                "{} text must not be empty",
                R::schema().name
            )));
        }

        if let Some(pinned) = record.timestamp() {
            if !timestamp_round_trips(pinned) {
                return Err(PortalError::Validation(format!(
                    "timestamp {} cannot be stored as RFC 3339",
                    pinned
                )));
            }
        }

        ensure_parent_dir(&self.path)?;
        let _lock = StoreLock::acquire(&self.lock_path)?;

        let mut next = read_persisted::<R>(&self.path)?;

        let mut timestamp = record
            .timestamp()
            .unwrap_or_else(Utc::now)
            .trunc_subsecs(6);
        if let Some(last) = next.last_timestamp() {
            timestamp = timestamp.max(last);
        }
        let stamped = record.with_timestamp(timestamp);
        next.push(stamped.clone());

        let bytes = next.encode()?;
        let staged = stage(&self.path, &bytes)?;

        #[cfg(test)]
        {
            if std::mem::take(&mut self.fail_next_commit) {
                return Err(PortalError::persistence(
                    &self.path,
                    std::io::Error::new(std::io::ErrorKind::Other, "injected commit failure"),
                ));
            }
        }

        commit(staged, &self.path)?;
        self.collection = next;

        info!(
            "Appended {} record #{} to {}",
            R::schema().name,
            self.collection.len(),
            self.path.display()
        );
        Ok(stamped)
    }

    /// The `n` most recently appended records, in append order
    pub fn latest(&self, n: usize) -> Vec<R> {
        self.collection.latest(n).to_vec()
    }

    pub fn collection(&self) -> &FeedbackCollection<R> {
        &self.collection
    }

    /// Cached records as of the last load or append
    pub fn records(&self) -> &[R] {
        self.collection.records()
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Canonical CSV bytes for download, same schema as the persisted file
    pub fn export(&self) -> Result<Vec<u8>> {
        self.collection.encode()
    }

    /// Decode previously exported bytes
    pub fn decode(bytes: &[u8]) -> Result<FeedbackCollection<R>> {
        FeedbackCollection::decode(bytes, Path::new("<export>"))
    }
}

fn read_persisted<R: TabularRecord>(path: &Path) -> Result<FeedbackCollection<R>> {
    match std::fs::read(path) {
        Ok(bytes) => FeedbackCollection::decode(&bytes, path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No persisted collection at {}", path.display());
            Ok(FeedbackCollection::new())
        }
        Err(e) => Err(PortalError::Io(e)),
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| PortalError::persistence(parent, e)),
        _ => Ok(()),
    }
}

fn parent_or_cwd(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Write `bytes` fully to a synced temp file beside `path`
pub(crate) fn stage(path: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let mut staged = tempfile::Builder::new()
        .prefix(".portal-")
        .suffix(".tmp")
        .tempfile_in(parent_or_cwd(path))
        .map_err(|e| PortalError::persistence(path, e))?;

    let written = staged
        .write_all(bytes)
        .and_then(|_| staged.flush());
    written
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|e| PortalError::persistence(path, e))?;

    Ok(staged)
}

/// Atomically replace `path` with a staged file
pub(crate) fn commit(staged: NamedTempFile, path: &Path) -> Result<()> {
    staged
        .persist(path)
        .map_err(|e| PortalError::persistence(path, e.error))?;

    // Make the rename itself durable
    #[cfg(unix)]
    {
        let dir = parent_or_cwd(path);
        if let Err(e) = std::fs::File::open(dir).and_then(|d| d.sync_all()) {
            warn!("Failed to sync directory {}: {}", dir.display(), e);
        }
    }

    Ok(())
}

/// Stage and commit in one step
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;
    let staged = stage(path, bytes)?;
    commit(staged, path)
}
