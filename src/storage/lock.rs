//! Cross-process write lock for a persisted collection
//!
//! An exclusive `flock` on a sidecar `<file>.lock` serialises the
//! reload-modify-replace cycle of every append. The lock lives on the
//! sidecar rather than the data file because the data file is replaced by
//! rename on every write.

use crate::error::{PortalError, Result};
use nix::fcntl::{Flock, FlockArg};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Held exclusive lock; released on drop
pub struct StoreLock {
    _flock: Flock<File>,
    path: PathBuf,
}

impl StoreLock {
    /// Sidecar lock path for a data file
    pub fn path_for(data_path: &Path) -> PathBuf {
        let mut name = data_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        data_path.with_file_name(name)
    }

    /// Block until the exclusive lock on `lock_path` is held
    pub fn acquire(lock_path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(lock_path)
            .map_err(|e| PortalError::persistence(lock_path, e))?;

        let flock = Flock::lock(file, FlockArg::LockExclusive)
            .map_err(|(_, errno)| PortalError::persistence(lock_path, errno.into()))?;

        debug!("Acquired store lock {}", lock_path.display());
        Ok(Self {
            _flock: flock,
            path: lock_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        debug!("Released store lock {}", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_lock_path_is_sidecar() {
        let path = StoreLock::path_for(Path::new("/data/feedback.csv"));
        assert_eq!(path, PathBuf::from("/data/feedback.csv.lock"));
    }

    #[test]
    fn test_lock_excludes_second_holder() {
        let temp_dir = TempDir::new().unwrap();
        let lock_path = temp_dir.path().join("feedback.csv.lock");

        let first = StoreLock::acquire(&lock_path).unwrap();
        let acquired = Arc::new(AtomicBool::new(false));

        let waiter = {
            let lock_path = lock_path.clone();
            let acquired = acquired.clone();
            std::thread::spawn(move || {
                let _second = StoreLock::acquire(&lock_path).unwrap();
                acquired.store(true, Ordering::SeqCst);
            })
        };

        std::thread::sleep(Duration::from_millis(100));
        assert!(!acquired.load(Ordering::SeqCst));

        drop(first);
        waiter.join().unwrap();
        assert!(acquired.load(Ordering::SeqCst));
    }
}
