//! Process-wide locks guarding the validation engine and report files

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

use super::error::Error;

// The embedded engine is single-instance per process, so every orchestrator
// shares one engine lock. Report locks are process-wide for the same reason:
// two orchestrators must not rewrite one report file at the same time.
lazy_static::lazy_static! {
    static ref ENGINE_LOCK: EngineLock = EngineLock::new();
    static ref REPORT_LOCKS: ReportLocks = ReportLocks::new();
}

/// Mutual exclusion over the non-reentrant validation engine
pub struct EngineLock {
    busy: Mutex<bool>,
    released: Condvar,
}

/// Held while a validation run owns the engine; releases on drop
#[must_use = "the engine is released as soon as the lease is dropped"]
pub struct EngineLease<'a> {
    lock: &'a EngineLock,
}

impl EngineLock {
    pub fn new() -> Self {
        Self {
            busy: Mutex::new(false),
            released: Condvar::new(),
        }
    }

    /// The lock shared by every orchestrator in this process
    pub fn global() -> &'static EngineLock {
        &ENGINE_LOCK
    }

    /// Block until the engine is free.
    ///
    /// With `timeout` set, gives up after that long with [`Error::LockTimeout`].
    pub fn acquire(&self, timeout: Option<Duration>) -> Result<EngineLease<'_>, Error> {
        let busy = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
        let mut busy = match timeout {
            None => self
                .released
                .wait_while(busy, |busy| *busy)
                .unwrap_or_else(PoisonError::into_inner),
            Some(limit) => {
                let (busy, wait) = self
                    .released
                    .wait_timeout_while(busy, limit, |busy| *busy)
                    .unwrap_or_else(PoisonError::into_inner);
                if wait.timed_out() {
                    return Err(Error::LockTimeout(limit));
                }
                busy
            }
        };
        *busy = true;
        Ok(EngineLease { lock: self })
    }

    #[cfg(test)]
    pub fn is_held(&self) -> bool {
        *self.busy.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EngineLock {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EngineLease<'_> {
    fn drop(&mut self) {
        let mut busy = self.lock.busy.lock().unwrap_or_else(PoisonError::into_inner);
        *busy = false;
        self.lock.released.notify_one();
    }
}

/// Per-path exclusion for policy passes rewriting a report in place
pub struct ReportLocks {
    held: Mutex<HashSet<PathBuf>>,
    released: Condvar,
}

/// Held while a policy pass owns one report path; releases on drop
#[must_use = "the report is released as soon as the lease is dropped"]
pub struct ReportLease<'a> {
    locks: &'a ReportLocks,
    path: PathBuf,
}

impl ReportLocks {
    pub fn new() -> Self {
        Self {
            held: Mutex::new(HashSet::new()),
            released: Condvar::new(),
        }
    }

    pub fn global() -> &'static ReportLocks {
        &REPORT_LOCKS
    }

    /// Block until no other pass holds `path`. Other paths are not affected.
    pub fn acquire(&self, path: &Path) -> ReportLease<'_> {
        let held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        let mut held = self
            .released
            .wait_while(held, |held| held.contains(path))
            .unwrap_or_else(PoisonError::into_inner);
        held.insert(path.to_path_buf());
        ReportLease {
            locks: self,
            path: path.to_path_buf(),
        }
    }

    #[cfg(test)]
    pub fn is_held(&self, path: &Path) -> bool {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(path)
    }
}

impl Default for ReportLocks {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ReportLease<'_> {
    fn drop(&mut self) {
        let mut held = self.locks.held.lock().unwrap_or_else(PoisonError::into_inner);
        held.remove(&self.path);
        // Waiters may be parked on different paths
        self.locks.released.notify_all();
    }
}
