use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::{LedgerError, LedgerStore};

/// Volatile store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sent: Mutex<BTreeSet<String>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sent: Mutex::new(entries.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Copy of the currently stored set.
    pub fn snapshot(&self) -> BTreeSet<String> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful saves so far.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make subsequent saves fail, simulating a full or read-only disk.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Result<BTreeSet<String>, LedgerError> {
        Ok(self.snapshot())
    }

    fn save(&self, sent: &BTreeSet<String>) -> Result<(), LedgerError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("memory store set to fail".into()));
        }
        *self.sent.lock().unwrap_or_else(PoisonError::into_inner) = sent.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
