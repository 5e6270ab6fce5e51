//! # nota-ledger
//!
//! The set of filenames already delivered to the remote store, persisted
//! after every delivery so a crashed or repeated run never sends a document
//! twice.
//!
//! Entries are keyed by filename alone. A regenerated document that reuses a
//! delivered name is skipped.
//!
//! Storage sits behind [`LedgerStore`]: [`JsonFileStore`] in production,
//! [`MemoryStore`] in tests.

pub mod error;
pub mod json;
pub mod memory;
pub mod store;

pub use error::LedgerError;
pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use store::LedgerStore;

use std::collections::BTreeSet;

/// In-memory view of the delivered set, written through to its store.
#[derive(Debug)]
pub struct DeliveryLedger<S> {
    store: S,
    sent: BTreeSet<String>,
}

impl<S: LedgerStore> DeliveryLedger<S> {
    /// Load the delivered set from `store`.
    ///
    /// # Errors
    ///
    /// Propagates the store's load failure.
    pub fn open(store: S) -> Result<Self, LedgerError> {
        let sent = store.load()?;
        tracing::debug!(entries = sent.len(), "delivery ledger loaded");
        Ok(Self { store, sent })
    }

    #[must_use]
    pub fn was_delivered(&self, file: &str) -> bool {
        self.sent.contains(file)
    }

    /// Record `file` and persist the full set before returning.
    ///
    /// Returns `false` without touching the store when `file` is already
    /// recorded. If saving fails the entry is dropped again, so memory never
    /// runs ahead of what is on disk.
    ///
    /// # Errors
    ///
    /// Propagates the store's save failure.
    pub fn mark_delivered(&mut self, file: &str) -> Result<bool, LedgerError> {
        if !self.sent.insert(file.to_string()) {
            return Ok(false);
        }
        if let Err(error) = self.store.save(&self.sent) {
            self.sent.remove(file);
            return Err(error);
        }
        tracing::debug!(%file, "delivery recorded");
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }

    /// Delivered filenames in sorted order.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.sent.iter().map(String::as_str)
    }

    pub const fn store(&self) -> &S {
        &self.store
    }
}
