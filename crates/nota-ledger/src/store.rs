use std::collections::BTreeSet;

use crate::LedgerError;

/// Whole-set persistence for delivered filenames.
///
/// `save` replaces everything previously stored.
pub trait LedgerStore {
    /// Read the delivered set, initializing empty storage on first use.
    ///
    /// # Errors
    ///
    /// Storage-specific read or decode failures.
    fn load(&self) -> Result<BTreeSet<String>, LedgerError>;

    /// Durably replace the stored set with `sent`.
    ///
    /// # Errors
    ///
    /// Storage-specific write failures.
    fn save(&self, sent: &BTreeSet<String>) -> Result<(), LedgerError>;
}

impl<T: LedgerStore + ?Sized> LedgerStore for &T {
    fn load(&self) -> Result<BTreeSet<String>, LedgerError> {
        (**self).load()
    }

    fn save(&self, sent: &BTreeSet<String>) -> Result<(), LedgerError> {
        (**self).save(sent)
    }
}
