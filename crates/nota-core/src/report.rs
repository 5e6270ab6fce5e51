//! Run summary returned by a delivery run.

use serde::{Deserialize, Serialize};

/// Counters for one detect → extract → filter → transfer run.
///
/// Computed once per run and handed to whatever reports the outcome; never
/// persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Document count announced by the collaborator that requested the export.
    pub expected: u64,
    /// Documents of the target type present after extraction.
    pub extracted: u64,
    /// Documents accepted by the classification filter.
    pub accepted: u64,
    /// Documents rejected by the classification filter.
    pub rejected: u64,
    /// Documents uploaded during this run.
    pub sent: u64,
    /// Accepted documents skipped because the ledger already records them.
    pub skipped: u64,
}

impl RunReport {
    /// Documents that were not delivered this run, whether filtered out or
    /// already delivered earlier.
    #[must_use]
    pub const fn ignored(&self) -> u64 {
        self.skipped + self.rejected
    }

    /// Whether fewer documents were extracted than the export announced.
    #[must_use]
    pub const fn is_short(&self) -> bool {
        self.extracted < self.expected
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn ignored_sums_skipped_and_rejected() {
        let report = RunReport {
            rejected: 2,
            skipped: 3,
            ..RunReport::default()
        };
        assert_eq!(report.ignored(), 5);
    }

    #[test]
    fn serializes_counters_and_flags_short_runs() {
        let report = RunReport {
            expected: 5,
            extracted: 5,
            accepted: 3,
            rejected: 2,
            sent: 3,
            skipped: 0,
        };
        assert_eq!(
            serde_json::to_value(report).unwrap(),
            serde_json::json!({
                "expected": 5,
                "extracted": 5,
                "accepted": 3,
                "rejected": 2,
                "sent": 3,
                "skipped": 0,
            })
        );
        assert!(!report.is_short());
        assert!(RunReport { expected: 6, ..report }.is_short());
    }
}
