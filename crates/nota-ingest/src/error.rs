//! Ingest error types.

use std::path::PathBuf;
use std::time::Duration;

/// Failures that abort a run before anything is delivered.
///
/// Per-document classification problems are not errors; they surface as
/// [`crate::RejectionReason`]s.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// No complete archive appeared before the deadline.
    #[error("Timed out after {elapsed:?} waiting for a complete archive in {dir}")]
    Timeout { dir: PathBuf, elapsed: Duration },

    #[error("Archive not found: {0}")]
    ArchiveMissing(PathBuf),

    /// Placeholder or error page rather than a real payload.
    #[error("Archive too small: {path} is {size} bytes (minimum {min})")]
    ArchiveTooSmall { path: PathBuf, size: u64, min: u64 },

    /// Leading bytes are not a zip signature.
    #[error("Not a zip archive: {path} (starts with {preview:?})")]
    NotAnArchive { path: PathBuf, preview: String },

    /// The archive has a zip signature but could not be read.
    #[error("Corrupt archive {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// An entry name would resolve outside the output directory.
    #[error("Archive entry escapes the output directory: {0}")]
    UnsafeEntry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
