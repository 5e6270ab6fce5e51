//! # nota-ingest
//!
//! Local half of a nota run: wait for the export archive to finish
//! downloading, unpack it into a clean directory, and partition the extracted
//! documents against the classification allow-list.
//!
//! Everything here is blocking filesystem work. Async callers run it on
//! `tokio::task::spawn_blocking`.

pub mod classify;
pub mod detect;
pub mod error;
pub mod extract;
pub mod filter;
pub mod normalize;

pub use classify::{ClassificationError, classification_of, read_classification};
pub use detect::{Detector, DetectorOptions};
pub use error::IngestError;
pub use extract::{ExtractOptions, Extractor, prepare_output_dir};
pub use filter::{AllowList, DocumentFilter, FilterOutcome, FilterPolicy, Rejection, RejectionReason};
pub use normalize::normalize;
