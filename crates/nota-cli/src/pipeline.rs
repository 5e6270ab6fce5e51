//! Delivery run: detect → extract → filter → transfer.
//!
//! 1. Wait for a complete archive in the download directory
//! 2. Empty `<download>/<extract_dir>` and unpack the archive into it (the
//!    archive is deleted on success)
//! 3. Partition extracted documents by classification
//! 4. Deliver accepted documents not yet in the ledger
//!
//! Filesystem stages run on the blocking pool; stages never overlap.

use std::path::PathBuf;

use chrono::NaiveDate;
use nota_config::NotaConfig;
use nota_core::{RunReport, SystemClock};
use nota_delivery::{Candidates, Destination, RemoteStore, TransferCoordinator, TransferError};
use nota_ingest::{
    Detector, DetectorOptions, DocumentFilter, ExtractOptions, Extractor, FilterPolicy,
    IngestError, Rejection, prepare_output_dir,
};
use nota_ledger::{DeliveryLedger, LedgerError, LedgerStore};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("Cannot create download directory {path}: {source}")]
    DownloadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pipeline worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Result of a completed run.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: RunReport,
    pub rejections: Vec<Rejection>,
    /// Archive that was consumed (already deleted).
    pub archive: PathBuf,
}

pub struct RunPipeline<R, S> {
    config: NotaConfig,
    remote: R,
    ledger_store: S,
    date: Option<NaiveDate>,
}

impl<R: RemoteStore, S: LedgerStore> RunPipeline<R, S> {
    pub fn new(config: NotaConfig, remote: R, ledger_store: S) -> Self {
        Self {
            config,
            remote,
            ledger_store,
            date: None,
        }
    }

    /// Deliver into the directory for `date` instead of today (UTC).
    #[cfg_attr(not(test), allow(dead_code))]
    #[must_use]
    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Run every stage once. `expected` is copied into the report.
    ///
    /// # Errors
    ///
    /// Any stage failure aborts the run. Per-document classification failures
    /// are rejections, not errors.
    pub async fn run(self, expected: u64) -> Result<RunOutcome, PipelineError> {
        let download = &self.config.download;
        let document_extension = self.config.filter.document_extension.clone();

        tokio::fs::create_dir_all(&download.dir)
            .await
            .map_err(|source| PipelineError::DownloadDir {
                path: download.dir.clone(),
                source,
            })?;

        // Step 1: Detect
        let detector_options = DetectorOptions {
            archive_extension: download.archive_extension.clone(),
            partial_suffix: download.partial_suffix.clone(),
            min_bytes: download.min_archive_bytes,
            interval: download.poll_interval(),
            timeout: download.timeout(),
        };
        let download_dir = download.dir.clone();
        let archive = tokio::task::spawn_blocking(move || {
            Detector::new(detector_options, SystemClock::new()).wait_for_archive(&download_dir)
        })
        .await??;

        // Step 2: Extract
        let output_dir = download.extract_path();
        let extractor = Extractor::new(ExtractOptions {
            min_archive_bytes: download.min_archive_bytes,
            document_extension: document_extension.clone(),
        });
        let extracted = {
            let archive = archive.clone();
            let output_dir = output_dir.clone();
            tokio::task::spawn_blocking(move || -> Result<u64, IngestError> {
                prepare_output_dir(&output_dir)?;
                extractor.extract(&archive, &output_dir)
            })
            .await??
        };

        // Step 3: Filter
        let policy = FilterPolicy::from_values(self.config.filter.allowed_values());
        let accept_all = policy.is_accept_all();
        let filter = DocumentFilter::new(policy, document_extension.clone());
        let outcome = {
            let output_dir = output_dir.clone();
            tokio::task::spawn_blocking(move || filter.partition(&output_dir)).await??
        };

        // Step 4: Transfer
        let mut ledger = DeliveryLedger::open(self.ledger_store)?;
        let destination = Destination {
            base: self.config.remote.base_path.clone(),
            client_id: self.config.delivery.client_id.clone(),
            platform_id: self.config.delivery.platform_id.clone(),
        };
        let coordinator = TransferCoordinator::new(self.remote, destination, document_extension);
        let candidates = if accept_all {
            Candidates::All
        } else {
            Candidates::Only(outcome.accepted.clone())
        };
        let summary = match self.date {
            Some(date) => {
                coordinator
                    .deliver_on(date, &output_dir, candidates, &mut ledger)
                    .await?
            }
            None => coordinator.deliver(&output_dir, candidates, &mut ledger).await?,
        };

        let report = RunReport {
            expected,
            extracted,
            accepted: count(outcome.accepted.len()),
            rejected: count(outcome.rejected.len()),
            sent: summary.sent,
            skipped: summary.skipped,
        };
        if report.is_short() {
            tracing::warn!(
                expected = report.expected,
                extracted = report.extracted,
                "archive holds fewer documents than the export announced"
            );
        }
        tracing::info!(
            sent = report.sent,
            ignored = report.ignored(),
            "run complete"
        );

        Ok(RunOutcome {
            report,
            rejections: outcome.rejected,
            archive,
        })
    }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}
