//! Exactly-once delivery of accepted documents.
//!
//! Documents go out one at a time. Each is recorded in the ledger right after
//! its upload succeeds, so after a crash the ledger lists exactly what reached
//! the remote store and the next run picks up the remainder.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use nota_core::has_extension;
use nota_ledger::{DeliveryLedger, LedgerStore};

use crate::{RemotePath, RemoteSession, RemoteStore, TransferError};

/// Remote directory layout: `<base>/<client_id>/<platform_id>/<YYYY-MM-DD>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub base: String,
    pub client_id: String,
    pub platform_id: String,
}

impl Destination {
    /// Directory for documents delivered on `date`.
    pub fn dir_for(&self, date: NaiveDate) -> RemotePath {
        RemotePath::new(&self.base)
            .join(&self.client_id)
            .join(&self.platform_id)
            .join(&date.format("%Y-%m-%d").to_string())
    }
}

/// Which files in the source directory to consider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidates {
    /// Every document in the directory, in filename order.
    All,
    /// These filenames, in the given order.
    Only(Vec<String>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferSummary {
    pub sent: u64,
    /// Already in the ledger; not uploaded.
    pub skipped: u64,
}

pub struct TransferCoordinator<R> {
    remote: R,
    destination: Destination,
    document_extension: String,
}

impl<R: RemoteStore> TransferCoordinator<R> {
    pub fn new(remote: R, destination: Destination, document_extension: impl Into<String>) -> Self {
        Self {
            remote,
            destination,
            document_extension: document_extension.into(),
        }
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    /// Deliver into today's (UTC) directory.
    ///
    /// # Errors
    ///
    /// See [`Self::deliver_on`].
    pub async fn deliver<S: LedgerStore>(
        &self,
        source_dir: &Path,
        candidates: Candidates,
        ledger: &mut DeliveryLedger<S>,
    ) -> Result<TransferSummary, TransferError> {
        self.deliver_on(Utc::now().date_naive(), source_dir, candidates, ledger)
            .await
    }

    /// Upload every candidate not yet in `ledger` into the directory for
    /// `date`, recording each one as soon as it lands.
    ///
    /// Candidates without the document extension are ignored. The session is
    /// closed whether or not delivery succeeds.
    ///
    /// # Errors
    ///
    /// Connection, authentication, directory, upload and ledger failures all
    /// abort the run. Documents recorded before the failure stay recorded.
    pub async fn deliver_on<S: LedgerStore>(
        &self,
        date: NaiveDate,
        source_dir: &Path,
        candidates: Candidates,
        ledger: &mut DeliveryLedger<S>,
    ) -> Result<TransferSummary, TransferError> {
        let files = self.resolve(source_dir, candidates)?;
        let remote_dir = self.destination.dir_for(date);

        let mut session = self.remote.connect().await?;
        let result = Self::transfer_all(&mut session, source_dir, &remote_dir, &files, ledger).await;

        match (result, session.close().await) {
            (Ok(summary), Ok(())) => {
                tracing::info!(
                    dir = %remote_dir,
                    sent = summary.sent,
                    skipped = summary.skipped,
                    "delivery complete"
                );
                Ok(summary)
            }
            (Ok(summary), Err(error)) => {
                tracing::warn!(%error, "remote session did not close cleanly");
                Ok(summary)
            }
            (Err(error), closed) => {
                if let Err(close_error) = closed {
                    tracing::warn!(error = %close_error, "remote session did not close cleanly");
                }
                Err(error)
            }
        }
    }

    async fn transfer_all<S: LedgerStore>(
        session: &mut R::Session,
        source_dir: &Path,
        remote_dir: &RemotePath,
        files: &[String],
        ledger: &mut DeliveryLedger<S>,
    ) -> Result<TransferSummary, TransferError> {
        session.create_dir_all(remote_dir).await?;

        let mut summary = TransferSummary::default();
        for file in files {
            if ledger.was_delivered(file) {
                tracing::debug!(%file, "already delivered, skipping");
                summary.skipped += 1;
                continue;
            }

            session
                .put(&source_dir.join(file), &remote_dir.join(file))
                .await?;
            ledger.mark_delivered(file)?;
            summary.sent += 1;
            tracing::info!(%file, "delivered");
        }
        Ok(summary)
    }

    fn resolve(&self, source_dir: &Path, candidates: Candidates) -> Result<Vec<String>, TransferError> {
        let names = match candidates {
            Candidates::Only(names) => names,
            Candidates::All => {
                let read_error = |source| TransferError::Local {
                    path: source_dir.to_path_buf(),
                    source,
                };
                let mut names = Vec::new();
                for entry in fs::read_dir(source_dir).map_err(read_error)? {
                    let entry = entry.map_err(read_error)?;
                    if entry.file_type().map_err(read_error)?.is_file() {
                        names.push(entry.file_name().to_string_lossy().into_owned());
                    }
                }
                names.sort();
                names
            }
        };

        Ok(names
            .into_iter()
            .filter(|name| has_extension(name, &self.document_extension))
            .collect())
    }
}
