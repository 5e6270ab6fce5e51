//! Delivery error types.

use std::path::PathBuf;

use nota_ledger::LedgerError;

/// Errors that abort delivery. Documents recorded before the failure stay
/// recorded.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The remote host could not be reached or the session could not start.
    #[error("Cannot connect to {target}: {message}")]
    Connect { target: String, message: String },

    #[error("Authentication failed for {user}: {message}")]
    Auth { user: String, message: String },

    /// Creating a remote directory failed.
    #[error("Cannot create remote directory {dir}: {message}")]
    Directory { dir: String, message: String },

    /// Uploading one document failed.
    #[error("Transfer of {file} failed: {message}")]
    Transfer { file: String, message: String },

    /// Reading a local document failed.
    #[error("Cannot read {path}: {source}")]
    Local {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The selected backend is missing required settings.
    #[error("Remote backend '{0}' is not configured")]
    NotConfigured(String),

    #[error("Object store error: {0}")]
    Store(#[from] object_store::Error),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// A blocking remote operation panicked or was cancelled.
    #[error("Remote worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
