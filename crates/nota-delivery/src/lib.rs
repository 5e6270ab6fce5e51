//! # nota-delivery
//!
//! Moves accepted documents to the remote store at most once each.
//!
//! [`TransferCoordinator`] drives a [`RemoteStore`] session document by
//! document, consulting and updating a [`nota_ledger::DeliveryLedger`] so an
//! interrupted run resumes where it stopped.
//!
//! Backends:
//! - [`SftpStore`]: password-authenticated SFTP via `ssh2`
//! - [`ObjectStoreRemote`]: any `object_store` backend (local directory, S3/R2)

pub mod backend;
pub mod coordinator;
pub mod error;
pub mod object;
pub mod remote;
pub mod sftp;

pub use backend::{AnyRemote, AnySession};
pub use coordinator::{Candidates, Destination, TransferCoordinator, TransferSummary};
pub use error::TransferError;
pub use object::{ObjectSession, ObjectStoreRemote, object_path};
pub use remote::{RemotePath, RemoteSession, RemoteStore};
pub use sftp::{SftpSession, SftpStore};
