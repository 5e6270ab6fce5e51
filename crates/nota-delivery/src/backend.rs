//! Backend selected by configuration.

use std::path::{Path, PathBuf};

use nota_config::{RemoteBackend, RemoteConfig};

use crate::{
    ObjectSession, ObjectStoreRemote, RemotePath, RemoteSession, RemoteStore, SftpSession,
    SftpStore, TransferError,
};

#[derive(Debug, Clone)]
pub enum AnyRemote {
    Sftp(SftpStore),
    Object(ObjectStoreRemote),
}

impl AnyRemote {
    /// Build the backend named by `remote.backend`.
    ///
    /// # Errors
    ///
    /// [`TransferError::NotConfigured`] if the selected backend lacks its
    /// required settings.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, TransferError> {
        if !config.is_configured() {
            return Err(TransferError::NotConfigured(config.backend.as_str().into()));
        }
        match config.backend {
            RemoteBackend::Sftp => SftpStore::from_config(&config.sftp).map(Self::Sftp),
            RemoteBackend::S3 => ObjectStoreRemote::s3(&config.s3).map(Self::Object),
            RemoteBackend::Local => {
                let root = PathBuf::from(&config.local.root);
                ObjectStoreRemote::local(&root).map(Self::Object)
            }
        }
    }
}

#[derive(Debug)]
pub enum AnySession {
    Sftp(SftpSession),
    Object(ObjectSession),
}

impl RemoteStore for AnyRemote {
    type Session = AnySession;

    async fn connect(&self) -> Result<AnySession, TransferError> {
        match self {
            Self::Sftp(store) => store.connect().await.map(AnySession::Sftp),
            Self::Object(store) => store.connect().await.map(AnySession::Object),
        }
    }
}

impl RemoteSession for AnySession {
    async fn create_dir_all(&mut self, dir: &RemotePath) -> Result<(), TransferError> {
        match self {
            Self::Sftp(session) => session.create_dir_all(dir).await,
            Self::Object(session) => session.create_dir_all(dir).await,
        }
    }

    async fn put(&mut self, local: &Path, remote: &RemotePath) -> Result<(), TransferError> {
        match self {
            Self::Sftp(session) => session.put(local, remote).await,
            Self::Object(session) => session.put(local, remote).await,
        }
    }

    async fn close(self) -> Result<(), TransferError> {
        match self {
            Self::Sftp(session) => session.close().await,
            Self::Object(session) => session.close().await,
        }
    }
}
