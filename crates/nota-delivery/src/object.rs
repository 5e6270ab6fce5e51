//! `object_store` backend: a local directory or an S3-compatible bucket.
//!
//! Object stores have no directories, so [`RemoteSession::create_dir_all`]
//! succeeds without doing anything and keys are the remote path's segments.

use std::path::Path;
use std::sync::Arc;

use nota_config::S3Config;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};

use crate::{RemotePath, RemoteSession, RemoteStore, TransferError};

#[derive(Debug, Clone)]
pub struct ObjectStoreRemote {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreRemote {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }

    /// Store rooted at `root`, created if absent.
    ///
    /// # Errors
    ///
    /// Fails if `root` cannot be created or resolved.
    pub fn local(root: &Path) -> Result<Self, TransferError> {
        std::fs::create_dir_all(root).map_err(|source| TransferError::Local {
            path: root.to_path_buf(),
            source,
        })?;
        Ok(Self::new(Arc::new(LocalFileSystem::new_with_prefix(root)?)))
    }

    /// S3 or S3-compatible (R2, `MinIO`) bucket.
    ///
    /// # Errors
    ///
    /// [`TransferError::NotConfigured`] without bucket and keys, or the
    /// builder's own validation error.
    pub fn s3(config: &S3Config) -> Result<Self, TransferError> {
        if !config.is_configured() {
            return Err(TransferError::NotConfigured("s3".into()));
        }

        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&config.bucket)
            .with_region(&config.region)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key);
        if !config.endpoint.is_empty() {
            builder = builder.with_endpoint(&config.endpoint);
        }
        Ok(Self::new(Arc::new(builder.build()?)))
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }
}

/// Object key for `remote`.
pub fn object_path(remote: &RemotePath) -> ObjectPath {
    ObjectPath::from_iter(remote.segments())
}

impl RemoteStore for ObjectStoreRemote {
    type Session = ObjectSession;

    async fn connect(&self) -> Result<ObjectSession, TransferError> {
        tracing::info!(store = %self.store, "using object store");
        Ok(ObjectSession {
            store: Arc::clone(&self.store),
        })
    }
}

#[derive(Debug)]
pub struct ObjectSession {
    store: Arc<dyn ObjectStore>,
}

impl RemoteSession for ObjectSession {
    async fn create_dir_all(&mut self, _dir: &RemotePath) -> Result<(), TransferError> {
        Ok(())
    }

    async fn put(&mut self, local: &Path, remote: &RemotePath) -> Result<(), TransferError> {
        let body = tokio::fs::read(local)
            .await
            .map_err(|source| TransferError::Local {
                path: local.to_path_buf(),
                source,
            })?;

        self.store
            .put(&object_path(remote), PutPayload::from(body))
            .await
            .map_err(|e| TransferError::Transfer {
                file: remote.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn close(self) -> Result<(), TransferError> {
        Ok(())
    }
}
