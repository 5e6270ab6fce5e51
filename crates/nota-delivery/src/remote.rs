//! Remote store abstraction.

use std::fmt;
use std::path::Path;

use crate::TransferError;

/// Slash-separated remote location without empty or `.` segments. A leading
/// `/` is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePath(String);

impl RemotePath {
    /// Parse `raw`, dropping empty and `.` segments.
    pub fn new(raw: &str) -> Self {
        let absolute = raw.starts_with('/');
        let joined = raw
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect::<Vec<_>>()
            .join("/");
        if absolute {
            Self(format!("/{joined}"))
        } else {
            Self(joined)
        }
    }

    /// Append `segment`, treating any slashes in it as separators.
    #[must_use]
    pub fn join(&self, segment: &str) -> Self {
        if self.0.is_empty() {
            return Self::new(segment);
        }
        Self::new(&format!("{}/{segment}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }

    pub fn is_absolute(&self) -> bool {
        self.0.starts_with('/')
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A destination documents can be delivered to.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    type Session: RemoteSession;

    /// Open and authenticate a session.
    ///
    /// # Errors
    ///
    /// [`TransferError::Connect`] or [`TransferError::Auth`].
    async fn connect(&self) -> Result<Self::Session, TransferError>;
}

/// An open connection to a [`RemoteStore`].
#[allow(async_fn_in_trait)]
pub trait RemoteSession {
    /// Create `dir` and any missing parents. Existing directories are fine.
    ///
    /// # Errors
    ///
    /// [`TransferError::Directory`] when a component cannot be created.
    async fn create_dir_all(&mut self, dir: &RemotePath) -> Result<(), TransferError>;

    /// Upload `local` to `remote`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// [`TransferError::Local`] or [`TransferError::Transfer`].
    async fn put(&mut self, local: &Path, remote: &RemotePath) -> Result<(), TransferError>;

    /// End the session.
    ///
    /// # Errors
    ///
    /// Backend-specific disconnect failures.
    async fn close(self) -> Result<(), TransferError>;
}
