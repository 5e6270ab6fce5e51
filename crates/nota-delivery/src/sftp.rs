//! SFTP backend.
//!
//! `ssh2` is blocking, so every call runs on the blocking pool. The
//! connection moves into the worker for the duration of a call and is handed
//! back with the result.

use std::fs::File;
use std::io::{self, Write};
use std::net::TcpStream;
use std::path::Path;

use nota_config::SftpConfig;
use ssh2::{Session, Sftp};

use crate::{RemotePath, RemoteSession, RemoteStore, TransferError};

const DIR_MODE: i32 = 0o755;

/// Password-authenticated SFTP server.
#[derive(Clone)]
pub struct SftpStore {
    host: String,
    port: u16,
    username: String,
    password: String,
}

impl std::fmt::Debug for SftpStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpStore")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl SftpStore {
    /// # Errors
    ///
    /// Returns [`TransferError::NotConfigured`] without a host and username.
    pub fn from_config(config: &SftpConfig) -> Result<Self, TransferError> {
        if !config.is_configured() {
            return Err(TransferError::NotConfigured("sftp".into()));
        }
        Ok(Self {
            host: config.host.clone(),
            port: config.port,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl RemoteStore for SftpStore {
    type Session = SftpSession;

    async fn connect(&self) -> Result<SftpSession, TransferError> {
        let address = self.address();
        let username = self.username.clone();
        let password = self.password.clone();

        tracing::info!(%address, user = %username, "opening sftp session");
        let connection =
            tokio::task::spawn_blocking(move || Connection::open(&address, &username, &password))
                .await??;

        Ok(SftpSession {
            connection: Some(connection),
        })
    }
}

struct Connection {
    session: Session,
    sftp: Sftp,
}

impl Connection {
    fn open(address: &str, username: &str, password: &str) -> Result<Self, TransferError> {
        let connect_error = |message: String| TransferError::Connect {
            target: address.to_string(),
            message,
        };

        let tcp = TcpStream::connect(address).map_err(|e| connect_error(e.to_string()))?;
        let mut session = Session::new().map_err(|e| connect_error(e.to_string()))?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| connect_error(format!("SSH handshake failed: {e}")))?;

        session
            .userauth_password(username, password)
            .map_err(|e| TransferError::Auth {
                user: username.to_string(),
                message: e.to_string(),
            })?;
        if !session.authenticated() {
            return Err(TransferError::Auth {
                user: username.to_string(),
                message: "server rejected credentials".into(),
            });
        }

        let sftp = session
            .sftp()
            .map_err(|e| connect_error(format!("SFTP subsystem unavailable: {e}")))?;
        Ok(Self { session, sftp })
    }

    /// `mkdir -p`, one component at a time.
    fn create_dir_all(&self, dir: &RemotePath) -> Result<(), TransferError> {
        let mut current = if dir.is_absolute() {
            String::from("/")
        } else {
            String::new()
        };

        for segment in dir.segments() {
            if !current.is_empty() && !current.ends_with('/') {
                current.push('/');
            }
            current.push_str(segment);

            let path = Path::new(&current);
            if self.sftp.stat(path).is_ok() {
                continue;
            }
            if let Err(error) = self.sftp.mkdir(path, DIR_MODE) {
                // Another client may have created it in between.
                if self.sftp.stat(path).is_err() {
                    return Err(TransferError::Directory {
                        dir: current,
                        message: error.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn put(&self, local: &Path, remote: &RemotePath) -> Result<(), TransferError> {
        let transfer_error = |message: String| TransferError::Transfer {
            file: remote.to_string(),
            message,
        };

        let mut source = File::open(local).map_err(|source| TransferError::Local {
            path: local.to_path_buf(),
            source,
        })?;
        let mut target = self
            .sftp
            .create(Path::new(remote.as_str()))
            .map_err(|e| transfer_error(e.to_string()))?;

        io::copy(&mut source, &mut target).map_err(|e| transfer_error(e.to_string()))?;
        target.flush().map_err(|e| transfer_error(e.to_string()))?;
        Ok(())
    }

    fn close(self) -> Result<(), TransferError> {
        let Self { session, sftp } = self;
        drop(sftp);
        session
            .disconnect(None, "nota delivery complete", None)
            .map_err(|e| TransferError::Connect {
                target: "sftp".into(),
                message: format!("disconnect failed: {e}"),
            })
    }
}

/// Open SFTP session.
pub struct SftpSession {
    connection: Option<Connection>,
}

impl std::fmt::Debug for SftpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpSession")
            .field("open", &self.connection.is_some())
            .finish_non_exhaustive()
    }
}

impl SftpSession {
    async fn with_connection<T, F>(&mut self, op: F) -> Result<T, TransferError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, TransferError> + Send + 'static,
    {
        let connection = self.connection.take().ok_or_else(closed)?;
        let (connection, result) = tokio::task::spawn_blocking(move || {
            let result = op(&connection);
            (connection, result)
        })
        .await?;
        self.connection = Some(connection);
        result
    }
}

fn closed() -> TransferError {
    TransferError::Connect {
        target: "sftp".into(),
        message: "session is no longer open".into(),
    }
}

impl RemoteSession for SftpSession {
    async fn create_dir_all(&mut self, dir: &RemotePath) -> Result<(), TransferError> {
        let dir = dir.clone();
        self.with_connection(move |connection| connection.create_dir_all(&dir))
            .await
    }

    async fn put(&mut self, local: &Path, remote: &RemotePath) -> Result<(), TransferError> {
        let local = local.to_path_buf();
        let remote = remote.clone();
        self.with_connection(move |connection| connection.put(&local, &remote))
            .await
    }

    async fn close(mut self) -> Result<(), TransferError> {
        let connection = self.connection.take().ok_or_else(closed)?;
        tokio::task::spawn_blocking(move || connection.close()).await?
    }
}
