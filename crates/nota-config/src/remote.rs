//! Remote store configuration.
//!
//! Delivered documents land under `base_path` on one of three backends: an
//! SFTP server (the production transport), an S3-compatible bucket, or a
//! local directory.

use serde::{Deserialize, Serialize};

use crate::de::lenient_string;

fn default_base_path() -> String {
    String::from("/uploads")
}

const fn default_sftp_port() -> u16 {
    22
}

fn default_region() -> String {
    String::from("auto")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteBackend {
    #[default]
    Sftp,
    S3,
    Local,
}

impl RemoteBackend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sftp => "sftp",
            Self::S3 => "s3",
            Self::Local => "local",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SftpConfig {
    #[serde(default)]
    pub host: String,

    #[serde(default = "default_sftp_port")]
    pub port: u16,

    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub password: String,
}

impl Default for SftpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_sftp_port(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl SftpConfig {
    /// Check if the SFTP config has the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty() && !self.username.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct S3Config {
    #[serde(default)]
    pub bucket: String,

    /// Custom endpoint URL (R2, MinIO). Empty uses AWS.
    #[serde(default)]
    pub endpoint: String,

    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub access_key_id: String,

    #[serde(default)]
    pub secret_access_key: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            endpoint: String::new(),
            region: default_region(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
        }
    }
}

impl S3Config {
    pub fn is_configured(&self) -> bool {
        !self.bucket.is_empty()
            && !self.access_key_id.is_empty()
            && !self.secret_access_key.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LocalConfig {
    /// Directory standing in for the remote root.
    #[serde(default)]
    pub root: String,
}

impl LocalConfig {
    pub fn is_configured(&self) -> bool {
        !self.root.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub backend: RemoteBackend,

    /// Root under which `<client>/<platform>/<date>/` directories are created.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    #[serde(default)]
    pub sftp: SftpConfig,

    #[serde(default)]
    pub s3: S3Config,

    #[serde(default)]
    pub local: LocalConfig,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            backend: RemoteBackend::default(),
            base_path: default_base_path(),
            sftp: SftpConfig::default(),
            s3: S3Config::default(),
            local: LocalConfig::default(),
        }
    }
}

impl RemoteConfig {
    /// Whether the selected backend has its required fields.
    pub fn is_configured(&self) -> bool {
        match self.backend {
            RemoteBackend::Sftp => self.sftp.is_configured(),
            RemoteBackend::S3 => self.s3.is_configured(),
            RemoteBackend::Local => self.local.is_configured(),
        }
    }
}
