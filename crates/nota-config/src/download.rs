//! Download directory and archive detection settings.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_extract_dir() -> String {
    String::from("extraido")
}

fn default_archive_extension() -> String {
    String::from("zip")
}

fn default_partial_suffix() -> String {
    String::from("crdownload")
}

const fn default_min_archive_bytes() -> u64 {
    1024
}

const fn default_poll_interval_ms() -> u64 {
    1000
}

const fn default_timeout_secs() -> u64 {
    320
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadConfig {
    /// Directory the export archive is downloaded into.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Name of the extraction directory, created inside `dir`.
    #[serde(default = "default_extract_dir")]
    pub extract_dir: String,

    /// Extension of the archive produced by the export (without the dot).
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,

    /// Suffix the browser appends to a file while it is still downloading.
    #[serde(default = "default_partial_suffix")]
    pub partial_suffix: String,

    /// Archives at or below this size are treated as placeholders or error pages.
    #[serde(default = "default_min_archive_bytes")]
    pub min_archive_bytes: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long to wait for the archive before giving up.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            extract_dir: default_extract_dir(),
            archive_extension: default_archive_extension(),
            partial_suffix: default_partial_suffix(),
            min_archive_bytes: default_min_archive_bytes(),
            poll_interval_ms: default_poll_interval_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DownloadConfig {
    /// `<dir>/<extract_dir>`.
    #[must_use]
    pub fn extract_path(&self) -> PathBuf {
        self.dir.join(&self.extract_dir)
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
