//! Waiting for the export archive to finish downloading.
//!
//! Browsers write a download to `<name>.<partial_suffix>` alongside (or
//! instead of) the final file and remove that marker when the transfer ends.
//! A candidate archive qualifies only once no marker exists for it and it is
//! larger than the minimum size, which rules out the zero-byte placeholder
//! created before any data arrives.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use nota_core::{Backoff, Clock, PollError, has_extension, poll_until};

use crate::IngestError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorOptions {
    /// Archive extension, without the dot.
    pub archive_extension: String,
    /// Suffix of the in-progress marker, without the dot.
    pub partial_suffix: String,
    /// Candidates must be strictly larger than this.
    pub min_bytes: u64,
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            archive_extension: "zip".into(),
            partial_suffix: "crdownload".into(),
            min_bytes: 1024,
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(320),
        }
    }
}

pub struct Detector<C> {
    options: DetectorOptions,
    clock: C,
}

impl<C: Clock> Detector<C> {
    pub const fn new(options: DetectorOptions, clock: C) -> Self {
        Self { options, clock }
    }

    pub const fn options(&self) -> &DetectorOptions {
        &self.options
    }

    /// Poll `dir` at a fixed interval until a complete archive is present.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Timeout`] when nothing qualifies before the
    /// deadline, or [`IngestError::Io`] if the directory cannot be read.
    pub fn wait_for_archive(&self, dir: &Path) -> Result<PathBuf, IngestError> {
        tracing::info!(
            dir = %dir.display(),
            timeout_secs = self.options.timeout.as_secs(),
            "waiting for archive"
        );

        let result = poll_until(
            &self.clock,
            Backoff::fixed(self.options.interval),
            self.options.timeout,
            || self.find_complete(dir),
        );

        match result {
            Ok(path) => {
                tracing::info!(path = %path.display(), "archive download complete");
                Ok(path)
            }
            Err(PollError::Timeout { elapsed }) => Err(IngestError::Timeout {
                dir: dir.to_path_buf(),
                elapsed,
            }),
            Err(PollError::Probe(error)) => Err(IngestError::Io(error)),
        }
    }

    /// One scan of `dir`: the first qualifying archive in filename order.
    ///
    /// # Errors
    ///
    /// Propagates directory listing and metadata failures other than a
    /// listed file disappearing before it is inspected.
    pub fn find_complete(&self, dir: &Path) -> std::io::Result<Option<PathBuf>> {
        let mut names = BTreeSet::new();
        for entry in fs::read_dir(dir)? {
            names.insert(entry?.file_name().to_string_lossy().into_owned());
        }

        for name in &names {
            if !has_extension(name, &self.options.archive_extension) {
                continue;
            }
            let marker = format!("{name}.{}", self.options.partial_suffix);
            if names.contains(&marker) {
                tracing::debug!(%name, "download still in progress");
                continue;
            }

            let path = dir.join(name);
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(%name, "archive vanished before it could be inspected");
                    continue;
                }
                Err(error) => return Err(error),
            };
            if !metadata.is_file() {
                continue;
            }
            if metadata.len() > self.options.min_bytes {
                return Ok(Some(path));
            }
            tracing::debug!(%name, size = metadata.len(), "archive below minimum size");
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use nota_core::ManualClock;
    use pretty_assertions::assert_eq;

    use super::*;

    fn detector() -> Detector<ManualClock> {
        Detector::new(
            DetectorOptions {
                timeout: Duration::from_secs(5),
                ..DetectorOptions::default()
            },
            ManualClock::new(),
        )
    }

    #[test]
    fn ignores_archive_with_partial_marker() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("export.zip"), vec![0_u8; 4096]).unwrap();
        fs::write(dir.path().join("export.zip.crdownload"), b"").unwrap();

        assert_eq!(detector().find_complete(dir.path()).unwrap(), None);
    }

    #[test]
    fn ignores_archive_at_minimum_size() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("export.zip"), vec![0_u8; 1024]).unwrap();

        assert_eq!(detector().find_complete(dir.path()).unwrap(), None);
    }

    #[test]
    fn returns_first_qualifying_archive_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.zip"), vec![0_u8; 2048]).unwrap();
        fs::write(dir.path().join("a.zip"), vec![0_u8; 10]).unwrap();
        fs::write(dir.path().join("c.ZIP"), vec![0_u8; 2048]).unwrap();
        fs::write(dir.path().join("notes.txt"), vec![0_u8; 4096]).unwrap();

        assert_eq!(
            detector().find_complete(dir.path()).unwrap(),
            Some(dir.path().join("b.zip"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn vanished_candidate_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("a.zip")).unwrap();

        assert_eq!(detector().find_complete(dir.path()).unwrap(), None);

        fs::write(dir.path().join("b.zip"), vec![0_u8; 2048]).unwrap();
        assert_eq!(
            detector().find_complete(dir.path()).unwrap(),
            Some(dir.path().join("b.zip"))
        );
    }

    #[test]
    fn times_out_with_elapsed_time() {
        let dir = tempfile::tempdir().unwrap();
        let err = detector().wait_for_archive(dir.path()).unwrap_err();

        match err {
            IngestError::Timeout { elapsed, .. } => assert_eq!(elapsed, Duration::from_secs(6)),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = detector()
            .wait_for_archive(&dir.path().join("absent"))
            .unwrap_err();
        assert!(matches!(err, IngestError::Io(_)));
    }
}
