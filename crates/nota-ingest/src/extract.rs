//! Validating and unpacking the downloaded archive.
//!
//! Extraction either completes (entries written, archive deleted) or fails
//! with the archive left in place for inspection.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use nota_core::has_extension;

use crate::IngestError;

/// Local file header signature prefix shared by every zip variant.
const ZIP_SIGNATURE: &[u8; 2] = b"PK";

/// Bytes of a rejected file shown in [`IngestError::NotAnArchive`].
const PREVIEW_BYTES: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Archives smaller than this are rejected.
    pub min_archive_bytes: u64,
    /// Extension of the documents counted after extraction, without the dot.
    pub document_extension: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_archive_bytes: 1024,
            document_extension: "xml".into(),
        }
    }
}

/// Remove `dir` and everything under it, then recreate it empty.
///
/// # Errors
///
/// Propagates filesystem failures other than `dir` not existing.
pub fn prepare_output_dir(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => return Err(error),
    }
    fs::create_dir_all(dir)?;
    tracing::debug!(dir = %dir.display(), "output directory cleaned");
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub const fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Validate `archive`, unpack it into `output`, delete it, and count the
    /// documents now in `output`.
    ///
    /// Existing files in `output` with the same names are overwritten.
    ///
    /// # Errors
    ///
    /// [`IngestError::ArchiveMissing`], [`IngestError::ArchiveTooSmall`] and
    /// [`IngestError::NotAnArchive`] are raised before anything is written.
    /// [`IngestError::Corrupt`], [`IngestError::UnsafeEntry`] and
    /// [`IngestError::Io`] may follow a partial unpack; the archive is kept
    /// in every error case.
    pub fn extract(&self, archive: &Path, output: &Path) -> Result<u64, IngestError> {
        self.validate(archive)?;

        let file = File::open(archive)?;
        let mut zip = zip::ZipArchive::new(file).map_err(|source| IngestError::Corrupt {
            path: archive.to_path_buf(),
            source,
        })?;

        fs::create_dir_all(output)?;
        for index in 0..zip.len() {
            let mut entry = zip.by_index(index).map_err(|source| IngestError::Corrupt {
                path: archive.to_path_buf(),
                source,
            })?;
            let Some(relative) = entry.enclosed_name() else {
                return Err(IngestError::UnsafeEntry(entry.name().to_string()));
            };
            let target = output.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&target)?;
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)?;
            io::copy(&mut entry, &mut out)?;
        }
        let entries = zip.len();
        drop(zip);

        fs::remove_file(archive)?;

        let documents = count_documents(output, &self.options.document_extension)?;
        tracing::info!(
            archive = %archive.display(),
            entries,
            documents,
            "archive extracted"
        );
        Ok(documents)
    }

    fn validate(&self, archive: &Path) -> Result<(), IngestError> {
        let metadata = match fs::metadata(archive) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Err(IngestError::ArchiveMissing(archive.to_path_buf())),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(IngestError::ArchiveMissing(archive.to_path_buf()));
            }
            Err(error) => return Err(error.into()),
        };

        let size = metadata.len();
        if size < self.options.min_archive_bytes {
            return Err(IngestError::ArchiveTooSmall {
                path: archive.to_path_buf(),
                size,
                min: self.options.min_archive_bytes,
            });
        }

        let mut head = Vec::with_capacity(4);
        File::open(archive)?.take(4).read_to_end(&mut head)?;
        if !head.starts_with(ZIP_SIGNATURE) {
            let mut preview = Vec::new();
            File::open(archive)?
                .take(PREVIEW_BYTES)
                .read_to_end(&mut preview)?;
            return Err(IngestError::NotAnArchive {
                path: archive.to_path_buf(),
                preview: String::from_utf8_lossy(&preview).into_owned(),
            });
        }
        Ok(())
    }
}

/// Files directly inside `dir` whose extension matches, case-insensitively.
fn count_documents(dir: &Path, extension: &str) -> io::Result<u64> {
    let mut count = 0_u64;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() && has_extension(entry.file_name(), extension) {
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_output_dir_empties_existing_directory() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("extraido");
        fs::create_dir_all(out.join("nested")).unwrap();
        fs::write(out.join("stale.xml"), b"<old/>").unwrap();

        prepare_output_dir(&out).unwrap();

        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn prepare_output_dir_creates_missing_directory() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("a").join("b");
        prepare_output_dir(&out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn counts_only_matching_files_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.xml"), b"").unwrap();
        fs::write(dir.path().join("b.XML"), b"").unwrap();
        fs::write(dir.path().join("c.pdf"), b"").unwrap();
        fs::create_dir(dir.path().join("d.xml")).unwrap();

        assert_eq!(count_documents(dir.path(), "xml").unwrap(), 2);
    }
}
