//! `{"sent": [...]}` file store.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{LedgerError, LedgerStore};

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    sent: Vec<String>,
}

/// Ledger persisted as a JSON file, rewritten whole on every save.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the ledger, so a crash mid-write leaves the previous version intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> Result<BTreeSet<String>, LedgerError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "creating empty delivery ledger");
                let empty = BTreeSet::new();
                self.save(&empty)?;
                return Ok(empty);
            }
            Err(error) => return Err(self.io_error(error)),
        };

        let file: LedgerFile =
            serde_json::from_str(&raw).map_err(|source| LedgerError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        Ok(file.sent.into_iter().collect())
    }

    fn save(&self, sent: &BTreeSet<String>) -> Result<(), LedgerError> {
        let parent = self.parent_dir();
        fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;

        let file = LedgerFile {
            sent: sent.iter().cloned().collect(),
        };
        let body = serde_json::to_vec_pretty(&file).map_err(|source| LedgerError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| self.io_error(e))?;
        tmp.write_all(&body).map_err(|e| self.io_error(e))?;
        tmp.write_all(b"\n").map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn first_load_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("sent-files.json");
        let store = JsonFileStore::new(&path);

        assert!(store.load().unwrap().is_empty());

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!({ "sent": [] }));
    }

    #[test]
    fn reads_existing_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sent-files.json");
        fs::write(&path, r#"{ "sent": ["b.xml", "a.xml", "a.xml"] }"#).unwrap();

        let sent = JsonFileStore::new(&path).load().unwrap();
        assert_eq!(sent.into_iter().collect::<Vec<_>>(), vec!["a.xml", "b.xml"]);
    }

    #[test]
    fn object_without_sent_key_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sent-files.json");
        fs::write(&path, "{}").unwrap();

        assert!(JsonFileStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sent-files.json");
        fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(
            JsonFileStore::new(&path).load(),
            Err(LedgerError::Corrupt { .. })
        ));
    }

    #[test]
    fn save_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sent-files.json");
        let store = JsonFileStore::new(&path);

        store
            .save(&BTreeSet::from(["a.xml".to_string()]))
            .unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("sent-files.json")]);
    }
}
