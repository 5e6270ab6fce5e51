//! Partitioning extracted documents against the classification allow-list.

use std::fmt;
use std::fs;
use std::path::Path;

use nota_core::has_extension;

use crate::IngestError;
use crate::classify::classification_of;
use crate::normalize::normalize;

/// Normalized, de-duplicated allow-list entries in configured order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    entries: Vec<String>,
}

impl AllowList {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<String> = Vec::new();
        for value in values {
            let normalized = normalize(value.as_ref());
            if !normalized.is_empty() && !entries.contains(&normalized) {
                entries.push(normalized);
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `classification` matches an entry once normalized.
    pub fn allows(&self, classification: &str) -> bool {
        let normalized = normalize(classification);
        self.entries.contains(&normalized)
    }
}

/// Whether documents are classified at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterPolicy {
    /// No allow-list configured: every document is accepted unread.
    #[default]
    AcceptAll,
    Allow(AllowList),
}

impl FilterPolicy {
    /// `AcceptAll` when no non-blank value is given.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = AllowList::new(values);
        if list.is_empty() {
            Self::AcceptAll
        } else {
            Self::Allow(list)
        }
    }

    pub const fn is_accept_all(&self) -> bool {
        matches!(self, Self::AcceptAll)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// No `natOp` value in the document.
    Missing,
    /// Classification present but not allowed; holds the normalized value.
    NotAllowed { classification: String },
    /// The document could not be read or parsed.
    Parse { message: String },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("classification missing"),
            Self::NotAllowed { classification } => {
                write!(f, "classification {classification:?} not allowed")
            }
            Self::Parse { message } => write!(f, "unreadable document: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub file: String,
    pub reason: RejectionReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Accepted filenames, sorted.
    pub accepted: Vec<String>,
    pub rejected: Vec<Rejection>,
}

#[derive(Debug, Clone)]
pub struct DocumentFilter {
    policy: FilterPolicy,
    document_extension: String,
}

impl DocumentFilter {
    pub fn new(policy: FilterPolicy, document_extension: impl Into<String>) -> Self {
        Self {
            policy,
            document_extension: document_extension.into(),
        }
    }

    pub const fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    /// Classify every document directly inside `dir`, in filename order.
    ///
    /// A document that cannot be parsed is rejected; it does not fail the
    /// call.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Io`] only if `dir` itself cannot be listed.
    pub fn partition(&self, dir: &Path) -> Result<FilterOutcome, IngestError> {
        let documents = self.list_documents(dir)?;
        let mut outcome = FilterOutcome::default();

        let FilterPolicy::Allow(list) = &self.policy else {
            tracing::info!(
                documents = documents.len(),
                "no classification filter configured, accepting all documents"
            );
            outcome.accepted = documents;
            return Ok(outcome);
        };

        for file in documents {
            match Self::check(list, &dir.join(&file)) {
                Ok(()) => outcome.accepted.push(file),
                Err(reason) => {
                    tracing::debug!(%file, %reason, "document rejected");
                    outcome.rejected.push(Rejection { file, reason });
                }
            }
        }

        tracing::info!(
            accepted = outcome.accepted.len(),
            rejected = outcome.rejected.len(),
            "documents filtered by classification"
        );
        Ok(outcome)
    }

    fn check(list: &AllowList, path: &Path) -> Result<(), RejectionReason> {
        let classification = classification_of(path)
            .map_err(|error| RejectionReason::Parse {
                message: error.to_string(),
            })?
            .ok_or(RejectionReason::Missing)?;

        if list.allows(&classification) {
            Ok(())
        } else {
            Err(RejectionReason::NotAllowed {
                classification: normalize(&classification),
            })
        }
    }

    fn list_documents(&self, dir: &Path) -> Result<Vec<String>, IngestError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if has_extension(&name, &self.document_extension) {
                files.push(name);
            }
        }
        files.sort();
        Ok(files)
    }
}
