//! Errors raised while loading or validating nota configuration.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source failed to parse, or the merged values did not fit [`crate::NotaConfig`].
    #[error("failed to load configuration: {0}")]
    Figment(#[from] figment::Error),

    /// The file passed with `--config` is not there.
    #[error("config file {} does not exist", path.display())]
    MissingFile { path: PathBuf },

    /// A loaded value would make a run misbehave.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
