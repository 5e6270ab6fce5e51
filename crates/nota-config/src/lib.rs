//! # nota-config
//!
//! Layered configuration loading for nota using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`NOTA_*` prefix, `__` as separator)
//! 2. Explicit overrides (legacy flat variable names, see [`legacy_env_overrides`])
//! 3. Project-level `nota.toml` (or the path given with `--config`)
//! 4. User-level `~/.config/nota/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `NOTA_REMOTE__SFTP__HOST` -> `remote.sftp.host`,
//! `NOTA_FILTER__ALLOWED` -> `filter.allowed`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use nota_config::NotaConfig;
//!
//! let config = NotaConfig::load_with_dotenv().expect("config");
//!
//! if config.remote.is_configured() {
//!     println!("delivering under {}", config.remote.base_path);
//! }
//! ```

mod de;
mod delivery;
mod download;
mod env;
mod error;
mod filter;
mod ledger;
mod legacy;
mod otp;
mod remote;

pub use delivery::DeliveryConfig;
pub use download::DownloadConfig;
pub use error::ConfigError;
pub use filter::{AllowedValues, FilterConfig};
pub use ledger::LedgerConfig;
pub use legacy::legacy_env_overrides;
pub use otp::OtpConfig;
pub use remote::{LocalConfig, RemoteBackend, RemoteConfig, S3Config, SftpConfig};

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
    value::Dict,
};
use serde::{Deserialize, Serialize};

use crate::env::{StringKeys, TypedEnv, insert_nested, key_path};

const ENV_PREFIX: &str = "NOTA_";
const LOCAL_CONFIG_FILE: &str = "nota.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NotaConfig {
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub otp: OtpConfig,
}

impl NotaConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source fails to parse or extract.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env_overrides(&[])
    }

    /// Load `.env` from the current directory, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load with extra `NOTA_*`-style key/value pairs ranked below the process
    /// environment.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_env_overrides(overrides: &[(String, String)]) -> Result<Self, ConfigError> {
        Self::load_from(None, overrides)
    }

    /// Load using `config_path` in place of the project-level `nota.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if an explicit `config_path` does
    /// not exist, [`ConfigError::Figment`] for parse or extraction failures,
    /// and [`ConfigError::InvalidValue`] when validation fails.
    pub fn load_from(
        config_path: Option<&Path>,
        overrides: &[(String, String)],
    ) -> Result<Self, ConfigError> {
        if let Some(path) = config_path
            && !path.is_file()
        {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }

        let config: Self = Self::figment_with(config_path, overrides).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the default figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        Self::figment_with(None, &[])
    }

    /// Build the provider chain with an optional explicit config file and
    /// overrides.
    pub fn figment_with(config_path: Option<&Path>, overrides: &[(String, String)]) -> Figment {
        let defaults = Self::default();
        let string_keys = StringKeys::of(&defaults);
        let mut figment = Figment::from(Serialized::defaults(defaults));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = config_path.map_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE), Path::to_path_buf);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Overrides
        if !overrides.is_empty() {
            figment = figment.merge(Serialized::defaults(overrides_dict(overrides, &string_keys)));
        }

        // Layer 4: Environment variables (highest priority)
        figment.merge(TypedEnv::prefixed(ENV_PREFIX, string_keys))
    }

    /// Reject values that would make a run misbehave rather than fail cleanly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.download.poll_interval_ms == 0 {
            return Err(invalid("download.poll_interval_ms", "must be greater than zero"));
        }
        if self.download.archive_extension.trim().is_empty() {
            return Err(invalid("download.archive_extension", "must not be empty"));
        }
        if self.download.extract_dir.trim().is_empty() {
            return Err(invalid("download.extract_dir", "must not be empty"));
        }
        if self.filter.document_extension.trim().is_empty() {
            return Err(invalid("filter.document_extension", "must not be empty"));
        }
        for (field, value) in [
            ("delivery.client_id", &self.delivery.client_id),
            ("delivery.platform_id", &self.delivery.platform_id),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
            if value.contains('/') {
                return Err(invalid(field, "must be a single path segment"));
            }
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("nota").join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Nest `NOTA_A__B=value` pairs into `{ a: { b: value } }`.
///
/// String settings keep their raw text; other values are parsed the way
/// figment parses environment values. Keys without the `NOTA_` prefix are
/// ignored.
fn overrides_dict(overrides: &[(String, String)], string_keys: &StringKeys) -> Dict {
    let mut root = Dict::new();
    for (key, raw) in overrides {
        let Some(stripped) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let path = key_path(stripped, "__");
        insert_nested(&mut root, &path, string_keys.value(&path, raw));
    }
    root
}
