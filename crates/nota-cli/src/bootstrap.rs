use anyhow::Context;
use nota_config::NotaConfig;

use crate::cli::GlobalFlags;

pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<NotaConfig> {
    load_dotenv(flags)?;

    let legacy = nota_config::legacy_env_overrides(std::env::vars());
    if !legacy.is_empty() {
        tracing::debug!(count = legacy.len(), "applying legacy environment variable names");
    }

    NotaConfig::load_from(flags.config.as_deref(), &legacy).context("failed to load configuration")
}

/// Load `.env` next to an explicit config file, else from the current directory.
fn load_dotenv(flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(config_path) = &flags.config
        && let Some(dir) = config_path.parent()
    {
        let env_path = dir.join(".env");
        if env_path.is_file() {
            dotenvy::from_path(&env_path)
                .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
            return Ok(());
        }
    }

    dotenvy::dotenv().ok();
    Ok(())
}
