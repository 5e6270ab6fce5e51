use nota_config::NotaConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &NotaConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &NotaConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.remote.is_configured()
        && (has_env_prefix(&env_keys, "NOTA_REMOTE") || has_env_prefix(&env_keys, "SFTP_"))
    {
        warnings.push(format!(
            "Remote backend '{}' appears unconfigured while remote env vars exist. Use double underscores (example: NOTA_REMOTE__SFTP__HOST).",
            config.remote.backend.as_str()
        ));
    }

    if !config.otp.is_configured() && has_env_prefix(&env_keys, "NOTA_OTP") {
        warnings.push(
            "OTP secret appears default while NOTA_OTP* env vars exist. Use double underscores (example: NOTA_OTP__SECRET)."
                .to_string(),
        );
    }

    if !config.filter.is_enabled()
        && (has_env_prefix(&env_keys, "NOTA_FILTER") || has_env_prefix(&env_keys, "ALLOWED_NAT_OP"))
    {
        warnings.push(
            "Classification filter is disabled while filter env vars exist; every document will be delivered. Use double underscores (example: NOTA_FILTER__ALLOWED)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
