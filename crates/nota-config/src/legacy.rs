//! Flat environment names used by earlier deployments of the export job.
//!
//! They are translated into `NOTA_*` keys and applied as overrides below the
//! real `NOTA_*` environment, so a migrated deployment keeps working and an
//! explicit `NOTA_*` value always wins.

const LEGACY_KEYS: &[(&str, &str)] = &[
    ("DOWNLOAD_PATH", "NOTA_DOWNLOAD__DIR"),
    ("CLIENT_ID", "NOTA_DELIVERY__CLIENT_ID"),
    ("PLATFORM_ID", "NOTA_DELIVERY__PLATFORM_ID"),
    ("ALLOWED_NAT_OP", "NOTA_FILTER__ALLOWED"),
    ("SFTP_HOST", "NOTA_REMOTE__SFTP__HOST"),
    ("SFTP_PORT", "NOTA_REMOTE__SFTP__PORT"),
    ("SFTP_USER", "NOTA_REMOTE__SFTP__USERNAME"),
    ("SFTP_PASSWORD", "NOTA_REMOTE__SFTP__PASSWORD"),
    ("SFTP_BASE_PATH", "NOTA_REMOTE__BASE_PATH"),
    ("SECRET_TOTP", "NOTA_OTP__SECRET"),
];

/// Translate legacy variables found in `env` into `NOTA_*` overrides.
///
/// Blank values are ignored. Output follows the order of the legacy table.
pub fn legacy_env_overrides<I>(env: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env: Vec<(String, String)> = env.into_iter().collect();

    LEGACY_KEYS
        .iter()
        .filter_map(|(legacy, key)| {
            env.iter()
                .find(|(name, value)| name == legacy && !value.trim().is_empty())
                .map(|(_, value)| ((*key).to_string(), value.clone()))
        })
        .collect()
}
