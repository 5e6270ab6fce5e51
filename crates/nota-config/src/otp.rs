//! Authenticator secret for the portal login.

use serde::{Deserialize, Serialize};

use crate::de::lenient_string;

const fn default_step_secs() -> u64 {
    30
}

const fn default_digits() -> u32 {
    6
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Base-32 shared secret.
    #[serde(default, deserialize_with = "lenient_string")]
    pub secret: String,

    #[serde(default = "default_step_secs")]
    pub step_secs: u64,

    #[serde(default = "default_digits")]
    pub digits: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            step_secs: default_step_secs(),
            digits: default_digits(),
        }
    }
}

impl OtpConfig {
    pub fn is_configured(&self) -> bool {
        !self.secret.trim().is_empty()
    }

    /// The secret, or `None` when unset.
    #[must_use]
    pub fn secret(&self) -> Option<&str> {
        self.is_configured().then_some(self.secret.as_str())
    }
}
