//! RFC 6238 time-based codes on top of RFC 4226 HOTP.

use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::{OtpError, base32};

type HmacSha1 = Hmac<Sha1>;

const fn default_step_secs() -> u64 {
    30
}

const fn default_digits() -> u32 {
    6
}

/// Time step and code length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotpParams {
    pub step_secs: u64,
    pub digits: u32,
}

impl Default for TotpParams {
    fn default() -> Self {
        Self {
            step_secs: default_step_secs(),
            digits: default_digits(),
        }
    }
}

impl TotpParams {
    fn validate(self) -> Result<Self, OtpError> {
        if self.step_secs == 0 {
            return Err(OtpError::InvalidParameters(
                "time step must be at least one second".into(),
            ));
        }
        if !(1..=9).contains(&self.digits) {
            return Err(OtpError::InvalidParameters(format!(
                "digit count must be between 1 and 9, got {}",
                self.digits
            )));
        }
        Ok(self)
    }
}

/// A code together with the seconds left in its window, read at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeWindow {
    pub code: String,
    pub remaining_secs: u64,
}

/// A decoded shared secret ready to produce codes.
#[derive(Clone)]
pub struct Totp {
    key: Vec<u8>,
    params: TotpParams,
}

impl std::fmt::Debug for Totp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Totp")
            .field("key", &"<redacted>")
            .field("params", &self.params)
            .finish()
    }
}

impl Totp {
    /// Decode `secret` and validate `params`.
    ///
    /// A blank secret counts as missing.
    ///
    /// # Errors
    ///
    /// [`OtpError::MissingSecret`], [`OtpError::InvalidSecret`], or
    /// [`OtpError::InvalidParameters`].
    pub fn new(secret: Option<&str>, params: TotpParams) -> Result<Self, OtpError> {
        let secret = secret
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(OtpError::MissingSecret)?;
        let params = params.validate()?;
        let key = base32::decode(secret)?;
        Ok(Self { key, params })
    }

    #[must_use]
    pub const fn params(&self) -> TotpParams {
        self.params
    }

    /// Code for the window containing `unix_seconds`.
    #[must_use]
    pub fn code_at(&self, unix_seconds: u64) -> String {
        let counter = unix_seconds / self.params.step_secs;
        truncate(&hmac_sha1(&self.key, counter), self.params.digits)
    }

    /// Code and remaining seconds for the window containing `unix_seconds`.
    #[must_use]
    pub fn window_at(&self, unix_seconds: u64) -> CodeWindow {
        CodeWindow {
            code: self.code_at(unix_seconds),
            remaining_secs: self.seconds_remaining_at(unix_seconds),
        }
    }

    /// [`Self::window_at`] for the current wall-clock second.
    #[must_use]
    pub fn window_now(&self) -> CodeWindow {
        let window = self.window_at(current_unix_seconds());
        tracing::debug!(
            step_secs = self.params.step_secs,
            remaining = window.remaining_secs,
            "generated one-time code"
        );
        window
    }

    /// Code for the current wall-clock second.
    #[must_use]
    pub fn code_now(&self) -> String {
        self.window_now().code
    }

    /// Seconds until the window containing `unix_seconds` ends.
    #[must_use]
    pub const fn seconds_remaining_at(&self, unix_seconds: u64) -> u64 {
        self.params.step_secs - unix_seconds % self.params.step_secs
    }
}

/// RFC 4226 HOTP value for a raw key and counter.
///
/// # Errors
///
/// Returns [`OtpError::InvalidParameters`] if `digits` is outside `1..=9`.
pub fn hotp(key: &[u8], counter: u64, digits: u32) -> Result<String, OtpError> {
    TotpParams {
        step_secs: default_step_secs(),
        digits,
    }
    .validate()?;
    Ok(truncate(&hmac_sha1(key, counter), digits))
}

fn current_unix_seconds() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}

fn hmac_sha1(key: &[u8], counter: u64) -> [u8; 20] {
    // HMAC accepts keys of any length, so construction cannot fail.
    let mut mac = HmacSha1::new_from_slice(key).unwrap_or_else(|_| unreachable!());
    mac.update(&counter.to_be_bytes());
    let mut digest = [0_u8; 20];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    digest
}

fn truncate(digest: &[u8; 20], digits: u32) -> String {
    let offset = usize::from(digest[19] & 0x0f);
    let binary = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);
    let code = binary % 10_u32.pow(digits);
    format!("{code:0width$}", width = digits as usize)
}
