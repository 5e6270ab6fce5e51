//! # nota-auth
//!
//! One-time password generation for the seller-portal login.
//!
//! The login flow itself lives outside this workspace; it only needs the
//! current code for a shared authenticator secret. [`Totp`] implements
//! RFC 6238 over HMAC-SHA1 with RFC 4226 dynamic truncation, compatible with
//! the common authenticator apps.
//!
//! ```
//! use nota_auth::{Totp, TotpParams};
//!
//! let totp = Totp::new(Some("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"), TotpParams::default())?;
//! assert_eq!(totp.code_at(59), "287082");
//! # Ok::<(), nota_auth::OtpError>(())
//! ```

pub mod base32;
pub mod error;
pub mod totp;

pub use error::OtpError;
pub use totp::{CodeWindow, Totp, TotpParams, hotp};

/// Current code for `secret` with default parameters (30 s step, 6 digits).
///
/// # Errors
///
/// Returns [`OtpError::MissingSecret`] when no secret is supplied and
/// [`OtpError::InvalidSecret`] when it is not valid base-32.
pub fn generate(secret: Option<&str>) -> Result<String, OtpError> {
    Ok(Totp::new(secret, TotpParams::default())?.code_now())
}
