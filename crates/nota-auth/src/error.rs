use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpError {
    #[error("OTP secret not provided")]
    MissingSecret,

    #[error("OTP secret is not valid base-32: unexpected {character:?} at position {position}")]
    InvalidSecret { character: char, position: usize },

    #[error("invalid OTP parameters: {0}")]
    InvalidParameters(String),
}
