//! RFC 4648 base-32 decoding for authenticator secrets.

use crate::OtpError;

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Decode a base-32 secret.
///
/// Input is upper-cased and trailing `=` padding is dropped. Any other
/// character outside `A-Z2-7` is rejected. Leftover bits that do not fill a
/// whole byte are discarded.
///
/// # Errors
///
/// Returns [`OtpError::InvalidSecret`] naming the first offending character.
pub fn decode(input: &str) -> Result<Vec<u8>, OtpError> {
    let trimmed = input.trim_end_matches('=');
    let mut output = Vec::with_capacity(trimmed.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;

    for (position, character) in trimmed.chars().enumerate() {
        let upper = character.to_ascii_uppercase();
        let index = u8::try_from(upper)
            .ok()
            .and_then(|byte| ALPHABET.iter().position(|&symbol| symbol == byte))
            .ok_or(OtpError::InvalidSecret {
                character,
                position,
            })?;

        // `index` < 32, so it always fits.
        buffer = (buffer << 5) | u32::try_from(index).unwrap_or_default();
        bits += 5;

        if bits >= 8 {
            bits -= 8;
            output.push(((buffer >> bits) & 0xff) as u8);
            buffer &= (1 << bits) - 1;
        }
    }

    Ok(output)
}
