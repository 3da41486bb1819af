//! Conversions between the base64url and standard base64 alphabets.
//!
//! The alphabets differ only in characters 62 and 63 (`-`/`_` versus
//! `+`/`/`), so converting is a character swap plus padding repair: the
//! URL-safe form strips `=` padding, which must be restored before a strict
//! decoder will accept the text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// Length is congruent to 1 mod 4; no valid padding exists.
    #[error("invalid base64url length: {0}")]
    InvalidLength(usize),
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Convert base64url text to standard base64, restoring `=` padding.
pub fn to_standard(data: &str) -> Result<String, CodecError> {
    let mut out: String = data
        .chars()
        .map(|ch| match ch {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    match out.len() % 4 {
        1 => return Err(CodecError::InvalidLength(out.len())),
        2 => out.push_str("=="),
        3 => out.push('='),
        _ => {}
    }
    Ok(out)
}

/// Convert standard base64 text to base64url, stripping `=` padding.
pub fn from_standard(data: &str) -> String {
    data.chars()
        .filter_map(|ch| match ch {
            '+' => Some('-'),
            '/' => Some('_'),
            '=' => None,
            other => Some(other),
        })
        .collect()
}

/// Decode a base64url payload to bytes via the standard alphabet.
pub fn decode(data: &str) -> Result<Vec<u8>, CodecError> {
    let standard = to_standard(data)?;
    Ok(STANDARD.decode(standard)?)
}
