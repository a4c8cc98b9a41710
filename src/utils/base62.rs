//! Base62 codec for short tokens.
//!
//! Renders allocated IDs as variable-length tokens over `0-9A-Za-z`. The
//! mapping is a plain positional numeral system, so it is a bijection between
//! `u64` values and canonical (no leading zero) tokens.

/// Token alphabet in digit order: digits, uppercase, lowercase.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const BASE: u64 = 62;

/// Longest possible token for a `u64` (`u64::MAX` renders as 11 digits).
pub const MAX_TOKEN_LEN: usize = 11;

/// Errors returned when a string is not a valid base62 token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Token is empty")]
    Empty,

    #[error("Invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("Token value does not fit in 64 bits")]
    Overflow,
}

/// Encodes an ID as a base62 token.
///
/// Total for every `u64`. `0` encodes to `"0"`; no other token starts with `'0'`.
///
/// # Examples
///
/// ```
/// use short_url::utils::base62::encode;
///
/// assert_eq!(encode(0), "0");
/// assert_eq!(encode(61), "z");
/// assert_eq!(encode(62), "10");
/// assert_eq!(encode(10_000), "2bI");
/// ```
pub fn encode(mut id: u64) -> String {
    if id == 0 {
        return (ALPHABET[0] as char).to_string();
    }

    let mut buf = [0u8; MAX_TOKEN_LEN];
    let mut pos = MAX_TOKEN_LEN;

    while id > 0 {
        pos -= 1;
        buf[pos] = ALPHABET[(id % BASE) as usize];
        id /= BASE;
    }

    buf[pos..].iter().map(|&b| b as char).collect()
}

/// Decodes a base62 token back into its ID.
///
/// # Errors
///
/// - [`DecodeError::Empty`] for an empty string
/// - [`DecodeError::InvalidCharacter`] for anything outside [`ALPHABET`]
/// - [`DecodeError::Overflow`] if the value exceeds `u64::MAX`
pub fn decode(token: &str) -> Result<u64, DecodeError> {
    if token.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut value: u64 = 0;

    for (position, character) in token.chars().enumerate() {
        let digit = digit_value(character)
            .ok_or(DecodeError::InvalidCharacter {
                character,
                position,
            })?;

        value = value
            .checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or(DecodeError::Overflow)?;
    }

    Ok(value)
}

/// Returns `true` if every character of `token` belongs to the alphabet.
pub fn is_valid_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| digit_value(c).is_some())
}

fn digit_value(c: char) -> Option<u64> {
    match c {
        '0'..='9' => Some(c as u64 - '0' as u64),
        'A'..='Z' => Some(c as u64 - 'A' as u64 + 10),
        'a'..='z' => Some(c as u64 - 'a' as u64 + 36),
        _ => None,
    }
}
