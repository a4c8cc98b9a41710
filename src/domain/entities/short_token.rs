//! Short token entity.

use crate::utils::base62;
use std::fmt;

/// A short token over the base62 alphabet.
///
/// Tokens minted by the engine always come from [`ShortToken::from_id`], which
/// makes them unique per allocated ID. Tokens read back from the store are
/// wrapped with [`ShortToken::new_unchecked`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortToken(String);

impl ShortToken {
    /// Renders an allocated ID as a token.
    pub fn from_id(id: u64) -> Self {
        Self(base62::encode(id))
    }

    /// Wraps an existing token string without validation.
    pub fn new_unchecked(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the ID this token encodes, if it is a canonical base62 token.
    pub fn id(&self) -> Option<u64> {
        base62::decode(&self.0).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShortToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id() {
        let token = ShortToken::from_id(10_000);
        assert_eq!(token.as_str(), "2bI");
        assert_eq!(token.id(), Some(10_000));
    }

    #[test]
    fn test_unchecked_token_with_foreign_characters() {
        let token = ShortToken::new_unchecked("not-base62");
        assert_eq!(token.id(), None);
        assert_eq!(token.to_string(), "not-base62");
    }
}
