//! Pure helpers used by the shortening engine.
//!
//! - [`base62`] - Token encoding and decoding
//! - [`content_hash`] - Dedup key derivation for long URLs

pub mod base62;
pub mod content_hash;
