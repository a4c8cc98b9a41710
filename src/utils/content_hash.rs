//! Content-addressed keys for the deduplication index.

use crate::domain::entities::ContentHash;

/// Computes the dedup key for a long URL.
///
/// The digest is MD5 over the raw UTF-8 bytes, rendered as 32 lowercase hex
/// characters. The input is not normalized: `https://a.com` and
/// `https://a.com/` hash differently and receive different tokens.
pub fn content_hash(long_url: &str) -> ContentHash {
    let digest = md5::compute(long_url.as_bytes());
    ContentHash::from_hex(hex::encode(digest.0))
}
