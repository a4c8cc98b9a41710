//! Core domain values of the shortening engine.
//!
//! # Entity Types
//!
//! - [`ShortToken`] - Base62 rendering of an allocated ID
//! - [`ContentHash`] - Dedup key derived from a long URL
//!
//! Both are thin newtypes over `String` so the two key spaces of the
//! mapping store cannot be mixed up at call sites.

pub mod content_hash;
pub mod short_token;

pub use content_hash::ContentHash;
pub use short_token::ShortToken;
