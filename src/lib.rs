//! # short-url
//!
//! A URL shortening service backed by Redis and served with Axum.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Tokens, the store contract, ID allocation
//! - **Application Layer** ([`application`]) - The shortening engine
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis and in-memory stores
//! - **API Layer** ([`api`]) - HTTP handlers, DTOs and middleware
//!
//! ## How Tokens Are Made
//!
//! Each new long URL gets the next value of a store-side counter, starting at
//! 10000, rendered in base62 (`0-9A-Za-z`). The first token is therefore
//! `2bI`. An MD5 index of long URLs makes repeated requests return the
//! token already handed out.
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379/0"
//! cargo run
//!
//! curl -X POST localhost:8081/admin/create -d '{"long_url":"https://example.com"}' \
//!      -H 'content-type: application/json'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::{AppError, ShortenerError};
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{CreatedLink, ShortenerService, ShortenerSettings};
    pub use crate::domain::entities::ShortToken;
    pub use crate::domain::repositories::{KeyValueStore, StoreError};
    pub use crate::error::{AppError, ShortenerError};
    pub use crate::infrastructure::store::{MemoryStore, RedisStore};
    pub use crate::state::AppState;
}
