//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::ShortenerService;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; the service itself sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService>,
}

impl AppState {
    pub fn new(shortener: Arc<ShortenerService>) -> Self {
        Self { shortener }
    }
}
