//! Application layer orchestrating the domain components.
//!
//! # Available Services
//!
//! - [`services::shortener_service::ShortenerService`] - Short URL creation and resolution

pub mod services;
