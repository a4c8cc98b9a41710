//! Domain layer: identifiers, storage contracts and ID allocation.
//!
//! - [`entities`] - short tokens and content hashes
//! - [`repositories`] - the [`repositories::KeyValueStore`] contract
//! - [`mapping_store`] - namespaced token, dedup and counter records
//! - [`id_allocator`] - sequential IDs with a first-access offset
//!
//! Nothing here depends on a concrete store; implementations live in
//! [`crate::infrastructure`].

pub mod entities;
pub mod id_allocator;
pub mod mapping_store;
pub mod repositories;
