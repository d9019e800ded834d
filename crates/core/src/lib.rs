//! Domain rules for the recipe-sharing backend.
//!
//! Nothing in this crate touches the network, the filesystem, or the
//! database, so every rule here is unit-testable in isolation.

pub mod account;
pub mod error;
pub mod image_variants;
pub mod listing;
pub mod media;
pub mod recipe;
pub mod roles;
pub mod types;
