//! Agristock Core — domain models, error types, and repository traits.
//!
//! This crate is storage-agnostic: the business-logic crates
//! (`agristock-auth`, `agristock-teams`) depend only on the trait
//! definitions here, never on a concrete database.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{Error, Result};
