//! Common types and utilities shared across the index crate.
//!
//! - Configuration constants and [`config::BTreeConfig`]
//! - Error types
//! - Identifiers (ListenerId)

pub mod config;
pub mod error;
mod listener_id;

pub use error::{Error, Result};
pub use listener_id::ListenerId;
