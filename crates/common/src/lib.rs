//! Trimview Common Utilities
//!
//! Shared infrastructure for all trimview crates:
//! - Error types and result aliases
//! - Monotonic timestamps and single-slot deferred tasks
//! - Tracing/logging initialization
//! - Configuration loading and validation

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
