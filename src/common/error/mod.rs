//! Unified error types for the Longan library.
//!
//! This module provides a single error type shared by the geometry,
//! color, and cascade resolvers, presenting a consistent API to users.

// Submodule declarations
pub mod types;

// Re-exports
pub use types::{Error, Result};
