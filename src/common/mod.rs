//! Common types, traits, and utilities shared across the resolution core.

// Submodule declarations
pub mod error;
pub mod style;
pub mod unit;

// Re-exports for convenience
pub use error::{Error, Result};
pub use style::{ColorModifiers, Hsl, RGBColor};
