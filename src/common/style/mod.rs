//! Shared style primitives.

// Submodule declarations
pub mod color;

// Re-exports
pub use color::{ColorModifiers, Hsl, RGBColor};
