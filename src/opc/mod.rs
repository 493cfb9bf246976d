//! Package-level plumbing: parsed part trees, relationship manifests, and
//! the per-job part cache.
//!
//! This layer deliberately stops short of ZIP handling. The surrounding
//! system unpacks the archive and hands raw bytes to the cache through the
//! [`PartProvider`] seam; everything above works on immutable parsed
//! trees.

// Submodule declarations
pub mod cache;
pub mod part;
pub mod rel;

// Re-exports
pub use cache::{MemoryPackage, PartCache, PartProvider};
pub use part::XmlElement;
pub use rel::{Relationship, Relationships};
