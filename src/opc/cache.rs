//! Per-job part cache.
//!
//! ZIP extraction is not this crate's concern: raw part bytes arrive
//! through the [`PartProvider`] seam. What is this crate's concern is
//! that each part is parsed at most once per conversion job and the
//! resulting tree shared read-only between slides resolving in parallel.
//!
//! The cache is an explicit context object owned by the resolver, never a
//! process-wide singleton, so concurrent jobs in one process do not
//! interfere. A race that parses the same part twice wastes work but is
//! harmless: parsing is pure and the second result is identical.

use crate::common::{Error, Result};
use crate::opc::part::XmlElement;
use crate::opc::rel::{Relationships, rels_path_for};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Source of raw part bytes, supplied by the surrounding system.
///
/// Implementations must be cheap to call repeatedly; the cache guarantees
/// each path is only requested when its parse is actually needed.
pub trait PartProvider: Send + Sync {
    /// Raw bytes for a part path, or `None` when the part does not exist.
    fn part_bytes(&self, path: &str) -> Option<Vec<u8>>;
}

/// In-memory provider backed by a path → bytes map.
///
/// # Examples
///
/// ```rust
/// use longan::opc::MemoryPackage;
///
/// let mut pkg = MemoryPackage::new();
/// pkg.insert("ppt/slides/slide1.xml", b"<sld/>".to_vec());
/// ```
#[derive(Debug, Default)]
pub struct MemoryPackage {
    parts: HashMap<String, Vec<u8>>,
}

impl MemoryPackage {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a part, replacing any previous bytes at the same path.
    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.parts.insert(path.into(), bytes);
    }
}

impl PartProvider for MemoryPackage {
    fn part_bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.parts.get(path).cloned()
    }
}

/// Lazily populated cache of parsed parts and relationship manifests.
///
/// The only shared mutable state in a conversion job. Reads take the
/// cheap path; a miss parses outside the lock and publishes the result
/// under a short write section.
#[derive(Default)]
pub struct PartCache {
    parts: RwLock<HashMap<String, Arc<XmlElement>>>,
    rels: RwLock<HashMap<String, Arc<Relationships>>>,
}

impl PartCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed tree for `path`, parsing it on first access.
    ///
    /// # Errors
    ///
    /// [`Error::PartNotFound`] when the provider has no such part,
    /// [`Error::Xml`] when the bytes do not parse.
    pub fn part(&self, provider: &dyn PartProvider, path: &str) -> Result<Arc<XmlElement>> {
        if let Some(cached) = self.parts.read().get(path) {
            return Ok(Arc::clone(cached));
        }

        let bytes = provider
            .part_bytes(path)
            .ok_or_else(|| Error::PartNotFound(path.to_string()))?;
        let parsed = Arc::new(XmlElement::parse(&bytes)?);

        let mut parts = self.parts.write();
        // Another worker may have parsed the same part meanwhile; keep the
        // first published tree so every reader shares one allocation.
        let entry = parts
            .entry(path.to_string())
            .or_insert_with(|| Arc::clone(&parsed));
        Ok(Arc::clone(entry))
    }

    /// Relationship manifest for the part at `path`.
    ///
    /// A part without a manifest yields an empty manifest rather than an
    /// error; manifests are optional for most parts.
    pub fn rels_for(&self, provider: &dyn PartProvider, path: &str) -> Arc<Relationships> {
        if let Some(cached) = self.rels.read().get(path) {
            return Arc::clone(cached);
        }

        let manifest_path = rels_path_for(path);
        let parsed = match self.part(provider, &manifest_path) {
            Ok(root) => Relationships::from_part(path, &root),
            Err(Error::PartNotFound(_)) => Relationships::empty(path),
            Err(e) => {
                log::warn!("unreadable relationship manifest for {path}: {e}");
                Relationships::empty(path)
            },
        };
        let parsed = Arc::new(parsed);

        let mut rels = self.rels.write();
        let entry = rels
            .entry(path.to_string())
            .or_insert_with(|| Arc::clone(&parsed));
        Arc::clone(entry)
    }
}
