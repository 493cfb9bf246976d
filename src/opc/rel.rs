//! Relationship manifests.
//!
//! Each part may carry a `_rels/<part>.rels` manifest mapping relationship
//! ids to target parts. The resolution core chains these manifests to walk
//! from a slide to its layout, from the layout to its master, and from the
//! master to the shared theme.

use crate::common::{Error, Result};
use crate::opc::part::XmlElement;
use std::collections::HashMap;

/// Relationship type suffix for slide layouts.
pub const RT_SLIDE_LAYOUT: &str = "/slideLayout";
/// Relationship type suffix for slide masters.
pub const RT_SLIDE_MASTER: &str = "/slideMaster";
/// Relationship type suffix for themes.
pub const RT_THEME: &str = "/theme";

/// A single relationship from a source part to a target.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,
    /// Relationship type URI
    reltype: String,
    /// Resolved target part path (package-absolute, no leading slash),
    /// or the raw URL for external relationships
    target: String,
    /// Whether this is an external relationship
    is_external: bool,
}

impl Relationship {
    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type URI.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the resolved target.
    ///
    /// For internal relationships this is a package path such as
    /// `ppt/slideLayouts/slideLayout1.xml`; for external relationships it
    /// is the untouched URL.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }
}

/// Collection of relationships from a single source part.
///
/// Uses a HashMap for O(1) lookup by relationship ID. Parsed once per
/// part and reused for the whole conversion job.
#[derive(Debug, Default)]
pub struct Relationships {
    /// Path of the part these relationships belong to
    source: String,
    /// Map of relationship ID to Relationship
    rels: HashMap<String, Relationship>,
}

impl Relationships {
    /// Parse a relationship manifest.
    ///
    /// # Arguments
    /// * `source` - Path of the part the manifest belongs to (used both
    ///   for error reporting and for resolving relative targets)
    /// * `root` - Parsed manifest tree (`<Relationships>` root)
    pub fn from_part(source: &str, root: &XmlElement) -> Relationships {
        let base_dir = parent_dir(source);
        let mut rels = HashMap::new();

        for rel in root.children_named("Relationship") {
            let (Some(r_id), Some(reltype), Some(target_ref)) =
                (rel.attr("Id"), rel.attr("Type"), rel.attr("Target"))
            else {
                continue;
            };

            let is_external = rel.attr("TargetMode") == Some("External");
            let target = if is_external {
                target_ref.to_string()
            } else {
                resolve_target(base_dir, target_ref)
            };

            rels.insert(
                r_id.to_string(),
                Relationship {
                    r_id: r_id.to_string(),
                    reltype: reltype.to_string(),
                    target,
                    is_external,
                },
            );
        }

        Relationships {
            source: source.to_string(),
            rels,
        }
    }

    /// An empty manifest for parts that carry none.
    pub fn empty(source: &str) -> Relationships {
        Relationships {
            source: source.to_string(),
            rels: HashMap::new(),
        }
    }

    /// Look up a relationship by id.
    ///
    /// A missing id is a [`Error::BrokenRelationship`]; callers skip the
    /// dependent shape or fill rather than failing the slide.
    pub fn get(&self, r_id: &str) -> Result<&Relationship> {
        self.rels.get(r_id).ok_or_else(|| Error::BrokenRelationship {
            r_id: r_id.to_string(),
            part: self.source.clone(),
        })
    }

    /// First internal relationship whose type URI ends with `suffix`.
    ///
    /// Relationship type URIs are long and versioned; matching on the
    /// trailing segment (`/slideLayout`, `/slideMaster`, `/theme`) is
    /// stable across schema versions.
    pub fn first_of_type(&self, suffix: &str) -> Option<&Relationship> {
        let mut found: Option<&Relationship> = None;
        for rel in self.rels.values() {
            if rel.is_external || !rel.reltype.ends_with(suffix) {
                continue;
            }
            // HashMap order is unstable; pick the lowest rId for determinism.
            match found {
                Some(prev) if prev.r_id <= rel.r_id => {},
                _ => found = Some(rel),
            }
        }
        found
    }

    /// Number of relationships in the manifest.
    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Whether the manifest is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}

/// Manifest path for a part: `ppt/slides/slide1.xml` has its
/// relationships at `ppt/slides/_rels/slide1.xml.rels`.
pub fn rels_path_for(part_path: &str) -> String {
    match part_path.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part_path}.rels"),
    }
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Resolve a relative target against the source part's directory,
/// collapsing `..` and `.` segments.
fn resolve_target(base_dir: &str, target: &str) -> String {
    let target = target.trim_start_matches('/');
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();

    for segment in target.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            other => segments.push(other),
        }
    }

    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"<?xml version="1.0"?>
        <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId1"
                Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout"
                Target="../slideLayouts/slideLayout1.xml"/>
            <Relationship Id="rId2"
                Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image"
                Target="../media/image1.png"/>
            <Relationship Id="rId3"
                Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink"
                Target="https://example.com/" TargetMode="External"/>
        </Relationships>"#;

    fn manifest() -> Relationships {
        let root = XmlElement::parse(MANIFEST.as_bytes()).unwrap();
        Relationships::from_part("ppt/slides/slide1.xml", &root)
    }

    #[test]
    fn test_relative_target_resolution() {
        let rels = manifest();
        assert_eq!(rels.len(), 3);
        assert_eq!(
            rels.get("rId1").unwrap().target(),
            "ppt/slideLayouts/slideLayout1.xml"
        );
        assert_eq!(rels.get("rId2").unwrap().target(), "ppt/media/image1.png");
    }

    #[test]
    fn test_external_target_untouched() {
        let rels = manifest();
        let hyperlink = rels.get("rId3").unwrap();
        assert!(hyperlink.is_external());
        assert_eq!(hyperlink.target(), "https://example.com/");
    }

    #[test]
    fn test_missing_id_is_broken_relationship() {
        let rels = manifest();
        match rels.get("rId9") {
            Err(Error::BrokenRelationship { r_id, part }) => {
                assert_eq!(r_id, "rId9");
                assert_eq!(part, "ppt/slides/slide1.xml");
            },
            other => panic!("expected BrokenRelationship, got {other:?}"),
        }
    }

    #[test]
    fn test_first_of_type() {
        let rels = manifest();
        let layout = rels.first_of_type(RT_SLIDE_LAYOUT).unwrap();
        assert_eq!(layout.r_id(), "rId1");
        assert!(layout.reltype().ends_with("/slideLayout"));
        assert!(rels.first_of_type(RT_THEME).is_none());
        // External rels never match, even with a matching suffix
        assert!(rels.first_of_type("/hyperlink").is_none());
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(
            rels_path_for("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
        assert_eq!(
            rels_path_for("presentation.xml"),
            "_rels/presentation.xml.rels"
        );
    }
}
