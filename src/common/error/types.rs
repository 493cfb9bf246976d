//! Unified error types for the Longan library.
//!
//! Resolution is designed to degrade rather than fail: most of these
//! variants are recorded on a diagnostics collector while the conversion
//! continues with a documented fallback. Only a missing slide layout or
//! slide master is fatal, and then only for the one slide that references
//! it.
use thiserror::Error;

/// Main error type for Longan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A shape transform element was missing or unparseable.
    ///
    /// Resolved to the zero transform; conversion continues.
    #[error("Malformed transform on shape '{0}'")]
    MalformedTransform(String),

    /// A scheme-color token could not be mapped through the active
    /// color map and color scheme.
    ///
    /// Callers substitute black (`#000000`) and continue.
    #[error("Unresolved scheme color token '{0}'")]
    UnresolvedSchemeColor(String),

    /// No style was found at any level of the inheritance cascade.
    ///
    /// Resolved to the hard-coded implementation default.
    #[error("No cascade level supplied a value for {0}")]
    MissingCascadeLevel(String),

    /// A relationship id was referenced but absent from its manifest.
    ///
    /// The dependent shape or fill is skipped, not the whole slide.
    #[error("Broken relationship '{r_id}' in {part}")]
    BrokenRelationship { r_id: String, part: String },

    /// The slide layout for a slide could not be located.
    ///
    /// Hard failure for that slide only; sibling slides are unaffected.
    #[error("Slide layout not found for '{0}'")]
    MissingLayout(String),

    /// The slide master for a layout could not be located.
    ///
    /// Hard failure for that slide only; sibling slides are unaffected.
    #[error("Slide master not found for '{0}'")]
    MissingMaster(String),

    /// Part not found in the package.
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// XML parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// The job was cancelled before this slide was scheduled.
    #[error("Resolution cancelled")]
    Cancelled,
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

/// Result type for Longan operations.
pub type Result<T> = std::result::Result<T, Error>;
