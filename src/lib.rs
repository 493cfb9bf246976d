//! Longan - PPTX document-model resolution
//!
//! This library resolves parsed PowerPoint presentation parts into flat,
//! render-ready records: absolute shape geometry with group nesting
//! flattened away, and effective text styles with the full inheritance
//! cascade (run → paragraph → shape → layout → master → theme) applied.
//!
//! # Features
//!
//! - **Transform flattening**: Arbitrarily nested group shapes resolve to
//!   absolute slide coordinates, including child-space remapping, scale,
//!   rotation, and flips
//! - **Style cascade**: Per-run resolution of font, size, weight, color,
//!   caps, and baseline through all seven inheritance levels
//! - **Theme resolution**: Scheme-color tokens through color maps and the
//!   12-slot scheme, with the lumMod/lumOff/tint/shade/alpha modifier
//!   pipeline
//! - **Degrade, never abort**: Malformed transforms, broken
//!   relationships, and missing themes fall back to documented defaults
//!   and are recorded as diagnostics
//! - **Slide-parallel**: Slides resolve independently over a shared
//!   read-only part cache
//!
//! # Example - Resolving a slide
//!
//! ```rust
//! use longan::opc::MemoryPackage;
//! use longan::pptx::{Diagnostics, Resolver};
//!
//! let mut pkg = MemoryPackage::new();
//! pkg.insert(
//!     "ppt/slides/slide1.xml",
//!     br#"<sld><cSld><spTree>
//!         <sp>
//!             <nvSpPr><cNvPr id="2" name="Box"/></nvSpPr>
//!             <spPr><xfrm>
//!                 <off x="914400" y="914400"/>
//!                 <ext cx="1828800" cy="914400"/>
//!             </xfrm></spPr>
//!             <txBody><p><r><t>Hello</t></r></p></txBody>
//!         </sp>
//!     </spTree></cSld></sld>"#
//!         .to_vec(),
//! );
//! pkg.insert(
//!     "ppt/slides/_rels/slide1.xml.rels",
//!     br#"<Relationships>
//!         <Relationship Id="rId1"
//!             Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout"
//!             Target="../slideLayouts/slideLayout1.xml"/>
//!     </Relationships>"#
//!         .to_vec(),
//! );
//! pkg.insert(
//!     "ppt/slideLayouts/slideLayout1.xml",
//!     b"<sldLayout><cSld><spTree/></cSld></sldLayout>".to_vec(),
//! );
//! pkg.insert(
//!     "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
//!     br#"<Relationships>
//!         <Relationship Id="rId1"
//!             Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster"
//!             Target="../slideMasters/slideMaster1.xml"/>
//!     </Relationships>"#
//!         .to_vec(),
//! );
//! pkg.insert(
//!     "ppt/slideMasters/slideMaster1.xml",
//!     b"<sldMaster><cSld><spTree/></cSld></sldMaster>".to_vec(),
//! );
//!
//! let diagnostics = Diagnostics::new();
//! let resolver = Resolver::new(pkg);
//! let slide = resolver.resolve_slide("ppt/slides/slide1.xml", &diagnostics)?;
//!
//! let shape = &slide.shapes[0];
//! assert_eq!(shape.name, "Box");
//! // One inch at the legacy point-per-pixel divisor
//! assert_eq!(shape.frame.x, 72.0);
//! assert_eq!(slide.shapes[0].paragraphs[0].runs[0].text, "Hello");
//! # Ok::<(), longan::common::Error>(())
//! ```

pub mod common;
pub mod opc;
pub mod pptx;

pub use common::{Error, Result};
pub use pptx::{Diagnostics, ResolveOptions, ResolvedSlide, Resolver};
