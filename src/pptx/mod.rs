//! PPTX document-model resolution.
//!
//! The modules here take parsed presentation parts and turn them into
//! flat, absolutely-positioned, fully-styled records: [`transform`]
//! flattens group nesting, [`theme`] and [`cascade`] resolve colors and
//! text styles through their inheritance chains, and [`normalize`] drives
//! the whole pipeline per slide.

pub mod bullet;
pub mod cascade;
pub mod normalize;
pub mod shapes;
pub mod text;
pub mod theme;
pub mod transform;

pub use bullet::{BulletInfo, BulletKind, MarkerKind};
pub use cascade::{MasterStyles, ResolvedRunStyle, ShapeStyleContext};
pub use normalize::{
    Diagnostics, ResolveOptions, ResolvedParagraph, ResolvedRun, ResolvedShape, ResolvedSlide,
    Resolver,
};
pub use shapes::{Placeholder, PlaceholderKind, ShapeNode, shape_tree};
pub use text::{Alignment, Baseline, CapsMode, TextBody};
pub use theme::{ColorContext, ColorMap, ColorScheme, ColorSpec, FontScheme, Theme};
pub use transform::{FlatShape, Transform, flatten};
