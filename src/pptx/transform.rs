//! Shape transforms and the group-flattening engine.
//!
//! DrawingML expresses a group's children in the coordinate system the
//! group declares through `chOff`/`chExt`, nested to unbounded depth.
//! Rendering needs every leaf shape in absolute slide coordinates, so the
//! engine walks the tree with an explicit work-stack, removes the groups,
//! and promotes their leaves with composed transforms. Flattening emits
//! new records; the source tree is never rewritten.

use crate::common::unit::{angle_to_degrees, normalize_rotation};
use crate::opc::part::XmlElement;
use crate::pptx::shapes::ShapeNode;
use smallvec::SmallVec;

/// A 2D shape transform in EMU coordinates.
///
/// `rotation` is stored in 1/60000-degree units, always normalized into
/// `[0, 21_600_000)`. `child_offset`/`child_extent` are present only on
/// group shapes and define the coordinate space of the group's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transform {
    /// X offset in EMUs
    pub x: i64,
    /// Y offset in EMUs
    pub y: i64,
    /// Width in EMUs
    pub width: i64,
    /// Height in EMUs
    pub height: i64,
    /// Rotation in 1/60000 degrees, in `[0, 21_600_000)`
    pub rotation: i64,
    /// Horizontal flip
    pub flip_h: bool,
    /// Vertical flip
    pub flip_v: bool,
    /// Child-space origin (`chOff`), groups only
    pub child_offset: Option<(i64, i64)>,
    /// Child-space extent (`chExt`), groups only
    pub child_extent: Option<(i64, i64)>,
}

impl Transform {
    /// The zero transform, the fallback for missing `xfrm` elements.
    pub const ZERO: Transform = Transform {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
        rotation: 0,
        flip_h: false,
        flip_v: false,
        child_offset: None,
        child_extent: None,
    };

    /// Read a transform from an `xfrm` element.
    ///
    /// Missing children default field-wise to zero; a missing element
    /// entirely is the caller's concern (use [`Transform::ZERO`]).
    pub fn from_xfrm(xfrm: &XmlElement) -> Transform {
        let (x, y) = xfrm
            .child("off")
            .map(|off| {
                (
                    off.attr_i64("x").unwrap_or(0),
                    off.attr_i64("y").unwrap_or(0),
                )
            })
            .unwrap_or((0, 0));
        let (width, height) = xfrm
            .child("ext")
            .map(|ext| {
                (
                    ext.attr_i64("cx").unwrap_or(0),
                    ext.attr_i64("cy").unwrap_or(0),
                )
            })
            .unwrap_or((0, 0));
        let child_offset = xfrm.child("chOff").map(|ch| {
            (
                ch.attr_i64("x").unwrap_or(0),
                ch.attr_i64("y").unwrap_or(0),
            )
        });
        let child_extent = xfrm.child("chExt").map(|ch| {
            (
                ch.attr_i64("cx").unwrap_or(0),
                ch.attr_i64("cy").unwrap_or(0),
            )
        });

        Transform {
            x,
            y,
            width,
            height,
            rotation: normalize_rotation(xfrm.attr_i64("rot").unwrap_or(0)),
            flip_h: xfrm.attr_bool("flipH").unwrap_or(false),
            flip_v: xfrm.attr_bool("flipV").unwrap_or(false),
            child_offset,
            child_extent,
        }
    }

    /// Rotation in degrees `[0, 360)`.
    #[inline]
    pub fn rotation_degrees(&self) -> f64 {
        angle_to_degrees(self.rotation)
    }

    /// Horizontal scale a group applies to its descendants:
    /// rendered width over declared child-space width. Zero or missing
    /// child extent scales by 1.
    #[inline]
    fn scale_x(&self) -> f64 {
        match self.child_extent {
            Some((cx, _)) if cx != 0 => self.width as f64 / cx as f64,
            _ => 1.0,
        }
    }

    /// Vertical counterpart of [`Self::scale_x`].
    #[inline]
    fn scale_y(&self) -> f64 {
        match self.child_extent {
            Some((_, cy)) if cy != 0 => self.height as f64 / cy as f64,
            _ => 1.0,
        }
    }
}

/// Compose a child transform onto its parent's accumulated transform.
///
/// Offsets are additive before scale normalization: a group's own
/// offset/extent already encode its placement within the parent, so only
/// its descendants are subject to the group's child-space scale factors
/// (handled by [`absolute_position`]). Rotation accumulates modulo a full
/// turn; flips XOR, which makes their composition associative and
/// commutative. The child's extents and child-space declaration pass
/// through unchanged.
pub fn compose(parent: &Transform, child: &Transform) -> Transform {
    Transform {
        x: parent.x + child.x,
        y: parent.y + child.y,
        width: child.width,
        height: child.height,
        rotation: normalize_rotation(parent.rotation + child.rotation),
        flip_h: parent.flip_h ^ child.flip_h,
        flip_v: parent.flip_v ^ child.flip_v,
        child_offset: child.child_offset,
        child_extent: child.child_extent,
    }
}

/// Ancestor chain carried per work-stack entry. Group nesting deeper than
/// four levels is rare, so the chain usually stays on the stack.
pub type AncestorChain = SmallVec<[Transform; 4]>;

/// Resolve a leaf transform to absolute slide coordinates.
///
/// Walks `ancestors` from innermost to outermost (the chain is stored
/// outermost-first). For each ancestor the leaf position is translated
/// into the ancestor's child coordinate space, scaled by the ancestor's
/// rendered-size over child-extent ratio (zero extent guards to 1), then
/// offset by the ancestor's own position. Width and height scale by the
/// same per-axis factors. Rotation and flips accumulate through
/// [`compose`].
///
/// With no ancestors this is the identity, which is what makes
/// flattening idempotent: re-running the engine over already-flat output
/// changes nothing.
pub fn absolute_position(leaf: &Transform, ancestors: &[Transform]) -> Transform {
    let mut x = leaf.x as f64;
    let mut y = leaf.y as f64;
    let mut width = leaf.width as f64;
    let mut height = leaf.height as f64;
    let mut spin = *leaf;

    for ancestor in ancestors.iter().rev() {
        let (ch_x, ch_y) = ancestor.child_offset.unwrap_or((0, 0));
        let sx = ancestor.scale_x();
        let sy = ancestor.scale_y();

        x = ancestor.x as f64 + (x - ch_x as f64) * sx;
        y = ancestor.y as f64 + (y - ch_y as f64) * sy;
        width *= sx;
        height *= sy;
        spin = compose(ancestor, &spin);
    }

    Transform {
        x: x.round() as i64,
        y: y.round() as i64,
        width: width.round() as i64,
        height: height.round() as i64,
        rotation: spin.rotation,
        flip_h: spin.flip_h,
        flip_v: spin.flip_v,
        child_offset: None,
        child_extent: None,
    }
}

/// A leaf shape promoted to the top level with its absolute transform.
#[derive(Debug)]
pub struct FlatShape<'a> {
    /// The source leaf node (never a group)
    pub node: &'a ShapeNode,
    /// Absolute transform in EMU coordinates
    pub transform: Transform,
}

/// Flatten a shape tree into leaves with absolute transforms.
///
/// Document order is preserved: later shapes render on top. Group nodes
/// are removed; their descendants are promoted. The traversal uses an
/// explicit stack rather than recursion so arbitrarily deep trees use
/// bounded call-stack space, and each stack entry carries its own owned
/// ancestor chain (copied on push) so sibling branches never alias.
///
/// Shapes that flatten to zero width or height are still emitted; callers
/// decide whether degenerate geometry is meaningful (a near-zero height
/// with a long width is exactly how rendered connector lines look).
pub fn flatten(nodes: &[ShapeNode]) -> Vec<FlatShape<'_>> {
    let mut flat = Vec::new();
    // Stack is LIFO; push siblings in reverse so they pop in document order.
    let mut stack: Vec<(&ShapeNode, AncestorChain)> = Vec::with_capacity(nodes.len());
    for node in nodes.iter().rev() {
        stack.push((node, AncestorChain::new()));
    }

    while let Some((node, ancestors)) = stack.pop() {
        match node {
            ShapeNode::Group { common, children } => {
                for child in children.iter().rev() {
                    let mut chain = ancestors.clone();
                    chain.push(common.transform);
                    stack.push((child, chain));
                }
            },
            leaf => {
                let transform = absolute_position(leaf.transform(), &ancestors);
                flat.push(FlatShape {
                    node: leaf,
                    transform,
                });
            },
        }
    }

    flat
}
