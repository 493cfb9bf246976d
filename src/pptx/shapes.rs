//! Shape tree model and its construction from a slide part.
//!
//! Shapes are a closed sum over the six DrawingML shape elements; the
//! flattening and cascade resolvers match exhaustively over the variants,
//! which is what keeps "group handled everywhere groups matter" a
//! compile-time guarantee instead of a runtime hope.

use crate::common::Error;
use crate::opc::part::XmlElement;
use crate::pptx::text::TextBody;
use crate::pptx::theme::ColorSpec;
use crate::pptx::transform::Transform;
use serde::Serialize;

/// Placeholder type as written in `<p:ph type="..."/>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlaceholderKind {
    Title,
    CenterTitle,
    SubTitle,
    Body,
    Object,
    DateTime,
    Footer,
    SlideNumber,
    Picture,
    Table,
    Chart,
    Media,
    ClipArt,
    Diagram,
    /// Any other declared type
    Other,
}

impl PlaceholderKind {
    fn from_attr(value: &str) -> PlaceholderKind {
        match value {
            "title" => PlaceholderKind::Title,
            "ctrTitle" => PlaceholderKind::CenterTitle,
            "subTitle" => PlaceholderKind::SubTitle,
            "body" => PlaceholderKind::Body,
            "obj" => PlaceholderKind::Object,
            "dt" => PlaceholderKind::DateTime,
            "ftr" => PlaceholderKind::Footer,
            "sldNum" => PlaceholderKind::SlideNumber,
            "pic" => PlaceholderKind::Picture,
            "tbl" => PlaceholderKind::Table,
            "chart" => PlaceholderKind::Chart,
            "media" => PlaceholderKind::Media,
            "clipArt" => PlaceholderKind::ClipArt,
            "dgm" => PlaceholderKind::Diagram,
            _ => PlaceholderKind::Other,
        }
    }

    /// Which master text-style section governs this placeholder:
    /// titles use `titleStyle`, body-family placeholders `bodyStyle`,
    /// everything else `otherStyle`.
    pub fn master_style_category(self) -> MasterStyleCategory {
        match self {
            PlaceholderKind::Title | PlaceholderKind::CenterTitle => MasterStyleCategory::Title,
            PlaceholderKind::Body | PlaceholderKind::SubTitle | PlaceholderKind::Object => {
                MasterStyleCategory::Body
            },
            _ => MasterStyleCategory::Other,
        }
    }

    /// Title-family placeholders take the theme's major font; everything
    /// else takes the minor font.
    pub fn uses_major_font(self) -> bool {
        matches!(self, PlaceholderKind::Title | PlaceholderKind::CenterTitle)
    }
}

/// The master's three text-style sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MasterStyleCategory {
    Title,
    Body,
    Other,
}

/// A shape's placeholder reference: type plus optional index.
///
/// The pair is the inheritance key: a slide placeholder inherits from the
/// layout placeholder with the same type and index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placeholder {
    /// Placeholder type
    pub kind: PlaceholderKind,
    /// Placeholder index (`idx`)
    pub index: Option<u32>,
}

/// Properties shared by every shape variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCommon {
    /// Shape name from `cNvPr`
    pub name: String,
    /// The shape's own transform (not yet flattened)
    pub transform: Transform,
    /// Placeholder reference, if the shape is a placeholder
    pub placeholder: Option<Placeholder>,
    /// Explicit solid fill, if declared
    pub fill: Option<ColorSpec>,
}

/// A node of the slide shape tree.
///
/// Groups own their children exclusively; children are expressed in the
/// group's child coordinate space until flattened.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeNode {
    /// A text-bearing shape (`p:sp`)
    TextShape {
        common: ShapeCommon,
        text: TextBody,
    },
    /// A connector (`p:cxnSp`)
    Connector { common: ShapeCommon },
    /// A picture (`p:pic`)
    Picture {
        common: ShapeCommon,
        /// Relationship id of the image part
        image_rel: Option<String>,
    },
    /// A group (`p:grpSp`)
    Group {
        common: ShapeCommon,
        children: Vec<ShapeNode>,
    },
    /// A graphic frame holding a table (`p:graphicFrame` with `a:tbl`)
    Table { common: ShapeCommon },
    /// Any other graphic frame (charts, diagrams, embedded objects)
    GraphicFrame { common: ShapeCommon },
}

impl ShapeNode {
    /// The variant-independent common properties.
    pub fn common(&self) -> &ShapeCommon {
        match self {
            ShapeNode::TextShape { common, .. }
            | ShapeNode::Connector { common }
            | ShapeNode::Picture { common, .. }
            | ShapeNode::Group { common, .. }
            | ShapeNode::Table { common }
            | ShapeNode::GraphicFrame { common } => common,
        }
    }

    /// The shape's own (unflattened) transform.
    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.common().transform
    }

    /// The text body, for text-bearing variants.
    pub fn text_body(&self) -> Option<&TextBody> {
        match self {
            ShapeNode::TextShape { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Build the shape tree from a slide-ish part (slide, layout, or master).
///
/// Walks `cSld/spTree` in document order. Unknown elements are skipped;
/// shapes with missing or unparseable transforms get the zero transform
/// and the degradation is reported through `on_degraded` rather than
/// failing the slide.
pub fn shape_tree(root: &XmlElement, mut on_degraded: impl FnMut(Error)) -> Vec<ShapeNode> {
    let Some(sp_tree) = root.child("cSld").and_then(|c| c.child("spTree")) else {
        return Vec::new();
    };
    children_of(sp_tree, &mut on_degraded)
}

fn children_of(parent: &XmlElement, on_degraded: &mut impl FnMut(Error)) -> Vec<ShapeNode> {
    let mut shapes = Vec::new();
    for child in parent.children() {
        let node = match child.name() {
            "sp" => Some(text_shape(child, on_degraded)),
            "cxnSp" => Some(ShapeNode::Connector {
                common: common_props(child, on_degraded),
            }),
            "pic" => Some(picture(child, on_degraded)),
            "grpSp" => Some(group(child, on_degraded)),
            "graphicFrame" => Some(graphic_frame(child, on_degraded)),
            _ => None,
        };
        if let Some(node) = node {
            shapes.push(node);
        }
    }
    shapes
}

fn text_shape(sp: &XmlElement, on_degraded: &mut impl FnMut(Error)) -> ShapeNode {
    let text = sp
        .child("txBody")
        .map(TextBody::from_xml)
        .unwrap_or_default();
    ShapeNode::TextShape {
        common: common_props(sp, on_degraded),
        text,
    }
}

fn picture(pic: &XmlElement, on_degraded: &mut impl FnMut(Error)) -> ShapeNode {
    let image_rel = pic
        .child("blipFill")
        .and_then(|f| f.child("blip"))
        .and_then(|b| b.attr("embed"))
        .map(str::to_string);
    ShapeNode::Picture {
        common: common_props(pic, on_degraded),
        image_rel,
    }
}

fn group(grp: &XmlElement, on_degraded: &mut impl FnMut(Error)) -> ShapeNode {
    ShapeNode::Group {
        common: common_props(grp, on_degraded),
        children: children_of(grp, on_degraded),
    }
}

fn graphic_frame(frame: &XmlElement, on_degraded: &mut impl FnMut(Error)) -> ShapeNode {
    let common = common_props(frame, on_degraded);
    // Tables are the one graphic payload this core resolves geometry for
    // by name; everything else stays an opaque frame.
    if frame.descendant("tbl").is_some() {
        ShapeNode::Table { common }
    } else {
        ShapeNode::GraphicFrame { common }
    }
}

/// Extract the properties every variant shares.
///
/// The transform lives under `spPr/xfrm` for plain shapes,
/// `grpSpPr/xfrm` for groups, and directly under `xfrm` for graphic
/// frames.
fn common_props(shape: &XmlElement, on_degraded: &mut impl FnMut(Error)) -> ShapeCommon {
    // The shape's own non-visual block (nvSpPr, nvGrpSpPr, ...). Scoped
    // lookups matter for groups: a bare descendant search would pick up
    // a child shape's cNvPr or ph.
    let nv_pr = shape
        .children()
        .iter()
        .find(|c| c.name().starts_with("nv") && c.name().ends_with("Pr"));

    let name = nv_pr
        .and_then(|nv| nv.descendant("cNvPr"))
        .and_then(|p| p.attr("name"))
        .unwrap_or_default()
        .to_string();

    let placeholder = nv_pr.and_then(|nv| nv.descendant("ph")).map(|ph| Placeholder {
        kind: ph
            .attr("type")
            .map(PlaceholderKind::from_attr)
            // A ph with no type attribute is a body placeholder
            .unwrap_or(PlaceholderKind::Body),
        index: ph.attr_u32("idx"),
    });

    let sp_pr = shape.child("spPr").or_else(|| shape.child("grpSpPr"));
    let xfrm = sp_pr
        .and_then(|pr| pr.child("xfrm"))
        .or_else(|| shape.child("xfrm"));
    let transform = match xfrm {
        Some(el) => Transform::from_xfrm(el),
        None => {
            // Placeholders routinely omit their transform and take the
            // layout's; everything else defaulting to zero is a
            // degradation worth recording.
            if placeholder.is_none() {
                on_degraded(Error::MalformedTransform(name.clone()));
            }
            Transform::ZERO
        },
    };

    let fill = sp_pr
        .and_then(|pr| pr.child("solidFill"))
        .and_then(ColorSpec::from_xml);

    ShapeCommon {
        name,
        transform,
        placeholder,
        fill,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE_XML: &str = r#"<p:sld xmlns:p="ns" xmlns:a="ns2" xmlns:r="ns3">
      <p:cSld><p:spTree>
        <p:sp>
          <p:nvSpPr><p:cNvPr id="2" name="Title 1"/>
            <p:nvPr><p:ph type="ctrTitle"/></p:nvPr></p:nvSpPr>
          <p:spPr/>
          <p:txBody><a:p><a:r><a:t>Hello</a:t></a:r></a:p></p:txBody>
        </p:sp>
        <p:grpSp>
          <p:nvGrpSpPr><p:cNvPr id="5" name="Group 4"/></p:nvGrpSpPr>
          <p:grpSpPr><a:xfrm>
            <a:off x="100" y="100"/><a:ext cx="200" cy="200"/>
            <a:chOff x="0" y="0"/><a:chExt cx="100" cy="100"/>
          </a:xfrm></p:grpSpPr>
          <p:cxnSp>
            <p:nvCxnSpPr><p:cNvPr id="6" name="Connector 5"/></p:nvCxnSpPr>
            <p:spPr><a:xfrm><a:off x="10" y="10"/><a:ext cx="50" cy="0"/></a:xfrm>
              <a:solidFill><a:schemeClr val="accent2"/></a:solidFill>
            </p:spPr>
          </p:cxnSp>
        </p:grpSp>
        <p:pic>
          <p:nvPicPr><p:cNvPr id="7" name="Picture 6"/></p:nvPicPr>
          <p:blipFill><a:blip r:embed="rId4"/></p:blipFill>
          <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="10" cy="10"/></a:xfrm></p:spPr>
        </p:pic>
        <p:graphicFrame>
          <p:nvGraphicFramePr><p:cNvPr id="8" name="Table 7"/></p:nvGraphicFramePr>
          <p:xfrm><a:off x="1" y="2"/><a:ext cx="3" cy="4"/></p:xfrm>
          <a:graphic><a:graphicData><a:tbl/></a:graphicData></a:graphic>
        </p:graphicFrame>
      </p:spTree></p:cSld>
    </p:sld>"#;

    fn parse_tree() -> (Vec<ShapeNode>, Vec<Error>) {
        let root = XmlElement::parse(SLIDE_XML.as_bytes()).unwrap();
        let mut degraded = Vec::new();
        let shapes = shape_tree(&root, |e| degraded.push(e));
        (shapes, degraded)
    }

    #[test]
    fn test_variants_and_order() {
        let (shapes, _) = parse_tree();
        assert_eq!(shapes.len(), 4);
        assert!(matches!(shapes[0], ShapeNode::TextShape { .. }));
        assert!(matches!(shapes[1], ShapeNode::Group { .. }));
        assert!(matches!(shapes[2], ShapeNode::Picture { .. }));
        assert!(matches!(shapes[3], ShapeNode::Table { .. }));
    }

    #[test]
    fn test_placeholder_reference() {
        let (shapes, _) = parse_tree();
        let ph = shapes[0].common().placeholder.unwrap();
        assert_eq!(ph.kind, PlaceholderKind::CenterTitle);
        assert_eq!(ph.index, None);
        assert!(ph.kind.uses_major_font());
        assert_eq!(ph.kind.master_style_category(), MasterStyleCategory::Title);
        assert_eq!(
            PlaceholderKind::SubTitle.master_style_category(),
            MasterStyleCategory::Body
        );
        assert_eq!(
            PlaceholderKind::Footer.master_style_category(),
            MasterStyleCategory::Other
        );
    }

    #[test]
    fn test_group_owns_children_in_child_space() {
        let (shapes, _) = parse_tree();
        let ShapeNode::Group { common, children } = &shapes[1] else {
            panic!("expected group");
        };
        assert_eq!(common.transform.child_extent, Some((100, 100)));
        assert_eq!(children.len(), 1);
        // Child keeps its local coordinates until flattening
        assert_eq!(children[0].transform().x, 10);
        assert!(children[0].common().fill.is_some());
    }

    #[test]
    fn test_picture_rel_and_frame_table() {
        let (shapes, _) = parse_tree();
        let ShapeNode::Picture { image_rel, .. } = &shapes[2] else {
            panic!("expected picture");
        };
        assert_eq!(image_rel.as_deref(), Some("rId4"));
        // graphicFrame xfrm sits directly on the frame
        assert_eq!(shapes[3].transform().x, 1);
    }

    #[test]
    fn test_placeholder_missing_transform_is_not_degraded() {
        let (shapes, degraded) = parse_tree();
        // The title omits its xfrm but is a placeholder, so no report.
        assert_eq!(shapes[0].common().transform, Transform::ZERO);
        assert!(degraded.is_empty());
    }

    #[test]
    fn test_missing_transform_on_plain_shape_is_recorded() {
        let xml = br#"<sld><cSld><spTree>
            <sp><nvSpPr><cNvPr id="1" name="Naked"/></nvSpPr><spPr/></sp>
        </spTree></cSld></sld>"#;
        let root = XmlElement::parse(xml).unwrap();
        let mut degraded = Vec::new();
        let shapes = shape_tree(&root, |e| degraded.push(e));
        assert_eq!(shapes[0].common().transform, Transform::ZERO);
        assert!(matches!(&degraded[0], Error::MalformedTransform(name) if name == "Naked"));
    }

    #[test]
    fn test_empty_tree() {
        let root = XmlElement::parse(b"<sld><cSld/></sld>").unwrap();
        assert!(shape_tree(&root, |_| {}).is_empty());
    }
}
