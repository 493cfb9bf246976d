//! The document normalizer: per-slide resolution driver.
//!
//! The normalizer walks a slide's part chain (slide → layout → master →
//! theme), builds the inheritance context, flattens the shape tree, runs
//! the cascade for every run, and emits plain serializable records in
//! pixel coordinates. Slides are independent of each other: a document
//! resolves slide-parallel over a shared read-only context, and a failure
//! inside one slide never affects its siblings.

use crate::common::unit::{EMU_PER_PX_LEGACY, emu_to_px};
use crate::common::{Error, Result};
use crate::opc::cache::{PartCache, PartProvider};
use crate::opc::part::XmlElement;
use crate::opc::rel::{RT_SLIDE_LAYOUT, RT_SLIDE_MASTER, RT_THEME};
use crate::pptx::bullet::BulletInfo;
use crate::pptx::cascade::{MasterStyles, PlaceholderDefaults, ResolvedRunStyle, ShapeStyleContext};
use crate::pptx::shapes::{Placeholder, ShapeNode, shape_tree};
use crate::pptx::text::{Alignment, ListStyle};
use crate::pptx::theme::{ColorContext, ColorMap, Theme};
use crate::pptx::transform::{FlatShape, Transform, flatten};
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Per-job knobs.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// EMU-to-pixel divisor applied to all output coordinates.
    ///
    /// Defaults to the legacy point-per-pixel divisor; callers wanting
    /// OOXML-correct 96 DPI pass
    /// [`EMU_PER_PX_96DPI`](crate::common::unit::EMU_PER_PX_96DPI).
    pub emu_per_px: f64,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            emu_per_px: EMU_PER_PX_LEGACY,
        }
    }
}

/// Collector for degraded-but-continued resolution events.
///
/// Shared across slide workers; recording is cheap and each event is also
/// surfaced through the log facade so operators see degradations without
/// inspecting the collector.
#[derive(Default)]
pub struct Diagnostics {
    entries: Mutex<Vec<Error>>,
}

impl Diagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a degradation.
    pub fn record(&self, error: Error) {
        log::warn!("degraded: {error}");
        self.entries.lock().push(error);
    }

    /// Number of recorded degradations.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing degraded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drain the recorded degradations.
    pub fn take(&self) -> Vec<Error> {
        std::mem::take(&mut *self.entries.lock())
    }
}

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    fn from_transform(t: &Transform, emu_per_px: f64) -> PixelRect {
        PixelRect {
            x: emu_to_px(t.x, emu_per_px),
            y: emu_to_px(t.y, emu_per_px),
            width: emu_to_px(t.width, emu_per_px),
            height: emu_to_px(t.height, emu_per_px),
        }
    }
}

/// Which shape family a resolved record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolvedShapeKind {
    Text,
    Connector,
    Picture,
    Table,
    GraphicFrame,
}

/// One resolved run: text plus its effective style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRun {
    pub text: String,
    pub style: ResolvedRunStyle,
}

/// One resolved paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedParagraph {
    pub align: Alignment,
    pub bullet: BulletInfo,
    pub runs: Vec<ResolvedRun>,
}

/// One resolved shape in absolute pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedShape {
    pub kind: ResolvedShapeKind,
    pub name: String,
    pub frame: PixelRect,
    pub rotation_degrees: f64,
    pub flip_h: bool,
    pub flip_v: bool,
    /// Resolved solid fill as `#RRGGBB`, if the shape declared one
    pub fill: Option<String>,
    /// Package path of the image part, pictures only
    pub image: Option<String>,
    /// Resolved text, text shapes only
    pub paragraphs: Vec<ResolvedParagraph>,
}

/// One resolved slide, shapes in paint order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSlide {
    pub path: String,
    pub shapes: Vec<ResolvedShape>,
}

/// A layout placeholder's inheritable pieces, keyed by its reference.
struct LayoutPlaceholder {
    list_style: ListStyle,
    transform: Transform,
}

/// The resolution driver for one conversion job.
///
/// Owns the part cache and the cancellation flag; a `Resolver` is created
/// per job, never shared between jobs.
pub struct Resolver<P: PartProvider> {
    provider: P,
    cache: PartCache,
    options: ResolveOptions,
    cancel: AtomicBool,
}

impl<P: PartProvider> Resolver<P> {
    /// Create a resolver with default options.
    pub fn new(provider: P) -> Self {
        Self::with_options(provider, ResolveOptions::default())
    }

    /// Create a resolver with explicit options.
    pub fn with_options(provider: P, options: ResolveOptions) -> Self {
        Resolver {
            provider,
            cache: PartCache::new(),
            options,
            cancel: AtomicBool::new(false),
        }
    }

    /// Request cancellation. Slides already resolving run to completion;
    /// slides not yet scheduled resolve to [`Error::Cancelled`].
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Resolve every slide, in parallel, preserving input order.
    ///
    /// Per-slide failures stay per-slide: the output holds one `Result`
    /// per input path.
    pub fn resolve_all<S>(&self, paths: &[S], diagnostics: &Diagnostics) -> Vec<Result<ResolvedSlide>>
    where
        S: AsRef<str> + Sync,
    {
        paths
            .par_iter()
            .map(|path| self.resolve_slide(path.as_ref(), diagnostics))
            .collect()
    }

    /// Resolve a single slide part to absolute geometry and effective
    /// styles.
    ///
    /// # Errors
    ///
    /// [`Error::MissingLayout`] / [`Error::MissingMaster`] when the part
    /// chain is broken, [`Error::PartNotFound`] / [`Error::Xml`] when the
    /// slide itself is unreadable, [`Error::Cancelled`] after
    /// [`Self::cancel`]. Everything else degrades and is recorded on
    /// `diagnostics`.
    pub fn resolve_slide(&self, path: &str, diagnostics: &Diagnostics) -> Result<ResolvedSlide> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let slide = self.cache.part(&self.provider, path)?;
        let slide_rels = self.cache.rels_for(&self.provider, path);

        let layout_rel = slide_rels
            .first_of_type(RT_SLIDE_LAYOUT)
            .ok_or_else(|| Error::MissingLayout(path.to_string()))?;
        let layout_path = layout_rel.target().to_string();
        let layout = self
            .cache
            .part(&self.provider, &layout_path)
            .map_err(|_| Error::MissingLayout(path.to_string()))?;
        let layout_rels = self.cache.rels_for(&self.provider, &layout_path);

        let master_rel = layout_rels
            .first_of_type(RT_SLIDE_MASTER)
            .ok_or_else(|| Error::MissingMaster(layout_path.clone()))?;
        let master_path = master_rel.target().to_string();
        let master = self
            .cache
            .part(&self.provider, &master_path)
            .map_err(|_| Error::MissingMaster(layout_path.clone()))?;
        let master_rels = self.cache.rels_for(&self.provider, &master_path);

        // The theme is optional: colors degrade to black without one.
        let theme = match master_rels.first_of_type(RT_THEME) {
            Some(rel) => match self.cache.part(&self.provider, rel.target()) {
                Ok(root) => Some(Theme::from_part(&root)),
                Err(e) => {
                    diagnostics.record(e);
                    None
                },
            },
            None => None,
        };

        let master_map = master
            .child("clrMap")
            .map(ColorMap::from_xml)
            .unwrap_or_default();
        // A layout may override the master's map; an override element
        // deferring to the master (`masterClrMapping`) carries no mapping.
        let layout_map = layout
            .child("clrMapOvr")
            .and_then(|ovr| ovr.child("overrideClrMapping"))
            .map(ColorMap::from_xml);

        let master_styles = MasterStyles::from_master(&master);
        let layout_placeholders = collect_placeholders(&layout, diagnostics);

        let colors = ColorContext {
            layout_map: layout_map.as_ref(),
            master_map: Some(&master_map),
            scheme: theme.as_ref().map(|t| &t.color_scheme),
        };

        let shapes = shape_tree(&slide, |e| diagnostics.record(e));
        let flat = flatten(&shapes);

        // The same layout/master lookup repeats for every run of every
        // shape of one placeholder type; memoize it per slide.
        let mut memo: HashMap<(Option<Placeholder>, usize), PlaceholderDefaults> = HashMap::new();

        let resolved = flat
            .iter()
            .map(|f| {
                self.resolve_shape(
                    f,
                    &slide_rels,
                    &layout_placeholders,
                    &master_styles,
                    theme.as_ref(),
                    colors,
                    &mut memo,
                    diagnostics,
                )
            })
            .collect();

        Ok(ResolvedSlide {
            path: path.to_string(),
            shapes: resolved,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_shape(
        &self,
        flat: &FlatShape<'_>,
        slide_rels: &Arc<crate::opc::rel::Relationships>,
        layout_placeholders: &[(Placeholder, LayoutPlaceholder)],
        master_styles: &MasterStyles,
        theme: Option<&Theme>,
        colors: ColorContext<'_>,
        memo: &mut HashMap<(Option<Placeholder>, usize), PlaceholderDefaults>,
        diagnostics: &Diagnostics,
    ) -> ResolvedShape {
        let common = flat.node.common();
        let matched = common
            .placeholder
            .and_then(|ph| match_placeholder(layout_placeholders, ph));

        // Placeholders routinely carry no transform of their own and take
        // the layout placeholder's geometry.
        let transform = if common.placeholder.is_some() && flat.transform == Transform::ZERO {
            matched.map(|lp| lp.transform).unwrap_or(flat.transform)
        } else {
            flat.transform
        };

        let fill = common
            .fill
            .as_ref()
            .map(|spec| spec.resolve(&colors, |e| diagnostics.record(e)).to_string());

        let (kind, image, paragraphs) = match flat.node {
            ShapeNode::TextShape { text, .. } => {
                let ctx = ShapeStyleContext {
                    placeholder: common.placeholder,
                    shape_list_style: Some(&text.list_style),
                    layout_list_style: matched.map(|lp| &lp.list_style),
                    master_styles: Some(master_styles),
                    font_scheme: theme.map(|t| &t.font_scheme),
                    colors,
                };

                let mut paragraphs = Vec::with_capacity(text.paragraphs.len());
                for paragraph in &text.paragraphs {
                    let inherited = memo
                        .entry((common.placeholder, paragraph.level))
                        .or_insert_with(|| ctx.placeholder_defaults(paragraph.level))
                        .clone();

                    let runs = paragraph
                        .runs
                        .iter()
                        .map(|run| ResolvedRun {
                            text: run.text.clone(),
                            style: ctx.resolve_run(&run.props, paragraph, &inherited, |e| {
                                diagnostics.record(e)
                            }),
                        })
                        .collect();

                    paragraphs.push(ResolvedParagraph {
                        align: ctx.resolve_alignment(paragraph, &inherited),
                        bullet: ctx.resolve_bullet(paragraph, &inherited, self.options.emu_per_px),
                        runs,
                    });
                }
                (ResolvedShapeKind::Text, None, paragraphs)
            },
            ShapeNode::Picture { image_rel, .. } => {
                let image = image_rel.as_ref().and_then(|rid| match slide_rels.get(rid) {
                    Ok(rel) => Some(rel.target().to_string()),
                    Err(e) => {
                        diagnostics.record(e);
                        None
                    },
                });
                (ResolvedShapeKind::Picture, image, Vec::new())
            },
            ShapeNode::Connector { .. } => (ResolvedShapeKind::Connector, None, Vec::new()),
            ShapeNode::Table { .. } => (ResolvedShapeKind::Table, None, Vec::new()),
            ShapeNode::GraphicFrame { .. } => (ResolvedShapeKind::GraphicFrame, None, Vec::new()),
            // Flattening removed the groups.
            ShapeNode::Group { .. } => unreachable!("flatten() emits no groups"),
        };

        ResolvedShape {
            kind,
            name: common.name.clone(),
            frame: PixelRect::from_transform(&transform, self.options.emu_per_px),
            rotation_degrees: transform.rotation_degrees(),
            flip_h: transform.flip_h,
            flip_v: transform.flip_v,
            fill,
            image,
            paragraphs,
        }
    }
}

/// Gather the layout's placeholders, including any nested in groups.
fn collect_placeholders(
    layout: &XmlElement,
    diagnostics: &Diagnostics,
) -> Vec<(Placeholder, LayoutPlaceholder)> {
    let shapes = shape_tree(layout, |e| diagnostics.record(e));
    let mut out = Vec::new();
    let mut stack: Vec<&ShapeNode> = shapes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if let ShapeNode::Group { children, .. } = node {
            stack.extend(children.iter().rev());
            continue;
        }
        if let (Some(ph), Some(text)) = (node.common().placeholder, node.text_body()) {
            out.push((
                ph,
                LayoutPlaceholder {
                    list_style: text.list_style.clone(),
                    transform: node.common().transform,
                },
            ));
        }
    }
    out
}

/// Match a slide placeholder against the layout's: exact (type, index)
/// first, then same type with any index.
fn match_placeholder(
    layout_placeholders: &[(Placeholder, LayoutPlaceholder)],
    ph: Placeholder,
) -> Option<&LayoutPlaceholder> {
    layout_placeholders
        .iter()
        .find(|(candidate, _)| *candidate == ph)
        .or_else(|| {
            layout_placeholders
                .iter()
                .find(|(candidate, _)| candidate.kind == ph.kind)
        })
        .map(|(_, lp)| lp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::unit::EMU_PER_PX_96DPI;
    use crate::opc::cache::MemoryPackage;
    use crate::pptx::bullet::{BulletKind, MarkerKind};

    const SLIDE: &str = r#"<sld><cSld><spTree>
        <sp>
            <nvSpPr><cNvPr id="2" name="Title 1"/>
                <nvPr><ph type="ctrTitle"/></nvPr></nvSpPr>
            <spPr/>
            <txBody><p><r><t>Big Heading</t></r></p></txBody>
        </sp>
        <sp>
            <nvSpPr><cNvPr id="3" name="Content 2"/>
                <nvPr><ph type="body" idx="1"/></nvPr></nvSpPr>
            <spPr/>
            <txBody>
                <p><pPr><defRPr sz="1800"/></pPr><r><t>First bullet</t></r></p>
                <p><pPr lvl="1"/><r><t>Nested</t></r></p>
            </txBody>
        </sp>
        <sp>
            <nvSpPr><cNvPr id="4" name="Badge"/></nvSpPr>
            <spPr>
                <xfrm><off x="1270000" y="2540000"/><ext cx="127000" cy="127000"/></xfrm>
                <solidFill><srgbClr val="FF9900"/></solidFill>
            </spPr>
            <txBody><p><r><t>plain</t></r></p></txBody>
        </sp>
        <pic>
            <nvPicPr><cNvPr id="5" name="Logo"/></nvPicPr>
            <blipFill><blip embed="rId2"/></blipFill>
            <spPr><xfrm><off x="0" y="0"/><ext cx="12700" cy="12700"/></xfrm></spPr>
        </pic>
    </spTree></cSld></sld>"#;

    const SLIDE_RELS: &str = r#"<Relationships>
        <Relationship Id="rId1" Type="http://x/relationships/slideLayout"
            Target="../slideLayouts/slideLayout1.xml"/>
        <Relationship Id="rId2" Type="http://x/relationships/image"
            Target="../media/image1.png"/>
    </Relationships>"#;

    const LAYOUT: &str = r#"<sldLayout><cSld><spTree>
        <sp>
            <nvSpPr><cNvPr id="2" name="Title Placeholder"/>
                <nvPr><ph type="ctrTitle"/></nvPr></nvSpPr>
            <spPr><xfrm><off x="914400" y="457200"/><ext cx="7315200" cy="1143000"/></xfrm></spPr>
            <txBody>
                <lstStyle><lvl1pPr algn="ctr"><defRPr sz="4400"/></lvl1pPr></lstStyle>
            </txBody>
        </sp>
        <sp>
            <nvSpPr><cNvPr id="3" name="Content Placeholder"/>
                <nvPr><ph type="body" idx="1"/></nvPr></nvSpPr>
            <spPr><xfrm><off x="914400" y="1828800"/><ext cx="7315200" cy="3657600"/></xfrm></spPr>
            <txBody>
                <lstStyle>
                    <lvl1pPr marL="342900" indent="-342900"><buChar char="•"/><defRPr sz="2400"/></lvl1pPr>
                    <lvl2pPr marL="742950" indent="-285750"><buChar char="–"/><defRPr sz="2000"/></lvl2pPr>
                </lstStyle>
            </txBody>
        </sp>
    </spTree></cSld></sldLayout>"#;

    const LAYOUT_RELS: &str = r#"<Relationships>
        <Relationship Id="rId1" Type="http://x/relationships/slideMaster"
            Target="../slideMasters/slideMaster1.xml"/>
    </Relationships>"#;

    const MASTER: &str = r#"<sldMaster>
        <cSld><spTree/></cSld>
        <clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2"/>
        <txStyles>
            <titleStyle>
                <lvl1pPr><defRPr sz="4000"><solidFill><schemeClr val="tx2"/></solidFill></defRPr></lvl1pPr>
            </titleStyle>
            <bodyStyle>
                <lvl1pPr><defRPr sz="2000"><solidFill><schemeClr val="tx1"/></solidFill></defRPr></lvl1pPr>
            </bodyStyle>
            <otherStyle>
                <lvl1pPr><defRPr sz="1400"/></lvl1pPr>
            </otherStyle>
        </txStyles>
    </sldMaster>"#;

    const MASTER_RELS: &str = r#"<Relationships>
        <Relationship Id="rId1" Type="http://x/relationships/theme"
            Target="../theme/theme1.xml"/>
    </Relationships>"#;

    const THEME: &str = r#"<theme name="Office"><themeElements>
        <clrScheme name="Office">
            <dk1><srgbClr val="000000"/></dk1>
            <lt1><srgbClr val="FFFFFF"/></lt1>
            <dk2><srgbClr val="44546A"/></dk2>
            <lt2><srgbClr val="E7E6E6"/></lt2>
            <accent1><srgbClr val="4472C4"/></accent1>
            <accent2><srgbClr val="ED7D31"/></accent2>
            <accent3><srgbClr val="A5A5A5"/></accent3>
            <accent4><srgbClr val="FFC000"/></accent4>
            <accent5><srgbClr val="5B9BD5"/></accent5>
            <accent6><srgbClr val="70AD47"/></accent6>
            <hlink><srgbClr val="0563C1"/></hlink>
            <folHlink><srgbClr val="954F72"/></folHlink>
        </clrScheme>
        <fontScheme name="Office">
            <majorFont><latin typeface="Calibri Light"/></majorFont>
            <minorFont><latin typeface="Calibri"/></minorFont>
        </fontScheme>
    </themeElements></theme>"#;

    fn package() -> MemoryPackage {
        let mut pkg = MemoryPackage::new();
        pkg.insert("ppt/slides/slide1.xml", SLIDE.as_bytes().to_vec());
        pkg.insert("ppt/slides/_rels/slide1.xml.rels", SLIDE_RELS.as_bytes().to_vec());
        pkg.insert("ppt/slideLayouts/slideLayout1.xml", LAYOUT.as_bytes().to_vec());
        pkg.insert(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            LAYOUT_RELS.as_bytes().to_vec(),
        );
        pkg.insert("ppt/slideMasters/slideMaster1.xml", MASTER.as_bytes().to_vec());
        pkg.insert(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            MASTER_RELS.as_bytes().to_vec(),
        );
        pkg.insert("ppt/theme/theme1.xml", THEME.as_bytes().to_vec());
        pkg
    }

    fn resolve_one() -> (ResolvedSlide, Diagnostics) {
        let diagnostics = Diagnostics::new();
        let resolver = Resolver::new(package());
        let slide = resolver
            .resolve_slide("ppt/slides/slide1.xml", &diagnostics)
            .unwrap();
        (slide, diagnostics)
    }

    #[test]
    fn test_title_inherits_layout_geometry_and_master_color() {
        let (slide, _) = resolve_one();
        let title = &slide.shapes[0];
        assert_eq!(title.kind, ResolvedShapeKind::Text);
        // No xfrm on the slide placeholder: geometry comes from the
        // layout, converted at the legacy point-per-pixel divisor.
        assert_eq!(title.frame.x, 72.0);
        assert_eq!(title.frame.y, 36.0);
        assert_eq!(title.frame.width, 576.0);

        let run = &title.paragraphs[0].runs[0];
        assert_eq!(run.text, "Big Heading");
        // Size from the layout placeholder (44), not the master (40);
        // color from the master's titleStyle: tx2 maps to dk2.
        assert_eq!(run.style.size_pt, 44.0);
        assert_eq!(run.style.color, "#44546A");
        // Title-family placeholders take the theme's major font.
        assert_eq!(run.style.font_family, "Calibri Light");
        // Alignment from the layout's level-1 style.
        assert_eq!(title.paragraphs[0].align, Alignment::Center);
    }

    #[test]
    fn test_paragraph_default_beats_layout_size() {
        let (slide, _) = resolve_one();
        let body = &slide.shapes[1];
        let run = &body.paragraphs[0].runs[0];
        // defRPr sz=1800 on the paragraph wins over the layout's 2400.
        assert_eq!(run.style.size_pt, 18.0);
        assert_eq!(run.style.color, "#000000");
        assert_eq!(run.style.font_family, "Calibri");

        // The nested paragraph has no local size: layout level 2 applies.
        let nested = &body.paragraphs[1].runs[0];
        assert_eq!(nested.style.size_pt, 20.0);
    }

    #[test]
    fn test_bullets_inherit_from_shape_level_one() {
        let (slide, _) = resolve_one();
        let body = &slide.shapes[1];
        // The shape has no own lstStyle; layout bullets do not flow
        // through the shape-level-1 path, so the paragraph has no marker.
        let bullet = &body.paragraphs[0].bullet;
        assert_eq!(bullet.kind, BulletKind::None);

        // An explicit buChar on a plain shape classifies its glyph.
        let pkg = {
            let mut pkg = package();
            pkg.insert(
                "ppt/slides/slide1.xml",
                r#"<sld><cSld><spTree><sp>
                    <nvSpPr><cNvPr id="2" name="List"/></nvSpPr><spPr/>
                    <txBody>
                        <lstStyle><lvl1pPr marL="457200"><buChar char="•"/></lvl1pPr></lstStyle>
                        <p><r><t>item</t></r></p>
                    </txBody>
                </sp></spTree></cSld></sld>"#
                    .as_bytes()
                    .to_vec(),
            );
            pkg
        };
        let diagnostics = Diagnostics::new();
        let resolver = Resolver::new(pkg);
        let slide = resolver
            .resolve_slide("ppt/slides/slide1.xml", &diagnostics)
            .unwrap();
        let bullet = &slide.shapes[0].paragraphs[0].bullet;
        assert!(bullet.has_marker);
        assert_eq!(bullet.marker, Some(MarkerKind::Disc));
        assert_eq!(bullet.margin_left, 36.0);
    }

    #[test]
    fn test_plain_shape_fill_and_frame() {
        let (slide, diagnostics) = resolve_one();
        let badge = &slide.shapes[2];
        assert_eq!(badge.fill.as_deref(), Some("#FF9900"));
        assert_eq!(badge.frame.x, 100.0);
        assert_eq!(badge.frame.y, 200.0);
        assert_eq!(badge.frame.width, 10.0);
        // Non-placeholder text falls under the master's otherStyle.
        assert_eq!(badge.paragraphs[0].runs[0].style.size_pt, 14.0);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_picture_image_path_resolved() {
        let (slide, _) = resolve_one();
        let logo = &slide.shapes[3];
        assert_eq!(logo.kind, ResolvedShapeKind::Picture);
        assert_eq!(logo.image.as_deref(), Some("ppt/media/image1.png"));
        assert_eq!(logo.frame.width, 1.0);
    }

    #[test]
    fn test_dpi_divisor_option() {
        let diagnostics = Diagnostics::new();
        let resolver = Resolver::with_options(
            package(),
            ResolveOptions {
                emu_per_px: EMU_PER_PX_96DPI,
            },
        );
        let slide = resolver
            .resolve_slide("ppt/slides/slide1.xml", &diagnostics)
            .unwrap();
        // 914,400 EMUs is one inch: 96 pixels under the 96 DPI divisor.
        assert_eq!(slide.shapes[0].frame.x, 96.0);
    }

    #[test]
    fn test_missing_layout_fails_only_that_slide() {
        let mut pkg = package();
        pkg.insert("ppt/slides/slide2.xml", SLIDE.as_bytes().to_vec());
        // slide2 has no relationship manifest, so no layout.

        let diagnostics = Diagnostics::new();
        let resolver = Resolver::new(pkg);
        let results = resolver.resolve_all(
            &["ppt/slides/slide1.xml", "ppt/slides/slide2.xml"],
            &diagnostics,
        );
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::MissingLayout(_))));
    }

    #[test]
    fn test_missing_theme_degrades_to_black() {
        let mut pkg = package();
        // Point the master at a theme part that does not exist.
        pkg.insert(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            br#"<Relationships>
                <Relationship Id="rId1" Type="http://x/relationships/theme"
                    Target="../theme/missing.xml"/>
            </Relationships>"#
                .to_vec(),
        );

        let diagnostics = Diagnostics::new();
        let resolver = Resolver::new(pkg);
        let slide = resolver
            .resolve_slide("ppt/slides/slide1.xml", &diagnostics)
            .unwrap();
        // Scheme colors fall back to black; the slide still resolves.
        let run = &slide.shapes[0].paragraphs[0].runs[0];
        assert_eq!(run.style.color, "#000000");
        assert_eq!(run.style.font_family, "Arial");
        let recorded = diagnostics.take();
        assert!(matches!(recorded[0], Error::PartNotFound(_)));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_cancellation_skips_unscheduled_slides() {
        let diagnostics = Diagnostics::new();
        let resolver = Resolver::new(package());
        resolver.cancel();
        let results = resolver.resolve_all(&["ppt/slides/slide1.xml"], &diagnostics);
        assert!(matches!(results[0], Err(Error::Cancelled)));
    }

    #[test]
    fn test_parallel_resolution_is_order_stable() {
        let mut pkg = package();
        for n in 2..=6 {
            pkg.insert(format!("ppt/slides/slide{n}.xml"), SLIDE.as_bytes().to_vec());
            pkg.insert(
                format!("ppt/slides/_rels/slide{n}.xml.rels"),
                SLIDE_RELS.as_bytes().to_vec(),
            );
        }
        let paths: Vec<String> = (1..=6)
            .map(|n| format!("ppt/slides/slide{n}.xml"))
            .collect();

        let diagnostics = Diagnostics::new();
        let resolver = Resolver::new(pkg);
        let results = resolver.resolve_all(&paths, &diagnostics);
        assert_eq!(results.len(), 6);
        for (path, result) in paths.iter().zip(&results) {
            let slide = result.as_ref().unwrap();
            assert_eq!(&slide.path, path);
            assert_eq!(slide.shapes.len(), 4);
        }
    }
}
