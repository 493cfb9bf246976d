//! The style inheritance cascade.
//!
//! A run's effective style is assembled from up to seven levels, highest
//! precedence first: the run's own properties, the paragraph's default
//! run properties, the owning shape's list style at the paragraph's
//! nesting level, the matching layout placeholder's list style, the
//! master's per-category text style (falling back to level 1), the
//! theme's font scheme, and finally a fixed implementation default.
//!
//! Resolution is a pure function of its inputs; the per-slide memoization
//! of placeholder lookups lives in the normalizer, not here.

use crate::common::unit::size_units_to_pt;
use crate::common::{Error, RGBColor};
use crate::opc::part::XmlElement;
use crate::pptx::bullet::BulletInfo;
use crate::pptx::shapes::{MasterStyleCategory, Placeholder};
use crate::pptx::text::{Alignment, Baseline, CapsMode, ListStyle, ParaProps, Paragraph, RunProps};
use crate::pptx::theme::{ColorContext, FontScheme};
use serde::Serialize;

/// Fallback typeface when no cascade level and no theme supplies one.
pub const DEFAULT_FONT: &str = "Arial";
/// Fallback font size in points.
pub const DEFAULT_SIZE_PT: f64 = 16.0;

/// The master's three text-style sections (`p:txStyles`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterStyles {
    /// `titleStyle`
    pub title: ListStyle,
    /// `bodyStyle`
    pub body: ListStyle,
    /// `otherStyle`
    pub other: ListStyle,
}

impl MasterStyles {
    /// Parse from a slide-master part root.
    pub fn from_master(root: &XmlElement) -> MasterStyles {
        let styles = root.child("txStyles");
        let section = |name: &str| {
            styles
                .and_then(|s| s.child(name))
                .map(ListStyle::from_xml)
                .unwrap_or_default()
        };
        MasterStyles {
            title: section("titleStyle"),
            body: section("bodyStyle"),
            other: section("otherStyle"),
        }
    }

    /// The section governing a placeholder category.
    pub fn category(&self, category: MasterStyleCategory) -> &ListStyle {
        match category {
            MasterStyleCategory::Title => &self.title,
            MasterStyleCategory::Body => &self.body,
            MasterStyleCategory::Other => &self.other,
        }
    }
}

/// Inherited defaults contributed by the layout and master for one
/// placeholder at one nesting level. These are what the normalizer
/// memoizes: the same (placeholder, level) pair recurs for every run of
/// every shape of that placeholder type on a slide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceholderDefaults {
    /// Merged run defaults (layout over master)
    pub run: RunProps,
    /// Merged paragraph defaults (layout over master)
    pub para: ParaProps,
}

/// Everything the cascade needs for one shape's runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeStyleContext<'a> {
    /// The shape's placeholder reference, if any
    pub placeholder: Option<Placeholder>,
    /// The shape's own list style (from its `txBody`)
    pub shape_list_style: Option<&'a ListStyle>,
    /// List style of the matching layout placeholder
    pub layout_list_style: Option<&'a ListStyle>,
    /// The master's text-style sections
    pub master_styles: Option<&'a MasterStyles>,
    /// The theme's font scheme
    pub font_scheme: Option<&'a FontScheme>,
    /// Scheme-color resolution context
    pub colors: ColorContext<'a>,
}

/// A fully resolved run style, colors as `#RRGGBB` strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRunStyle {
    /// Effective typeface
    pub font_family: String,
    /// Effective size in points
    pub size_pt: f64,
    pub bold: bool,
    pub italic: bool,
    /// Effective color as `#RRGGBB`
    pub color: String,
    pub caps: CapsMode,
    pub baseline: Baseline,
}

impl ShapeStyleContext<'_> {
    /// Layout + master contribution for a nesting level.
    ///
    /// The layout is consulted only when the shape is a placeholder; the
    /// master's category section applies to every shape (non-placeholders
    /// fall under `otherStyle`). The master falls back to level 1 when
    /// the specific level is absent.
    pub fn placeholder_defaults(&self, level: usize) -> PlaceholderDefaults {
        let mut run = RunProps::default();
        let mut para = ParaProps::default();

        if self.placeholder.is_some() {
            if let Some(layout_level) = self.layout_list_style.and_then(|s| s.level(level)) {
                merge_level(&mut run, &mut para, layout_level);
            }
        }

        if let Some(master) = self.master_styles {
            let category = self
                .placeholder
                .map(|ph| ph.kind.master_style_category())
                .unwrap_or(MasterStyleCategory::Other);
            let section = master.category(category);
            if let Some(master_level) = section.level(level).or_else(|| section.level(0)) {
                merge_level(&mut run, &mut para, master_level);
            }
        }

        PlaceholderDefaults { run, para }
    }

    /// Resolve one run of one paragraph to its effective style.
    ///
    /// `inherited` is the (possibly memoized) output of
    /// [`Self::placeholder_defaults`] for the paragraph's level. Total:
    /// degradations are reported through `on_degraded` and a usable style
    /// is always returned.
    pub fn resolve_run(
        &self,
        run_props: &RunProps,
        paragraph: &Paragraph,
        inherited: &PlaceholderDefaults,
        mut on_degraded: impl FnMut(Error),
    ) -> ResolvedRunStyle {
        let mut merged = run_props.clone();
        // 2. paragraph default run properties
        if let Some(def) = &paragraph.props.def_run {
            merged.inherit_from(def);
        }
        // 3. owning shape's list style at this level
        if let Some(shape_level) = self
            .shape_list_style
            .and_then(|s| s.level(paragraph.level))
        {
            if let Some(def) = &shape_level.def_run {
                merged.inherit_from(def);
            }
        }
        // 4-5. layout placeholder and master category
        merged.inherit_from(&inherited.run);

        if merged == RunProps::default() {
            on_degraded(Error::MissingCascadeLevel(format!(
                "run at level {}",
                paragraph.level
            )));
        }

        // 6-7. theme fonts, then the fixed defaults
        let font_family = self.effective_font(merged.font.as_deref());
        let size_pt = merged
            .size
            .map(size_units_to_pt)
            .unwrap_or(DEFAULT_SIZE_PT);
        let color = match &merged.color {
            Some(spec) => spec.resolve(&self.colors, &mut on_degraded),
            None => RGBColor::BLACK,
        };
        let baseline = match merged.baseline {
            Some(v) if v > 0 => Baseline::Superscript,
            Some(v) if v < 0 => Baseline::Subscript,
            _ => Baseline::Normal,
        };

        ResolvedRunStyle {
            font_family,
            size_pt,
            bold: merged.bold.unwrap_or(false),
            italic: merged.italic.unwrap_or(false),
            color: color.to_string(),
            caps: merged.caps.unwrap_or(CapsMode::None),
            baseline,
        }
    }

    /// Effective paragraph alignment through the same level chain.
    pub fn resolve_alignment(
        &self,
        paragraph: &Paragraph,
        inherited: &PlaceholderDefaults,
    ) -> Alignment {
        let mut para = paragraph.props.clone();
        if let Some(shape_level) = self
            .shape_list_style
            .and_then(|s| s.level(paragraph.level))
        {
            para.inherit_from(shape_level);
        }
        para.inherit_from(&inherited.para);
        para.align.unwrap_or(Alignment::Left)
    }

    /// Resolve the paragraph's bullet.
    ///
    /// The bullet cascade is shorter than the property cascade: an
    /// explicit setting on the paragraph wins, else the owning shape's
    /// list style at the paragraph's level (falling back to level 1),
    /// else no bullet. Margins and indents follow the full paragraph
    /// chain and are converted to pixels here.
    pub fn resolve_bullet(
        &self,
        paragraph: &Paragraph,
        inherited: &PlaceholderDefaults,
        emu_per_px: f64,
    ) -> BulletInfo {
        let mut para = paragraph.props.clone();
        if let Some(shape_level) = self
            .shape_list_style
            .and_then(|s| s.level(paragraph.level))
        {
            para.inherit_from(shape_level);
        }
        para.inherit_from(&inherited.para);

        let margin_left = para.margin_left.unwrap_or(0) as f64 / emu_per_px;
        let indent = para.indent.unwrap_or(0) as f64 / emu_per_px;

        let bullet = paragraph.props.bullet.clone().or_else(|| {
            let style = self.shape_list_style?;
            style
                .level(paragraph.level)
                .and_then(|lvl| lvl.bullet.clone())
                .or_else(|| style.level(0).and_then(|lvl| lvl.bullet.clone()))
        });

        match bullet {
            Some(props) => BulletInfo::from_props(&props, paragraph.level, margin_left, indent),
            None => BulletInfo::none(paragraph.level, margin_left, indent),
        }
    }

    /// Translate the merged font value through the theme.
    ///
    /// Theme tokens (`+mj-lt`, ...) resolve by exact match; a missing
    /// font falls back to the theme's major or minor latin face by
    /// placeholder family, then to the fixed default.
    fn effective_font(&self, merged: Option<&str>) -> String {
        match merged {
            Some(token) if token.starts_with('+') => self
                .font_scheme
                .and_then(|fs| fs.lookup(token))
                .unwrap_or(DEFAULT_FONT)
                .to_string(),
            Some(typeface) => typeface.to_string(),
            None => {
                let major = self
                    .placeholder
                    .is_some_and(|ph| ph.kind.uses_major_font());
                self.font_scheme
                    .map(|fs| if major { &fs.major_latin } else { &fs.minor_latin })
                    .filter(|f| !f.is_empty())
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_FONT.to_string())
            },
        }
    }
}

fn merge_level(run: &mut RunProps, para: &mut ParaProps, level: &ParaProps) {
    if let Some(def) = &level.def_run {
        run.inherit_from(def);
    }
    para.inherit_from(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::bullet::{BulletKind, MarkerKind};
    use crate::pptx::shapes::PlaceholderKind;
    use crate::pptx::text::{Run, TextBody};
    use crate::pptx::theme::Theme;

    fn paragraph(level: usize, props: ParaProps) -> Paragraph {
        Paragraph {
            level,
            props,
            runs: vec![Run {
                text: "x".to_string(),
                props: RunProps::default(),
            }],
        }
    }

    fn body_placeholder() -> Option<Placeholder> {
        Some(Placeholder {
            kind: PlaceholderKind::Body,
            index: Some(1),
        })
    }

    fn layout_style(sz: i32) -> ListStyle {
        let xml = format!(
            r#"<lstStyle><lvl1pPr algn="just"><defRPr sz="{sz}"><latin typeface="Georgia"/></defRPr></lvl1pPr></lstStyle>"#
        );
        ListStyle::from_xml(&XmlElement::parse(xml.as_bytes()).unwrap())
    }

    #[test]
    fn test_paragraph_default_beats_layout_placeholder() {
        // Paragraph declares defRPr sz=1800; layout placeholder says 2400.
        // The paragraph wins: 18pt, not 24pt.
        let layout = layout_style(2400);
        let ctx = ShapeStyleContext {
            placeholder: body_placeholder(),
            layout_list_style: Some(&layout),
            ..ShapeStyleContext::default()
        };
        let para = paragraph(
            0,
            ParaProps {
                def_run: Some(RunProps {
                    size: Some(1800),
                    ..RunProps::default()
                }),
                ..ParaProps::default()
            },
        );
        let inherited = ctx.placeholder_defaults(0);
        let style = ctx.resolve_run(&para.runs[0].props, &para, &inherited, |_| {});
        assert_eq!(style.size_pt, 18.0);
        // Font still inherits from the layout, which the paragraph
        // left unset.
        assert_eq!(style.font_family, "Georgia");
    }

    #[test]
    fn test_explicit_run_beats_everything() {
        let layout = layout_style(2400);
        let ctx = ShapeStyleContext {
            placeholder: body_placeholder(),
            layout_list_style: Some(&layout),
            ..ShapeStyleContext::default()
        };
        let para = paragraph(0, ParaProps::default());
        let explicit = RunProps {
            size: Some(3600),
            bold: Some(true),
            ..RunProps::default()
        };
        let inherited = ctx.placeholder_defaults(0);
        let style = ctx.resolve_run(&explicit, &para, &inherited, |_| {});
        assert_eq!(style.size_pt, 36.0);
        assert!(style.bold);
    }

    #[test]
    fn test_master_level_fallback_to_level_one() {
        let master_xml = br#"<sldMaster><txStyles>
            <bodyStyle>
                <lvl1pPr><defRPr sz="2000"/></lvl1pPr>
            </bodyStyle>
        </txStyles></sldMaster>"#;
        let master = MasterStyles::from_master(&XmlElement::parse(master_xml).unwrap());
        let ctx = ShapeStyleContext {
            placeholder: body_placeholder(),
            master_styles: Some(&master),
            ..ShapeStyleContext::default()
        };
        // Level 4 is not declared; level 1 supplies the size.
        let para = paragraph(4, ParaProps::default());
        let inherited = ctx.placeholder_defaults(4);
        let style = ctx.resolve_run(&para.runs[0].props, &para, &inherited, |_| {});
        assert_eq!(style.size_pt, 20.0);
    }

    #[test]
    fn test_non_placeholder_uses_other_style() {
        let master_xml = br#"<sldMaster><txStyles>
            <titleStyle><lvl1pPr><defRPr sz="4400"/></lvl1pPr></titleStyle>
            <otherStyle><lvl1pPr><defRPr sz="1400"/></lvl1pPr></otherStyle>
        </txStyles></sldMaster>"#;
        let master = MasterStyles::from_master(&XmlElement::parse(master_xml).unwrap());
        let ctx = ShapeStyleContext {
            placeholder: None,
            master_styles: Some(&master),
            ..ShapeStyleContext::default()
        };
        let para = paragraph(0, ParaProps::default());
        let inherited = ctx.placeholder_defaults(0);
        let style = ctx.resolve_run(&para.runs[0].props, &para, &inherited, |_| {});
        assert_eq!(style.size_pt, 14.0);
    }

    #[test]
    fn test_theme_font_token_and_family_fallback() {
        let theme_xml = br#"<theme><themeElements>
            <fontScheme>
                <majorFont><latin typeface="Calibri Light"/></majorFont>
                <minorFont><latin typeface="Calibri"/></minorFont>
            </fontScheme>
        </themeElements></theme>"#;
        let theme = Theme::from_part(&XmlElement::parse(theme_xml).unwrap());

        // Explicit theme token resolves by exact match.
        let ctx = ShapeStyleContext {
            placeholder: body_placeholder(),
            font_scheme: Some(&theme.font_scheme),
            ..ShapeStyleContext::default()
        };
        let para = paragraph(0, ParaProps::default());
        let inherited = ctx.placeholder_defaults(0);
        let token = RunProps {
            font: Some("+mj-lt".to_string()),
            ..RunProps::default()
        };
        let style = ctx.resolve_run(&token, &para, &inherited, |_| {});
        assert_eq!(style.font_family, "Calibri Light");

        // No font anywhere: body placeholders take the minor face.
        let style = ctx.resolve_run(&RunProps::default(), &para, &inherited, |_| {});
        assert_eq!(style.font_family, "Calibri");

        // Title placeholders take the major face.
        let ctx = ShapeStyleContext {
            placeholder: Some(Placeholder {
                kind: PlaceholderKind::Title,
                index: None,
            }),
            font_scheme: Some(&theme.font_scheme),
            ..ShapeStyleContext::default()
        };
        let style = ctx.resolve_run(&RunProps::default(), &para, &inherited, |_| {});
        assert_eq!(style.font_family, "Calibri Light");
    }

    #[test]
    fn test_bare_context_yields_fixed_defaults() {
        let ctx = ShapeStyleContext::default();
        let para = paragraph(0, ParaProps::default());
        let inherited = ctx.placeholder_defaults(0);
        let mut degraded = Vec::new();
        let style = ctx.resolve_run(&para.runs[0].props, &para, &inherited, |e| degraded.push(e));

        assert_eq!(style.font_family, DEFAULT_FONT);
        assert_eq!(style.size_pt, DEFAULT_SIZE_PT);
        assert!(!style.bold && !style.italic);
        assert_eq!(style.color, "#000000");
        assert_eq!(style.caps, CapsMode::None);
        assert_eq!(style.baseline, Baseline::Normal);
        // The all-defaults fall-through is recorded
        assert!(matches!(degraded[0], Error::MissingCascadeLevel(_)));
    }

    #[test]
    fn test_baseline_sign() {
        let ctx = ShapeStyleContext::default();
        let para = paragraph(0, ParaProps::default());
        let inherited = ctx.placeholder_defaults(0);

        let sup = RunProps {
            baseline: Some(30_000),
            ..RunProps::default()
        };
        assert_eq!(
            ctx.resolve_run(&sup, &para, &inherited, |_| {}).baseline,
            Baseline::Superscript
        );
        let sub = RunProps {
            baseline: Some(-25_000),
            ..RunProps::default()
        };
        assert_eq!(
            ctx.resolve_run(&sub, &para, &inherited, |_| {}).baseline,
            Baseline::Subscript
        );
    }

    #[test]
    fn test_alignment_cascade() {
        let layout = layout_style(2400); // declares algn="just" at level 1
        let ctx = ShapeStyleContext {
            placeholder: body_placeholder(),
            layout_list_style: Some(&layout),
            ..ShapeStyleContext::default()
        };
        let inherited = ctx.placeholder_defaults(0);

        let para = paragraph(0, ParaProps::default());
        assert_eq!(ctx.resolve_alignment(&para, &inherited), Alignment::Justify);

        let para = paragraph(
            0,
            ParaProps {
                align: Some(Alignment::Center),
                ..ParaProps::default()
            },
        );
        assert_eq!(ctx.resolve_alignment(&para, &inherited), Alignment::Center);
    }

    #[test]
    fn test_bullet_shorter_cascade() {
        let body_xml = r#"<txBody>
            <lstStyle>
                <lvl1pPr marL="457200" indent="-457200"><buChar char="•"/></lvl1pPr>
            </lstStyle>
            <p><r><t>inherits the disc</t></r></p>
            <p><pPr><buNone/></pPr><r><t>explicitly none</t></r></p>
        </txBody>"#;
        let body = TextBody::from_xml(&XmlElement::parse(body_xml.as_bytes()).unwrap());
        let ctx = ShapeStyleContext {
            shape_list_style: Some(&body.list_style),
            ..ShapeStyleContext::default()
        };
        let inherited = ctx.placeholder_defaults(0);

        let bullet = ctx.resolve_bullet(&body.paragraphs[0], &inherited, 12_700.0);
        assert!(bullet.has_marker);
        assert_eq!(bullet.kind, BulletKind::Char);
        assert_eq!(bullet.marker, Some(MarkerKind::Disc));
        assert_eq!(bullet.margin_left, 36.0);
        assert_eq!(bullet.indent, -36.0);

        let none = ctx.resolve_bullet(&body.paragraphs[1], &inherited, 12_700.0);
        assert!(!none.has_marker);
        assert_eq!(none.kind, BulletKind::None);
    }
}
