//! Theme parts, color schemes, color maps, and scheme-color resolution.
//!
//! A theme carries the presentation's 12-slot color scheme and its
//! major/minor font pairs. Slides never reference scheme slots directly:
//! they use semantic tokens (`tx1`, `bg1`, `accent3`, ...) that the active
//! master's color map translates to slots, with an optional per-layout
//! override consulted first.

use crate::common::unit::percent_to_fraction;
use crate::common::{ColorModifiers, Error, RGBColor, Result};
use crate::opc::part::XmlElement;

/// The 12 named slots of a theme color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemeSlot {
    Dk1,
    Lt1,
    Dk2,
    Lt2,
    Accent1,
    Accent2,
    Accent3,
    Accent4,
    Accent5,
    Accent6,
    Hlink,
    FolHlink,
}

impl SchemeSlot {
    /// Parse a slot from its scheme element name.
    pub fn from_name(name: &str) -> Option<SchemeSlot> {
        Some(match name {
            "dk1" => SchemeSlot::Dk1,
            "lt1" => SchemeSlot::Lt1,
            "dk2" => SchemeSlot::Dk2,
            "lt2" => SchemeSlot::Lt2,
            "accent1" => SchemeSlot::Accent1,
            "accent2" => SchemeSlot::Accent2,
            "accent3" => SchemeSlot::Accent3,
            "accent4" => SchemeSlot::Accent4,
            "accent5" => SchemeSlot::Accent5,
            "accent6" => SchemeSlot::Accent6,
            "hlink" => SchemeSlot::Hlink,
            "folHlink" => SchemeSlot::FolHlink,
            _ => return None,
        })
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// A theme's 12-slot color scheme. Immutable; owned by the theme part.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    slots: [RGBColor; 12],
}

impl ColorScheme {
    /// RGB value of a slot.
    #[inline]
    pub fn color(&self, slot: SchemeSlot) -> RGBColor {
        self.slots[slot.index()]
    }

    /// Parse from a `clrScheme` element.
    ///
    /// Each slot holds either an `srgbClr` or a `sysClr` child. A system
    /// color uses its `lastClr` snapshot when present (the live system
    /// value is unknowable here); slots that resolve to nothing stay
    /// black.
    pub fn from_xml(clr_scheme: &XmlElement) -> ColorScheme {
        let mut slots = [RGBColor::BLACK; 12];
        for child in clr_scheme.children() {
            let Some(slot) = SchemeSlot::from_name(child.name()) else {
                continue;
            };
            if let Some(color) = scheme_entry_color(child) {
                slots[slot.index()] = color;
            }
        }
        ColorScheme { slots }
    }
}

fn scheme_entry_color(entry: &XmlElement) -> Option<RGBColor> {
    if let Some(srgb) = entry.child("srgbClr") {
        return srgb.attr("val").and_then(RGBColor::from_hex);
    }
    if let Some(sys) = entry.child("sysClr") {
        if let Some(color) = sys.attr("lastClr").and_then(RGBColor::from_hex) {
            return Some(color);
        }
        // Reasonable fallback for the two window colors
        return match sys.attr("val") {
            Some("windowText") => Some(RGBColor::BLACK),
            Some("window") => Some(RGBColor::WHITE),
            _ => None,
        };
    }
    None
}

/// The theme's font pairs, addressable through the six font sub-tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontScheme {
    /// Major (heading) latin typeface
    pub major_latin: String,
    /// Minor (body) latin typeface
    pub minor_latin: String,
    /// Major east-asian typeface
    pub major_ea: String,
    /// Minor east-asian typeface
    pub minor_ea: String,
    /// Major complex-script typeface
    pub major_cs: String,
    /// Minor complex-script typeface
    pub minor_cs: String,
}

impl FontScheme {
    /// Parse from a `fontScheme` element.
    pub fn from_xml(font_scheme: &XmlElement) -> FontScheme {
        let typeface = |group: Option<&XmlElement>, script: &str| -> String {
            group
                .and_then(|g| g.child(script))
                .and_then(|f| f.attr("typeface"))
                .unwrap_or_default()
                .to_string()
        };
        let major = font_scheme.child("majorFont");
        let minor = font_scheme.child("minorFont");
        FontScheme {
            major_latin: typeface(major, "latin"),
            minor_latin: typeface(minor, "latin"),
            major_ea: typeface(major, "ea"),
            minor_ea: typeface(minor, "ea"),
            major_cs: typeface(major, "cs"),
            minor_cs: typeface(minor, "cs"),
        }
    }

    /// Resolve one of the six theme font tokens by exact match.
    ///
    /// Returns `None` for unknown tokens and for empty slots.
    pub fn lookup(&self, token: &str) -> Option<&str> {
        let typeface = match token {
            "+mj-lt" => &self.major_latin,
            "+mn-lt" => &self.minor_latin,
            "+mj-ea" => &self.major_ea,
            "+mn-ea" => &self.minor_ea,
            "+mj-cs" => &self.major_cs,
            "+mn-cs" => &self.minor_cs,
            _ => return None,
        };
        (!typeface.is_empty()).then_some(typeface.as_str())
    }
}

/// A parsed theme part: color scheme plus font scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Theme name
    pub name: String,
    /// The 12-slot color scheme
    pub color_scheme: ColorScheme,
    /// Major/minor font pairs
    pub font_scheme: FontScheme,
}

impl Theme {
    /// Parse from a theme part root (`a:theme`).
    pub fn from_part(root: &XmlElement) -> Theme {
        let elements = root.child("themeElements");
        let color_scheme = elements
            .and_then(|e| e.child("clrScheme"))
            .map(ColorScheme::from_xml)
            .unwrap_or(ColorScheme {
                slots: [RGBColor::BLACK; 12],
            });
        let font_scheme = elements
            .and_then(|e| e.child("fontScheme"))
            .map(FontScheme::from_xml)
            .unwrap_or_default();
        Theme {
            name: root.attr("name").unwrap_or_default().to_string(),
            color_scheme,
            font_scheme,
        }
    }
}

/// The 12 semantic color tokens, in the order their slots are stored.
const MAP_TOKENS: [&str; 12] = [
    "bg1", "tx1", "bg2", "tx2", "accent1", "accent2", "accent3", "accent4", "accent5", "accent6",
    "hlink", "folHlink",
];

/// Per-master mapping from semantic color tokens to scheme slots.
///
/// All 12 tokens are remappable: the background/text pairs swap slots in
/// dark layouts, and a master may redirect accents or hyperlink colors
/// too. A layout may carry an override map (`clrMapOvr`) consulted before
/// the master's map.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    /// Slot per semantic token, indexed in [`MAP_TOKENS`] order.
    slots: [SchemeSlot; 12],
}

impl Default for ColorMap {
    /// The OOXML default mapping: backgrounds to the light slots, text to
    /// the dark slots, everything else identity.
    fn default() -> Self {
        ColorMap {
            slots: [
                SchemeSlot::Lt1,
                SchemeSlot::Dk1,
                SchemeSlot::Lt2,
                SchemeSlot::Dk2,
                SchemeSlot::Accent1,
                SchemeSlot::Accent2,
                SchemeSlot::Accent3,
                SchemeSlot::Accent4,
                SchemeSlot::Accent5,
                SchemeSlot::Accent6,
                SchemeSlot::Hlink,
                SchemeSlot::FolHlink,
            ],
        }
    }
}

impl ColorMap {
    /// Parse from a `clrMap` element (attributes `bg1="lt1"` etc.).
    ///
    /// Absent or unrecognized attributes keep the default mapping for
    /// their token.
    pub fn from_xml(clr_map: &XmlElement) -> ColorMap {
        let mut map = ColorMap::default();
        for (index, token) in MAP_TOKENS.iter().enumerate() {
            if let Some(slot) = clr_map.attr(token).and_then(SchemeSlot::from_name) {
                map.slots[index] = slot;
            }
        }
        map
    }

    /// Translate a semantic token to a scheme slot.
    ///
    /// Tokens that already name a slot (`dk1`, `lt2`, ...) map to
    /// themselves; unknown tokens yield `None`.
    pub fn slot_for(&self, token: &str) -> Option<SchemeSlot> {
        match MAP_TOKENS.iter().position(|t| *t == token) {
            Some(index) => Some(self.slots[index]),
            None => SchemeSlot::from_name(token),
        }
    }
}

/// Everything needed to turn a scheme token into an RGB value.
///
/// All fields are optional because every piece can legitimately be
/// missing (a slide with no theme must still resolve, to black).
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorContext<'a> {
    /// Layout override map, consulted first
    pub layout_map: Option<&'a ColorMap>,
    /// The master's color map
    pub master_map: Option<&'a ColorMap>,
    /// The theme's color scheme
    pub scheme: Option<&'a ColorScheme>,
}

impl ColorContext<'_> {
    /// Resolve a scheme-color token to its base RGB value.
    ///
    /// The layout override applies before the master map; with neither
    /// present the OOXML default mapping is used. Unknown tokens and a
    /// missing scheme are [`Error::UnresolvedSchemeColor`]; callers fall
    /// back to black and continue, never abort the conversion.
    pub fn resolve_scheme_color(&self, token: &str) -> Result<RGBColor> {
        let default_map = ColorMap::default();
        let map = self.layout_map.or(self.master_map).unwrap_or(&default_map);
        let slot = map
            .slot_for(token)
            .ok_or_else(|| Error::UnresolvedSchemeColor(token.to_string()))?;
        let scheme = self
            .scheme
            .ok_or_else(|| Error::UnresolvedSchemeColor(token.to_string()))?;
        Ok(scheme.color(slot))
    }
}

/// A color reference as it appears in shape and run properties: either a
/// literal sRGB value or a scheme token, each with optional modifiers.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpec {
    /// Literal sRGB color (`srgbClr`)
    Srgb(RGBColor, ColorModifiers),
    /// Scheme color token (`schemeClr`)
    Scheme(String, ColorModifiers),
}

impl ColorSpec {
    /// Read a color spec from an element containing `srgbClr` or
    /// `schemeClr` (e.g. a `solidFill`). Returns `None` when neither is
    /// present.
    pub fn from_xml(parent: &XmlElement) -> Option<ColorSpec> {
        if let Some(srgb) = parent.child("srgbClr") {
            let color = srgb.attr("val").and_then(RGBColor::from_hex)?;
            return Some(ColorSpec::Srgb(color, modifiers_from_xml(srgb)));
        }
        if let Some(scheme) = parent.child("schemeClr") {
            let token = scheme.attr("val")?.to_string();
            return Some(ColorSpec::Scheme(token, modifiers_from_xml(scheme)));
        }
        None
    }

    /// Resolve to a final RGB value. Total: scheme lookup failures fall
    /// back to black (with the error reported through `on_degraded`) and
    /// the modifiers still apply.
    ///
    /// Scheme colors take the HSL luminance path; literal sRGB colors
    /// take the direct channel path, matching the two legacy pipelines.
    pub fn resolve(&self, ctx: &ColorContext<'_>, mut on_degraded: impl FnMut(Error)) -> RGBColor {
        match self {
            ColorSpec::Srgb(color, mods) => mods.apply_rgb(*color),
            ColorSpec::Scheme(token, mods) => {
                let base = match ctx.resolve_scheme_color(token) {
                    Ok(color) => color,
                    Err(e) => {
                        on_degraded(e);
                        RGBColor::BLACK
                    },
                };
                mods.apply_hsl(base)
            },
        }
    }
}

/// Read the modifier children of a color element, fractions from
/// parts-per-100,000 values.
pub fn modifiers_from_xml(color_el: &XmlElement) -> ColorModifiers {
    let fraction = |name: &str| -> Option<f64> {
        color_el
            .child(name)
            .and_then(|m| m.attr_i64("val"))
            .map(percent_to_fraction)
    };
    ColorModifiers {
        lum_mod: fraction("lumMod"),
        lum_off: fraction("lumOff"),
        tint: fraction("tint"),
        shade: fraction("shade"),
        alpha: fraction("alpha"),
    }
}
