//! Bullet properties and marker classification.
//!
//! Paragraph bullets arrive either as an explicit glyph (`buChar`), an
//! auto-numbering scheme (`buAutoNum`), or an explicit "no bullet"
//! (`buNone`). Downstream markup emission does not want raw glyphs from
//! symbol fonts; it wants a small set of semantic marker kinds, so glyphs
//! are classified through an exact-character table with Unicode
//! block-range fallback buckets.

use crate::opc::part::XmlElement;
use serde::Serialize;

/// Bullet setting as written on a paragraph or list-style level.
#[derive(Debug, Clone, PartialEq)]
pub enum BulletProps {
    /// Explicit `buNone`
    None,
    /// Character bullet with its glyph
    Char(String),
    /// Auto-numbered bullet with its numbering scheme
    /// (e.g. "arabicPeriod", "romanLcParenR")
    AutoNum(String),
}

impl BulletProps {
    /// Read the bullet setting from a paragraph-properties element.
    ///
    /// Returns `None` when the element carries no bullet child at all,
    /// which means "inherit" rather than "no bullet".
    pub fn from_ppr(ppr: &XmlElement) -> Option<BulletProps> {
        if ppr.child("buNone").is_some() {
            return Some(BulletProps::None);
        }
        if let Some(bu_char) = ppr.child("buChar") {
            return Some(BulletProps::Char(
                bu_char.attr("char").unwrap_or_default().to_string(),
            ));
        }
        if let Some(bu_auto) = ppr.child("buAutoNum") {
            return Some(BulletProps::AutoNum(
                bu_auto.attr("type").unwrap_or("arabicPeriod").to_string(),
            ));
        }
        None
    }
}

/// What kind of marker a resolved bullet carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BulletKind {
    /// No marker at all
    None,
    /// A character marker
    Char,
    /// An auto-numbered marker
    AutoNumber,
}

/// Semantic marker families, used by the emitter to pick list styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerKind {
    Disc,
    Circle,
    Square,
    Dash,
    Diamond,
    Arrow,
    Checkmark,
    Star,
    /// Recognizable as a marker but in no known family
    Other,
}

/// Exact-glyph classification table. Entries here take priority over the
/// range buckets, so `○` stays a circle even though it sits inside the
/// geometric-shapes block.
static MARKER_GLYPHS: phf::Map<char, MarkerKind> = phf::phf_map! {
    '•' => MarkerKind::Disc,
    '●' => MarkerKind::Disc,
    '◦' => MarkerKind::Circle,
    '○' => MarkerKind::Circle,
    'o' => MarkerKind::Circle,
    '■' => MarkerKind::Square,
    '□' => MarkerKind::Square,
    '▪' => MarkerKind::Square,
    '▫' => MarkerKind::Square,
    '-' => MarkerKind::Dash,
    '–' => MarkerKind::Dash,
    '—' => MarkerKind::Dash,
    '◆' => MarkerKind::Diamond,
    '◇' => MarkerKind::Diamond,
    '❖' => MarkerKind::Diamond,
    '→' => MarkerKind::Arrow,
    '►' => MarkerKind::Arrow,
    '▶' => MarkerKind::Arrow,
    '➢' => MarkerKind::Arrow,
    '➤' => MarkerKind::Arrow,
    '✓' => MarkerKind::Checkmark,
    '✔' => MarkerKind::Checkmark,
    '☑' => MarkerKind::Checkmark,
    '★' => MarkerKind::Star,
    '☆' => MarkerKind::Star,
    '✦' => MarkerKind::Star,
    '✱' => MarkerKind::Star,
};

/// Classify a bullet glyph into a marker family.
///
/// Exact table first, then Unicode block-range buckets, then
/// [`MarkerKind::Other`].
pub fn classify_marker(glyph: char) -> MarkerKind {
    if let Some(kind) = MARKER_GLYPHS.get(&glyph) {
        return *kind;
    }
    match glyph as u32 {
        // Geometric shapes: square family unless the exact table said
        // otherwise above
        0x25A0..=0x25FF => MarkerKind::Square,
        // Arrows and supplemental/dingbat arrows
        0x2190..=0x21FF | 0x27A1..=0x27BE | 0x2B00..=0x2B0F => MarkerKind::Arrow,
        0x2713..=0x2718 => MarkerKind::Checkmark,
        0x2605..=0x2606 | 0x2726..=0x2739 => MarkerKind::Star,
        _ => MarkerKind::Other,
    }
}

/// A fully resolved bullet for one paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulletInfo {
    /// Whether the paragraph renders a marker
    pub has_marker: bool,
    /// Marker kind
    pub kind: BulletKind,
    /// Marker family for character bullets
    pub marker: Option<MarkerKind>,
    /// The raw glyph for character bullets
    pub glyph: Option<String>,
    /// Numbering scheme for auto-numbered bullets
    pub numbering_scheme: Option<String>,
    /// Paragraph nesting level (0-based)
    pub level: usize,
    /// Left margin in pixels
    pub margin_left: f64,
    /// First-line indent in pixels
    pub indent: f64,
}

impl BulletInfo {
    /// A bullet-less paragraph at the given level.
    pub fn none(level: usize, margin_left: f64, indent: f64) -> BulletInfo {
        BulletInfo {
            has_marker: false,
            kind: BulletKind::None,
            marker: None,
            glyph: None,
            numbering_scheme: None,
            level,
            margin_left,
            indent,
        }
    }

    /// Build from a cascade-resolved [`BulletProps`].
    pub fn from_props(
        props: &BulletProps,
        level: usize,
        margin_left: f64,
        indent: f64,
    ) -> BulletInfo {
        match props {
            BulletProps::None => BulletInfo::none(level, margin_left, indent),
            BulletProps::Char(glyph) => {
                let marker = glyph.chars().next().map(classify_marker);
                BulletInfo {
                    has_marker: true,
                    kind: BulletKind::Char,
                    marker,
                    glyph: Some(glyph.clone()),
                    numbering_scheme: None,
                    level,
                    margin_left,
                    indent,
                }
            },
            BulletProps::AutoNum(scheme) => BulletInfo {
                has_marker: true,
                kind: BulletKind::AutoNumber,
                marker: None,
                glyph: None,
                numbering_scheme: Some(scheme.clone()),
                level,
                margin_left,
                indent,
            },
        }
    }
}
