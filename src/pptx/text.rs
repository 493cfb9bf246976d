//! Raw text model: bodies, paragraphs, runs, and their properties.
//!
//! These types mirror what a `txBody` element declares, before any
//! inheritance is applied. Every property field is optional; absence
//! means "ask the next cascade level", which is why the resolver merges
//! rather than defaults here.

use crate::opc::part::XmlElement;
use crate::pptx::bullet::BulletProps;
use crate::pptx::theme::ColorSpec;
use serde::Serialize;

/// Maximum list nesting depth DrawingML allows (`lvl1pPr`..`lvl9pPr`).
pub const MAX_LIST_LEVELS: usize = 9;

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    fn from_attr(value: &str) -> Option<Alignment> {
        match value {
            "l" => Some(Alignment::Left),
            "ctr" => Some(Alignment::Center),
            "r" => Some(Alignment::Right),
            "just" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// Capitalization mode of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CapsMode {
    None,
    All,
    Small,
}

/// Vertical baseline position of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Baseline {
    Normal,
    Superscript,
    Subscript,
}

/// Run-level character properties (`rPr` / `defRPr`).
///
/// All fields optional: `None` defers to the next cascade level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProps {
    /// Font size in hundredths of a point (`sz`)
    pub size: Option<i32>,
    /// Bold (`b`)
    pub bold: Option<bool>,
    /// Italic (`i`)
    pub italic: Option<bool>,
    /// Latin typeface; may be a theme token such as `+mj-lt`
    pub font: Option<String>,
    /// Text color (`solidFill`)
    pub color: Option<ColorSpec>,
    /// Capitalization (`cap`)
    pub caps: Option<CapsMode>,
    /// Baseline offset in parts-per-100,000 (`baseline`); positive is
    /// superscript, negative subscript
    pub baseline: Option<i64>,
}

impl RunProps {
    /// Read run properties from an `rPr`/`defRPr` element.
    pub fn from_xml(rpr: &XmlElement) -> RunProps {
        let caps = rpr.attr("cap").and_then(|v| match v {
            "all" => Some(CapsMode::All),
            "small" => Some(CapsMode::Small),
            "none" => Some(CapsMode::None),
            _ => None,
        });
        let font = rpr
            .child("latin")
            .and_then(|l| l.attr("typeface"))
            .map(str::to_string);
        let color = rpr.child("solidFill").and_then(ColorSpec::from_xml);

        RunProps {
            size: rpr.attr_i32("sz"),
            bold: rpr.attr_bool("b"),
            italic: rpr.attr_bool("i"),
            font,
            color,
            caps,
            baseline: rpr.attr_i64("baseline"),
        }
    }

    /// Fill this set's unset fields from a lower-precedence set.
    ///
    /// Folding the cascade levels through this, highest precedence first,
    /// yields the effective properties.
    pub fn inherit_from(&mut self, fallback: &RunProps) {
        if self.size.is_none() {
            self.size = fallback.size;
        }
        if self.bold.is_none() {
            self.bold = fallback.bold;
        }
        if self.italic.is_none() {
            self.italic = fallback.italic;
        }
        if self.font.is_none() {
            self.font = fallback.font.clone();
        }
        if self.color.is_none() {
            self.color = fallback.color.clone();
        }
        if self.caps.is_none() {
            self.caps = fallback.caps;
        }
        if self.baseline.is_none() {
            self.baseline = fallback.baseline;
        }
    }
}

/// Paragraph-level properties (`pPr` or a `lvlNpPr` list-style level).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParaProps {
    /// Alignment (`algn`)
    pub align: Option<Alignment>,
    /// Left margin in EMUs (`marL`)
    pub margin_left: Option<i64>,
    /// First-line indent in EMUs (`indent`)
    pub indent: Option<i64>,
    /// Bullet setting; `None` inherits
    pub bullet: Option<BulletProps>,
    /// Default run properties for the paragraph (`defRPr`)
    pub def_run: Option<RunProps>,
}

impl ParaProps {
    /// Read paragraph properties from a `pPr`-shaped element.
    pub fn from_xml(ppr: &XmlElement) -> ParaProps {
        ParaProps {
            align: ppr.attr("algn").and_then(Alignment::from_attr),
            margin_left: ppr.attr_i64("marL"),
            indent: ppr.attr_i64("indent"),
            bullet: BulletProps::from_ppr(ppr),
            def_run: ppr.child("defRPr").map(RunProps::from_xml),
        }
    }

    /// Fill unset fields from a lower-precedence set. Bullets do not
    /// inherit through this path; their cascade is shorter and handled by
    /// the resolver separately.
    pub fn inherit_from(&mut self, fallback: &ParaProps) {
        if self.align.is_none() {
            self.align = fallback.align;
        }
        if self.margin_left.is_none() {
            self.margin_left = fallback.margin_left;
        }
        if self.indent.is_none() {
            self.indent = fallback.indent;
        }
    }
}

/// A list style: per-level paragraph defaults (`lstStyle`,
/// `lvl1pPr`..`lvl9pPr`), also used for the master's `titleStyle` /
/// `bodyStyle` / `otherStyle` sections, which share the same shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListStyle {
    levels: [Option<ParaProps>; MAX_LIST_LEVELS],
}

impl ListStyle {
    /// Parse from an element whose children are `lvlNpPr` entries.
    pub fn from_xml(lst_style: &XmlElement) -> ListStyle {
        let mut levels: [Option<ParaProps>; MAX_LIST_LEVELS] = Default::default();
        for (index, slot) in levels.iter_mut().enumerate() {
            let name = format!("lvl{}pPr", index + 1);
            *slot = lst_style.child(&name).map(ParaProps::from_xml);
        }
        ListStyle { levels }
    }

    /// Properties for a 0-based nesting level, if declared.
    pub fn level(&self, level: usize) -> Option<&ParaProps> {
        self.levels.get(level).and_then(Option::as_ref)
    }

    /// Whether no level declares anything.
    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(Option::is_none)
    }
}

/// A single text run with its explicit properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// The run text
    pub text: String,
    /// Explicit run properties, highest cascade precedence
    pub props: RunProps,
}

/// A paragraph: nesting level, explicit properties, runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// 0-based nesting level (`lvl`)
    pub level: usize,
    /// Explicit paragraph properties
    pub props: ParaProps,
    /// Runs in document order
    pub runs: Vec<Run>,
}

/// A shape's text body: its own list style plus paragraphs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBody {
    /// The shape-level list style (`lstStyle`)
    pub list_style: ListStyle,
    /// Paragraphs in document order
    pub paragraphs: Vec<Paragraph>,
}

impl TextBody {
    /// Parse from a `txBody` element.
    ///
    /// Line breaks (`a:br`) become explicit newline runs so the emitter
    /// keeps intra-paragraph breaks; field elements (`a:fld`, slide
    /// numbers and dates) contribute their cached text like a plain run.
    pub fn from_xml(tx_body: &XmlElement) -> TextBody {
        let list_style = tx_body
            .child("lstStyle")
            .map(ListStyle::from_xml)
            .unwrap_or_default();

        let mut paragraphs = Vec::new();
        for p in tx_body.children_named("p") {
            let props = p.child("pPr").map(ParaProps::from_xml).unwrap_or_default();
            let level = p
                .child("pPr")
                .and_then(|ppr| ppr.attr_i32("lvl"))
                .unwrap_or(0)
                .clamp(0, (MAX_LIST_LEVELS - 1) as i32) as usize;

            let mut runs = Vec::new();
            for child in p.children() {
                match child.name() {
                    "r" | "fld" => {
                        let text = child
                            .child("t")
                            .map(|t| t.text().to_string())
                            .unwrap_or_default();
                        let props = child
                            .child("rPr")
                            .map(RunProps::from_xml)
                            .unwrap_or_default();
                        runs.push(Run { text, props });
                    },
                    "br" => runs.push(Run {
                        text: "\n".to_string(),
                        props: RunProps::default(),
                    }),
                    _ => {},
                }
            }

            paragraphs.push(Paragraph { level, props, runs });
        }

        TextBody {
            list_style,
            paragraphs,
        }
    }

    /// Plain text of the whole body, paragraphs joined by newlines.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (index, paragraph) in self.paragraphs.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            for run in &paragraph.runs {
                out.push_str(&run.text);
            }
        }
        out
    }
}
