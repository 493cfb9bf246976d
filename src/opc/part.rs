//! Parsed part trees.
//!
//! Every package part (slide, layout, master, theme, relationship
//! manifest) is parsed once into an owned [`XmlElement`] tree and cached
//! for the lifetime of the conversion job. The tree is deliberately
//! generic: resolvers navigate it by local element name, so the same type
//! serves every part kind.
//!
//! Namespace prefixes are stripped from element and attribute names.
//! DrawingML mixes `p:`, `a:`, and `r:` prefixes freely and the resolvers
//! only ever match on local names, the same way the streaming parsers in
//! this codebase match on `local_name()`.

use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// A single element of a parsed part tree.
///
/// Immutable once parsed. Attribute order and child order are preserved
/// as they appear in the source XML; child order matters because later
/// shapes render on top of earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    /// Parse a complete part from raw XML bytes.
    ///
    /// Returns the root element. Fails only on unparseable XML; unknown
    /// elements and attributes are kept verbatim for the resolvers to
    /// ignore.
    pub fn parse(bytes: &[u8]) -> Result<XmlElement> {
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(true);

        // The stack holds unfinished elements; the root pops last.
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    stack.push(element_from_start(e)?);
                },
                Ok(Event::Empty(ref e)) => {
                    let element = element_from_start(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        // A self-closing root element
                        None => return Ok(element),
                    }
                },
                Ok(Event::Text(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = std::str::from_utf8(t.as_ref())
                            .map_err(|e| Error::Xml(e.to_string()))?;
                        current.text.push_str(text);
                    }
                },
                Ok(Event::End(_)) => {
                    let finished = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("unbalanced end tag".to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(finished),
                        None => return Ok(finished),
                    }
                },
                Ok(Event::Eof) => {
                    return Err(Error::Xml("no root element".to_string()));
                },
                Err(e) => return Err(e.into()),
                _ => {},
            }
            buf.clear();
        }
    }

    /// The element's local name (namespace prefix stripped).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Concatenated character data directly inside this element.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Look up an attribute by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute parsed as `i64`, `None` when absent or unparseable.
    #[inline]
    pub fn attr_i64(&self, name: &str) -> Option<i64> {
        self.attr(name).and_then(|v| v.parse().ok())
    }

    /// Attribute parsed as `i32`, `None` when absent or unparseable.
    #[inline]
    pub fn attr_i32(&self, name: &str) -> Option<i32> {
        self.attr(name).and_then(|v| v.parse().ok())
    }

    /// Attribute parsed as `u32`, `None` when absent or unparseable.
    #[inline]
    pub fn attr_u32(&self, name: &str) -> Option<u32> {
        self.attr(name).and_then(|v| v.parse().ok())
    }

    /// Boolean attribute. OOXML writes `1`/`0` and `true`/`false`.
    pub fn attr_bool(&self, name: &str) -> Option<bool> {
        match self.attr(name) {
            Some("1") | Some("true") => Some(true),
            Some("0") | Some("false") => Some(false),
            _ => None,
        }
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children, in document order.
    #[inline]
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Direct children with the given local name, in document order.
    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First descendant with the given local name, depth-first.
    pub fn descendant(&self, name: &str) -> Option<&XmlElement> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.descendant(name) {
                return Some(found);
            }
        }
        None
    }
}

fn element_from_start(e: &quick_xml::events::BytesStart<'_>) -> Result<XmlElement> {
    let name = std::str::from_utf8(e.local_name().as_ref())
        .map_err(|e| Error::Xml(e.to_string()))?
        .to_string();

    let mut attrs = Vec::new();
    for attr in e.attributes().flatten() {
        let key = attr.key.local_name();
        let key = std::str::from_utf8(key.as_ref())
            .map_err(|e| Error::Xml(e.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Xml(e.to_string()))?
            .into_owned();
        attrs.push((key, value));
    }

    Ok(XmlElement {
        name,
        attrs,
        children: Vec::new(),
        text: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_tree() {
        let xml = br#"<?xml version="1.0"?>
            <p:sp xmlns:p="ns" xmlns:a="ns2">
                <p:nvSpPr><p:cNvPr id="2" name="Title 1"/></p:nvSpPr>
                <a:t>Hello</a:t>
            </p:sp>"#;
        let root = XmlElement::parse(xml).unwrap();
        assert_eq!(root.name(), "sp");
        assert_eq!(root.children().len(), 2);

        let cnvpr = root.descendant("cNvPr").unwrap();
        assert_eq!(cnvpr.attr("name"), Some("Title 1"));
        assert_eq!(cnvpr.attr_i64("id"), Some(2));

        assert_eq!(root.child("t").unwrap().text(), "Hello");
    }

    #[test]
    fn test_namespace_prefixes_stripped() {
        let xml = br#"<a:xfrm xmlns:a="ns" rot="5400000" flipH="1">
            <a:off x="100" y="-200"/>
            <a:ext cx="300" cy="400"/>
        </a:xfrm>"#;
        let root = XmlElement::parse(xml).unwrap();
        assert_eq!(root.name(), "xfrm");
        assert_eq!(root.attr_i64("rot"), Some(5_400_000));
        assert_eq!(root.attr_bool("flipH"), Some(true));
        assert_eq!(root.child("off").unwrap().attr_i64("y"), Some(-200));
        assert_eq!(root.child("ext").unwrap().attr_i64("cx"), Some(300));
    }

    #[test]
    fn test_children_named_preserves_order() {
        let xml = br#"<tree><sp n="a"/><grpSp n="b"/><sp n="c"/></tree>"#;
        let root = XmlElement::parse(xml).unwrap();
        let names: Vec<_> = root
            .children_named("sp")
            .filter_map(|c| c.attr("n"))
            .collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn test_unescapes_attribute_values() {
        let xml = br#"<e name="A &amp; B"/>"#;
        let root = XmlElement::parse(xml).unwrap();
        assert_eq!(root.attr("name"), Some("A & B"));
    }

    #[test]
    fn test_malformed_input_errors() {
        assert!(XmlElement::parse(b"").is_err());
        assert!(XmlElement::parse(b"<a><b></a>").is_err());
    }
}
