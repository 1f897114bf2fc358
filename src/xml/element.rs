//! Generic WordprocessingML element tree

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::{BufRead, Cursor, Write};

use crate::error::{Error, Result};

/// A namespace-prefixed XML element with attributes and ordered children.
///
/// This is the one tree representation the whole crate operates on. Child
/// order is semantically significant: WordprocessingML consumers reject
/// misordered children, and the sequence of inline atoms inside a run *is*
/// the run's text. Character data only occurs in leaf text elements such as
/// `w:t`, so it is kept as a field rather than as a child node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    /// Create a new empty element
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Add an attribute (builder style)
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Add a child element (builder style)
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Set character data (builder style)
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Prefixed tag name, e.g. `w:p`
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Character data directly inside this element
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the character data
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Get an attribute value by its prefixed name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(pair) => pair.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Remove an attribute; no-op when absent
    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(k, _)| k != name);
    }

    /// All attributes in document order
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Child elements in document order
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Mutable child elements
    pub fn children_mut(&mut self) -> &mut Vec<Element> {
        &mut self.children
    }

    /// First child with the given tag
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// First child with the given tag, mutable
    pub fn find_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.tag == tag)
    }

    /// Index of the first child with the given tag
    pub fn position(&self, tag: &str) -> Option<usize> {
        self.children.iter().position(|c| c.tag == tag)
    }

    /// Children with the given tag, in document order
    pub fn children_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Append a child at the end, ignoring any declared ordering
    pub fn push_child(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        self.children.last_mut().expect("just pushed")
    }

    /// Insert a child at `index`
    pub fn insert_child(&mut self, index: usize, child: Element) {
        self.children.insert(index, child);
    }

    /// Remove and return the child at `index`
    pub fn remove_child(&mut self, index: usize) -> Element {
        self.children.remove(index)
    }

    /// Keep only the children for which `keep` returns true
    pub fn retain_children<F: FnMut(&Element) -> bool>(&mut self, keep: F) {
        self.children.retain(keep);
    }

    /// Whether this element has neither attributes, children nor text
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty() && self.text.is_empty()
    }

    // === XML parsing ===

    /// Parse a single element (and its subtree) from an XML string.
    ///
    /// Leading processing instructions and the XML declaration are skipped,
    /// so a whole part body such as `document.xml` parses directly to its
    /// root element.
    pub fn parse_str(xml: &str) -> Result<Element> {
        let mut reader = Reader::from_str(xml);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    return Element::from_reader(&mut reader, &e);
                }
                Event::Empty(e) => return Ok(Element::from_empty(&e)),
                Event::Eof => {
                    return Err(Error::InvalidDocument("no root element".into()));
                }
                _ => {}
            }
            buf.clear();
        }
    }

    /// Read a complete element from an XML reader, the start tag already
    /// consumed
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let mut element = Element::new(name.clone());
        element.attributes = read_attributes(start);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let child = Element::from_reader(reader, &e)?;
                    element.children.push(child);
                }
                Event::Empty(e) => {
                    element.children.push(Element::from_empty(&e));
                }
                Event::Text(t) => {
                    let text = t.unescape()?;
                    if !text.is_empty() {
                        element.text.push_str(&text);
                    }
                }
                Event::End(e) => {
                    if String::from_utf8_lossy(e.name().as_ref()) == name {
                        break;
                    }
                }
                Event::Eof => return Err(Error::InvalidDocument("unexpected EOF".into())),
                _ => {}
            }
            buf.clear();
        }

        // Whitespace-only character data is indentation between child
        // elements, not content. Only an explicit xml:space="preserve"
        // (the codec's own marker) keeps it.
        if element.text.trim().is_empty() && element.attr("xml:space") != Some("preserve") {
            element.text.clear();
        }

        Ok(element)
    }

    /// Create from a self-closing element tag
    pub fn from_empty(start: &BytesStart) -> Self {
        Self {
            tag: String::from_utf8_lossy(start.name().as_ref()).to_string(),
            attributes: read_attributes(start),
            children: Vec::new(),
            text: String::new(),
        }
    }

    // === XML serialization ===

    /// Write this element and its subtree to an XML writer
    pub fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(&self.tag);
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_empty() {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            if !self.text.is_empty() {
                writer.write_event(Event::Text(BytesText::new(&self.text)))?;
            }
            for child in &self.children {
                child.write_to(writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new(&self.tag)))?;
        }

        Ok(())
    }

    /// Serialize this element to an XML fragment string
    pub fn to_xml(&self) -> Result<String> {
        let mut buffer = Cursor::new(Vec::new());
        let mut writer = Writer::new(&mut buffer);
        self.write_to(&mut writer)?;
        String::from_utf8(buffer.into_inner()).map_err(|e| Error::InvalidDocument(e.to_string()))
    }

    /// Serialize this element as a standalone XML part, with declaration
    pub fn to_part_xml(&self) -> Result<String> {
        let mut buffer = Cursor::new(Vec::new());
        let mut writer = Writer::new(&mut buffer);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        self.write_to(&mut writer)?;
        String::from_utf8(buffer.into_inner()).map_err(|e| Error::InvalidDocument(e.to_string()))
    }
}

fn read_attributes(start: &BytesStart) -> Vec<(String, String)> {
    start
        .attributes()
        .filter_map(|a| a.ok())
        .map(|a| {
            (
                String::from_utf8_lossy(a.key.as_ref()).to_string(),
                String::from_utf8_lossy(&a.value).to_string(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_nested() {
        let xml = r#"<w:p w:rsidR="00A1"><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>hi</w:t></w:r></w:p>"#;
        let p = Element::parse_str(xml).unwrap();

        assert_eq!(p.tag(), "w:p");
        assert_eq!(p.attr("w:rsidR"), Some("00A1"));
        assert_eq!(p.children().len(), 2);

        let style = p.find("w:pPr").and_then(|ppr| ppr.find("w:pStyle")).unwrap();
        assert_eq!(style.attr("w:val"), Some("Heading1"));

        let t = p.find("w:r").and_then(|r| r.find("w:t")).unwrap();
        assert_eq!(t.text(), "hi");
    }

    #[test]
    fn test_serialize_roundtrip() {
        let el = Element::new("w:r")
            .with_child(Element::new("w:rPr").with_child(Element::new("w:b")))
            .with_child(
                Element::new("w:t")
                    .with_attr("xml:space", "preserve")
                    .with_text(" spaced "),
            );

        let xml = el.to_xml().unwrap();
        let reparsed = Element::parse_str(&xml).unwrap();
        assert_eq!(el, reparsed);
    }

    #[test]
    fn test_empty_element_self_closes() {
        let el = Element::new("w:tab");
        assert_eq!(el.to_xml().unwrap(), "<w:tab/>");
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut el = Element::new("w:pStyle");
        el.set_attr("w:val", "Normal");
        el.set_attr("w:val", "Heading1");
        assert_eq!(el.attr("w:val"), Some("Heading1"));
        assert_eq!(el.attributes().len(), 1);
    }

    #[test]
    fn test_escaped_text() {
        let el = Element::new("w:t").with_text("a < b & c");
        let xml = el.to_xml().unwrap();
        let reparsed = Element::parse_str(&xml).unwrap();
        assert_eq!(reparsed.text(), "a < b & c");
    }

    #[test]
    fn test_preserved_whitespace_survives_parse() {
        let el = Element::parse_str(r#"<w:t xml:space="preserve">   </w:t>"#).unwrap();
        assert_eq!(el.text(), "   ");

        let el = Element::parse_str(r#"<w:t xml:space="preserve"> a </w:t>"#).unwrap();
        assert_eq!(el.text(), " a ");
    }

    #[test]
    fn test_indentation_is_not_content() {
        let xml = "<w:p>\n  <w:r>\n    <w:t>x</w:t>\n  </w:r>\n</w:p>";
        let p = Element::parse_str(xml).unwrap();
        assert_eq!(p.text(), "");
        assert_eq!(p.find("w:r").unwrap().text(), "");
        assert_eq!(p.find("w:r").unwrap().find("w:t").unwrap().text(), "x");
    }

    #[test]
    fn test_parse_skips_declaration() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:body><w:p/></w:body>";
        let body = Element::parse_str(xml).unwrap();
        assert_eq!(body.tag(), "w:body");
        assert_eq!(body.children().len(), 1);
    }
}
