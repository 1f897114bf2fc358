//! Footnotes collection (the w:footnotes part tree)

use crate::document::{Paragraph, Run};
use crate::error::Result;
use crate::xml::{w_id, wml_namespaces, Element};

/// The footnote collection backing `word/footnotes.xml`.
///
/// A new collection seeds the separator and continuation-separator stubs
/// (ids 0 and 1) Word expects, so user footnotes start at id 2. Footnote
/// bodies are `FootnoteText`-styled paragraphs opening with a
/// `FootnoteReference`-styled run holding the `w:footnoteRef` glyph.
#[derive(Debug)]
pub struct Footnotes {
    element: Element,
}

impl Footnotes {
    /// Create a collection holding only the separator stubs
    pub fn new() -> Self {
        let mut element = Element::new("w:footnotes");
        element.push_child(stub(0, "separator", "w:separator"));
        element.push_child(stub(1, "continuationSeparator", "w:continuationSeparator"));
        Self { element }
    }

    /// Rebuild the collection from an existing `w:footnotes` tree
    pub fn from_element(element: Element) -> Self {
        debug_assert_eq!(element.tag(), "w:footnotes");
        Self { element }
    }

    /// Number of user footnotes (separator stubs excluded)
    pub fn len(&self) -> usize {
        self.element
            .children_with_tag("w:footnote")
            .filter(|f| f.attr("w:type").is_none())
            .count()
    }

    /// Whether the collection holds no user footnotes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The id the next added footnote will receive
    pub fn next_id(&self) -> u64 {
        self.element
            .children_with_tag("w:footnote")
            .filter_map(w_id)
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Add a footnote with body `text`, returning its id.
    ///
    /// The body text is prefixed with a space separating it from the
    /// reference mark, matching Word's own output.
    pub fn add(&mut self, text: &str) -> Result<u64> {
        let id = self.next_id();
        let footnote = self.element.add_ordered("w:footnote")?;
        footnote.set_attr("w:id", id.to_string());

        let body = footnote.add_ordered("w:p")?;
        Paragraph::new(&mut *body).set_style(Some("FootnoteText"))?;
        Run::new(body.add_ordered("w:r")?).add_footnote_mark()?;
        Run::new(body.add_ordered("w:r")?).set_text(&format!(" {text}"))?;
        Ok(id)
    }

    /// The `w:footnote` element with the given id
    pub fn footnote(&self, id: u64) -> Option<&Element> {
        self.element
            .children_with_tag("w:footnote")
            .find(|f| w_id(f) == Some(id))
    }

    /// Serialize as a standalone `footnotes.xml` part
    pub fn to_part_xml(&self) -> Result<String> {
        let mut root = self.element.clone();
        for (name, uri) in wml_namespaces() {
            root.set_attr(name, uri);
        }
        root.to_part_xml()
    }
}

impl Default for Footnotes {
    fn default() -> Self {
        Self::new()
    }
}

/// A separator-type stub footnote
fn stub(id: u64, kind: &str, glyph: &'static str) -> Element {
    Element::new("w:footnote")
        .with_attr("w:type", kind)
        .with_attr("w:id", id.to_string())
        .with_child(Element::new("w:p").with_child(Element::new("w:r").with_child(Element::new(glyph))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_seeds_separator_stubs() {
        let footnotes = Footnotes::new();
        assert!(footnotes.is_empty());
        assert_eq!(footnotes.next_id(), 2);

        let separator = footnotes.footnote(0).unwrap();
        assert_eq!(separator.attr("w:type"), Some("separator"));
        assert!(separator
            .find("w:p")
            .and_then(|p| p.find("w:r"))
            .and_then(|r| r.find("w:separator"))
            .is_some());

        let continuation = footnotes.footnote(1).unwrap();
        assert_eq!(continuation.attr("w:type"), Some("continuationSeparator"));
    }

    #[test]
    fn test_add_footnote_body() {
        let mut footnotes = Footnotes::new();
        let id = footnotes.add("source: ibid.").unwrap();
        assert_eq!(id, 2);
        assert_eq!(footnotes.len(), 1);

        let footnote = footnotes.footnote(id).unwrap();
        let body = footnote.find("w:p").unwrap();
        let style = body.find("w:pPr").unwrap().find("w:pStyle").unwrap();
        assert_eq!(style.attr("w:val"), Some("FootnoteText"));

        let runs: Vec<&Element> = body.children_with_tag("w:r").collect();
        assert_eq!(runs.len(), 2);
        assert!(runs[0].find("w:footnoteRef").is_some());
        assert_eq!(runs[1].find("w:t").unwrap().text(), " source: ibid.");
    }

    #[test]
    fn test_ids_stay_unique() {
        let mut footnotes = Footnotes::new();
        let first = footnotes.add("a").unwrap();
        let second = footnotes.add("b").unwrap();
        assert_eq!(second, first + 1);
    }

    #[test]
    fn test_part_xml() {
        let mut footnotes = Footnotes::new();
        footnotes.add("x").unwrap();
        let xml = footnotes.to_part_xml().unwrap();
        assert!(xml.contains("xmlns:w="));
        assert!(xml.contains("w:type=\"separator\""));
    }
}
