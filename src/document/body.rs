//! Document body view (w:body)

use crate::document::Paragraph;
use crate::error::Result;
use crate::xml::Element;

/// Mutable view over a `w:body` element.
///
/// Block content (`w:p`, `w:tbl`) precedes the trailing `w:sectPr`
/// singleton; insertion goes through the ordered engine so an existing
/// `w:sectPr` stays last no matter when content is added.
#[derive(Debug)]
pub struct Body<'a> {
    element: &'a mut Element,
}

impl<'a> Body<'a> {
    /// Wrap an existing `w:body` element
    pub fn new(element: &'a mut Element) -> Self {
        debug_assert_eq!(element.tag(), "w:body");
        Self { element }
    }

    /// The underlying element
    pub fn element(&self) -> &Element {
        self.element
    }

    /// Append a new empty paragraph
    pub fn add_paragraph(&mut self) -> Result<Paragraph<'_>> {
        let element = self.element.add_ordered("w:p")?;
        Ok(Paragraph::new(element))
    }

    /// Number of paragraphs
    pub fn paragraph_count(&self) -> usize {
        self.element.children_with_tag("w:p").count()
    }

    /// Paragraph elements in document order
    pub fn paragraphs(&self) -> impl Iterator<Item = &Element> {
        self.element.children_with_tag("w:p")
    }

    /// Mutable view of the `index`-th paragraph
    pub fn paragraph_mut(&mut self, index: usize) -> Option<Paragraph<'_>> {
        let position = self
            .element
            .children()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.tag() == "w:p")
            .map(|(i, _)| i)
            .nth(index)?;
        Some(Paragraph::new(&mut self.element.children_mut()[position]))
    }

    /// The trailing section properties, created on demand
    pub fn get_or_add_section_props(&mut self) -> Result<&mut Element> {
        self.element.get_or_add("w:sectPr")
    }

    /// All paragraph text, newline-separated
    pub fn text(&self) -> String {
        self.paragraphs()
            .map(super::paragraph::text_of)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
