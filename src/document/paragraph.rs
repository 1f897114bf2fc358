//! Paragraph view (w:p)

use crate::document::annotations;
use crate::document::Run;
use crate::error::Result;
use crate::xml::{w_val, Element};

/// Mutable view over a `w:p` element.
///
/// A paragraph's children are an optional leading `w:pPr` plus inline-level
/// content: runs, hyperlinks, revision wrappers and zero-width markers.
#[derive(Debug)]
pub struct Paragraph<'a> {
    element: &'a mut Element,
}

impl<'a> Paragraph<'a> {
    /// Wrap an existing `w:p` element
    pub fn new(element: &'a mut Element) -> Self {
        debug_assert_eq!(element.tag(), "w:p");
        Self { element }
    }

    /// The underlying element
    pub fn element(&self) -> &Element {
        self.element
    }

    /// The textual content of this paragraph: the concatenated text of its
    /// runs and of runs inside hyperlinks, in document order.
    pub fn text(&self) -> String {
        text_of(self.element)
    }

    /// Replace the paragraph's content with a single run containing `text`,
    /// retaining a `w:pPr` child.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.clear_content();
        self.add_run(text)?;
        Ok(())
    }

    /// Remove all children except a `w:pPr` element if present.
    ///
    /// This is the only way annotation markers inside the paragraph are
    /// destroyed.
    pub fn clear_content(&mut self) {
        self.element.retain_children(|c| c.tag() == "w:pPr");
    }

    /// Append a new run containing `text`
    pub fn add_run(&mut self, text: &str) -> Result<Run<'_>> {
        let element = self.element.add_ordered("w:r")?;
        let mut run = Run::new(element);
        if !text.is_empty() {
            run.set_text(text)?;
        }
        Ok(run)
    }

    /// Number of direct run children
    pub fn run_count(&self) -> usize {
        self.element.children_with_tag("w:r").count()
    }

    /// Direct run children, in document order
    pub fn runs(&self) -> impl Iterator<Item = &Element> {
        self.element.children_with_tag("w:r")
    }

    /// Mutable view of the `ordinal`-th direct run
    pub fn run_mut(&mut self, ordinal: usize) -> Option<Run<'_>> {
        let index = annotations::run_child_index(self.element, ordinal)?;
        Some(Run::new(&mut self.element.children_mut()[index]))
    }

    /// Paragraph style id from `w:pPr/w:pStyle`, `None` when absent
    pub fn style(&self) -> Option<&str> {
        self.element
            .find("w:pPr")
            .and_then(|ppr| ppr.find("w:pStyle"))
            .and_then(w_val)
    }

    /// Set or clear the paragraph style.
    ///
    /// `None` removes only the `w:pStyle` element, never the `w:pPr`
    /// singleton.
    pub fn set_style(&mut self, style: Option<&str>) -> Result<()> {
        let ppr = self.element.get_or_add("w:pPr")?;
        match style {
            Some(value) => ppr.get_or_add("w:pStyle")?.set_attr("w:val", value),
            None => ppr.remove_singleton("w:pStyle")?,
        }
        Ok(())
    }

    /// Alignment from `w:pPr/w:jc` (`left`, `center`, `right`, `both`, ...)
    pub fn alignment(&self) -> Option<&str> {
        self.element
            .find("w:pPr")
            .and_then(|ppr| ppr.find("w:jc"))
            .and_then(w_val)
    }

    /// Set or clear the alignment, same shape as [`Paragraph::set_style`]
    pub fn set_alignment(&mut self, alignment: Option<&str>) -> Result<()> {
        let ppr = self.element.get_or_add("w:pPr")?;
        match alignment {
            Some(value) => ppr.get_or_add("w:jc")?.set_attr("w:val", value),
            None => ppr.remove_singleton("w:jc")?,
        }
        Ok(())
    }

    /// The `w:numPr` element under `w:pPr`, when this paragraph carries
    /// numbering linkage
    pub fn numbering_props(&self) -> Option<&Element> {
        self.element
            .find("w:pPr")
            .and_then(|ppr| ppr.find("w:numPr"))
    }

    /// Surround the `ordinal`-th run with comment range markers for `id` and
    /// insert the reference run. See [`annotations::mark_span_comment`].
    pub fn mark_run_comment(&mut self, ordinal: usize, id: u64) -> Result<()> {
        annotations::mark_run_comment(self.element, ordinal, id)
    }

    /// Surround the runs `first..=last` with comment range markers for `id`
    /// and insert the reference run
    pub fn mark_span_comment(&mut self, first: usize, last: usize, id: u64) -> Result<()> {
        annotations::mark_span_comment(self.element, first, last, id)
    }

    /// Id carried by a `w:commentRangeStart` marker, when exactly one exists
    pub fn comment_id(&self) -> Option<u64> {
        let mut ids = self
            .element
            .children_with_tag("w:commentRangeStart")
            .filter_map(crate::xml::w_id);
        match (ids.next(), ids.next()) {
            (Some(id), None) => Some(id),
            _ => None,
        }
    }

    /// Ids of all footnote references inside this paragraph's runs
    pub fn footnote_ids(&self) -> Vec<u64> {
        self.element
            .children_with_tag("w:r")
            .flat_map(|r| r.children_with_tag("w:footnoteReference"))
            .filter_map(crate::xml::w_id)
            .collect()
    }

    /// Append a tracked insertion (`w:ins`) containing a run with `text`
    pub fn add_tracked_insertion(
        &mut self,
        id: u64,
        author: &str,
        date: &str,
        text: &str,
    ) -> Result<()> {
        let ins = self.element.add_ordered("w:ins")?;
        set_revision_attrs(ins, id, author, date);
        let run = ins.add_ordered("w:r")?;
        Run::new(run).set_text(text)?;
        Ok(())
    }

    /// Append a tracked deletion (`w:del`) containing a run with `text` as
    /// `w:delText` content
    pub fn add_tracked_deletion(
        &mut self,
        id: u64,
        author: &str,
        date: &str,
        text: &str,
    ) -> Result<()> {
        let del = self.element.add_ordered("w:del")?;
        set_revision_attrs(del, id, author, date);
        let run = del.add_ordered("w:r")?;
        Run::new(run).set_deleted_text(text)?;
        Ok(())
    }
}

/// Text projection of a `w:p` element; see [`Paragraph::text`]
pub(crate) fn text_of(paragraph: &Element) -> String {
    let mut out = String::new();
    for child in paragraph.children() {
        match child.tag() {
            "w:r" => out.push_str(&super::run::text_of(child)),
            "w:hyperlink" => {
                for nested in child.children_with_tag("w:r") {
                    out.push_str(&super::run::text_of(nested));
                }
            }
            _ => {}
        }
    }
    out
}

fn set_revision_attrs(wrapper: &mut Element, id: u64, author: &str, date: &str) {
    wrapper.set_attr("w:id", id.to_string());
    wrapper.set_attr("w:author", author);
    wrapper.set_attr("w:date", date);
}
