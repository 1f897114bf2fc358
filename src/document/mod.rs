//! Document model - high-level API for authoring WordprocessingML

mod annotations;
mod body;
mod comments;
mod footnotes;
mod numbering;
mod paragraph;
mod run;

pub use annotations::{mark_run_comment, mark_span_comment};
pub use body::Body;
pub use comments::{derive_initials, Comments};
pub use footnotes::Footnotes;
pub use paragraph::Paragraph;
pub use run::{BreakType, Run, RunContent};

use crate::error::{Error, Result};
use crate::package;
use crate::xml::{document_namespaces, Element};
use std::path::Path;

/// Non-owning handle to a run in the document body: paragraph index plus
/// run ordinal within that paragraph.
///
/// Handles are positions, not references; they go stale when earlier
/// content is inserted or removed (comment marking inserts a reference run,
/// shifting later ordinals).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunRef {
    /// Paragraph index within the body
    pub paragraph: usize,
    /// Run ordinal within the paragraph
    pub run: usize,
}

impl RunRef {
    /// Handle to run `run` of paragraph `paragraph`
    pub fn new(paragraph: usize, run: usize) -> Self {
        Self { paragraph, run }
    }
}

/// A WordprocessingML document under construction: the body tree plus its
/// comments and footnotes collections.
#[derive(Debug)]
pub struct Document {
    document: Element,
    comments: Comments,
    footnotes: Footnotes,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        let mut document = Element::new("w:document");
        document
            .get_or_add("w:body")
            .expect("w:body is a declared child of w:document");
        Self {
            document,
            comments: Comments::new(),
            footnotes: Footnotes::new(),
        }
    }

    /// Build a document around an externally produced `document.xml` body.
    ///
    /// The tree is taken as-is; child order of loaded elements is not
    /// validated (only subsequent mutation maintains the declared order).
    pub fn from_document_xml(xml: &str) -> Result<Self> {
        let document = Element::parse_str(xml)?;
        if document.tag() != "w:document" {
            return Err(Error::InvalidDocument(format!(
                "expected w:document root, found {}",
                document.tag()
            )));
        }
        if document.find("w:body").is_none() {
            return Err(Error::InvalidDocument("missing w:body element".into()));
        }
        Ok(Self {
            document,
            comments: Comments::new(),
            footnotes: Footnotes::new(),
        })
    }

    fn body_element_mut(&mut self) -> &mut Element {
        self.document
            .find_mut("w:body")
            .expect("document always has a body")
    }

    fn body_element(&self) -> &Element {
        self.document
            .find("w:body")
            .expect("document always has a body")
    }

    /// Mutable view of the document body
    pub fn body_mut(&mut self) -> Body<'_> {
        Body::new(self.body_element_mut())
    }

    /// Append a paragraph containing `text` to the end of the body.
    ///
    /// `text` can contain tab (`\t`) characters, which are converted to the
    /// appropriate XML form for a tab, and newline (`\n`) or carriage return
    /// (`\r`) characters, each of which becomes a line break.
    pub fn add_paragraph(&mut self, text: &str) -> Result<Paragraph<'_>> {
        let element = self.body_element_mut().add_ordered("w:p")?;
        let mut paragraph = Paragraph::new(element);
        if !text.is_empty() {
            paragraph.set_text(text)?;
        }
        Ok(paragraph)
    }

    /// Append a paragraph with `text` and the given paragraph style
    pub fn add_paragraph_with_style(&mut self, text: &str, style: &str) -> Result<Paragraph<'_>> {
        let mut paragraph = self.add_paragraph(text)?;
        paragraph.set_style(Some(style))?;
        Ok(paragraph)
    }

    /// Append a heading paragraph.
    ///
    /// Level 0 uses the `Title` style, levels 1 through 9 use
    /// `Heading {level}`. Any other level is an [`Error::InvalidArgument`].
    pub fn add_heading(&mut self, text: &str, level: u8) -> Result<Paragraph<'_>> {
        if level > 9 {
            return Err(Error::InvalidArgument(format!(
                "heading level must be in range 0-9, got {level}"
            )));
        }
        let style = if level == 0 {
            "Title".to_string()
        } else {
            format!("Heading {level}")
        };
        self.add_paragraph_with_style(text, &style)
    }

    /// Append a paragraph containing only a page break
    pub fn add_page_break(&mut self) -> Result<()> {
        let mut paragraph = self.add_paragraph("")?;
        let mut run = paragraph.add_run("")?;
        run.add_break(BreakType::Page)?;
        Ok(())
    }

    /// Number of paragraphs in the body
    pub fn paragraph_count(&self) -> usize {
        self.body_element().children_with_tag("w:p").count()
    }

    /// Mutable view of the `index`-th paragraph
    pub fn paragraph_mut(&mut self, index: usize) -> Option<Paragraph<'_>> {
        let body = self.body_element_mut();
        let position = body
            .children()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.tag() == "w:p")
            .map(|(i, _)| i)
            .nth(index)?;
        Some(Paragraph::new(&mut body.children_mut()[position]))
    }

    /// All paragraph text, newline-separated
    pub fn text(&self) -> String {
        self.body_element()
            .children_with_tag("w:p")
            .map(paragraph::text_of)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Add a comment spanning the runs from `start` to `end`.
    ///
    /// Both handles must address runs of the same paragraph; cross-paragraph
    /// spans are rejected with [`Error::InvalidRange`]. When `initials` is
    /// `None` they are derived from `author` via [`derive_initials`].
    /// Returns the allocated comment id.
    pub fn add_comment(
        &mut self,
        start: RunRef,
        end: RunRef,
        author: &str,
        timestamp: &str,
        text: &str,
        initials: Option<&str>,
    ) -> Result<u64> {
        if start.paragraph != end.paragraph {
            return Err(Error::InvalidRange(format!(
                "comment span crosses paragraphs {} and {}",
                start.paragraph, end.paragraph
            )));
        }
        if start.paragraph >= self.paragraph_count() {
            return Err(Error::InvalidRange(format!(
                "no paragraph at index {}",
                start.paragraph
            )));
        }

        let initials = match initials {
            Some(given) => given.to_string(),
            None => derive_initials(author),
        };
        let id = self.comments.add(author, &initials, timestamp, text)?;

        let mut paragraph = self
            .paragraph_mut(start.paragraph)
            .expect("paragraph index checked above");
        paragraph.mark_span_comment(start.run, end.run, id)?;
        Ok(id)
    }

    /// Add a comment on a single run
    pub fn add_comment_on_run(
        &mut self,
        at: RunRef,
        author: &str,
        timestamp: &str,
        text: &str,
        initials: Option<&str>,
    ) -> Result<u64> {
        self.add_comment(at, at, author, timestamp, text, initials)
    }

    /// Add a footnote with body `text`, referenced from a new run appended
    /// to the `paragraph`-th paragraph. Returns the allocated footnote id.
    pub fn add_footnote(&mut self, paragraph: usize, text: &str) -> Result<u64> {
        if paragraph >= self.paragraph_count() {
            return Err(Error::InvalidArgument(format!(
                "no paragraph at index {paragraph}"
            )));
        }
        let id = self.footnotes.add(text)?;
        let mut target = self
            .paragraph_mut(paragraph)
            .expect("paragraph index checked above");
        let mut run = target.add_run("")?;
        run.add_footnote_reference(id)?;
        Ok(id)
    }

    /// The comments collection
    pub fn comments(&self) -> &Comments {
        &self.comments
    }

    /// The footnotes collection
    pub fn footnotes(&self) -> &Footnotes {
        &self.footnotes
    }

    /// Overwrite numbered paragraphs with plain-text list markers.
    ///
    /// Opt-in, lossy, and silently a no-op when numbering linkage is
    /// incomplete; see [`numbering`] module docs.
    pub fn apply_fake_list_markers(&mut self) {
        numbering::apply_fake_list_markers(self.body_element_mut());
    }

    /// Serialize the main document part (`document.xml`)
    pub fn document_xml(&self) -> Result<String> {
        let mut root = self.document.clone();
        for (name, uri) in document_namespaces() {
            root.set_attr(name, uri);
        }
        root.to_part_xml()
    }

    /// Save as a minimal `.docx` package
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        package::write_package(self, file)
    }

    /// Serialize as a minimal `.docx` package in memory
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        package::write_package(self, std::io::Cursor::new(&mut buf))?;
        Ok(buf)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
