//! Run view (w:r) and the run-content codec

use crate::error::Result;
use crate::xml::{parse_bool, w_val, Element};

/// Break type for `w:br`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BreakType {
    /// Line break within the paragraph
    #[default]
    TextWrapping,
    /// Page break
    Page,
    /// Column break
    Column,
}

impl BreakType {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("page") => BreakType::Page,
            Some("column") => BreakType::Column,
            _ => BreakType::TextWrapping,
        }
    }
}

/// One inline atom of run content, a typed view over a run child element.
///
/// Atom order within a run is the run's text; it is preserved by every
/// accessor and only discarded by the text setters, which replace content
/// wholesale.
#[derive(Clone, Debug, PartialEq)]
pub enum RunContent {
    /// Literal text (w:t)
    Text { text: String, preserve_space: bool },
    /// Tracked-deletion text (w:delText)
    DeletedText { text: String, preserve_space: bool },
    /// Tab (w:tab)
    Tab,
    /// Absolute-position tab (w:ptab)
    PositionalTab,
    /// Line, page or column break (w:br)
    Break {
        kind: BreakType,
        clear: Option<String>,
    },
    /// Carriage return (w:cr)
    CarriageReturn,
    /// Hyphen ineligible for a line-wrap position (w:noBreakHyphen)
    NoBreakHyphen,
    /// Drawing container, opaque (w:drawing)
    Drawing(Element),
    /// Page-break position recorded by Word's layout pass, read-only
    /// (w:lastRenderedPageBreak)
    RenderedPageBreak(Element),
}

impl RunContent {
    /// Typed view of a run child element; `None` for non-content children
    /// such as `w:rPr` or reference marks.
    pub fn from_element(element: &Element) -> Option<RunContent> {
        let atom = match element.tag() {
            "w:t" => RunContent::Text {
                text: element.text().to_string(),
                preserve_space: element.attr("xml:space") == Some("preserve"),
            },
            "w:delText" => RunContent::DeletedText {
                text: element.text().to_string(),
                preserve_space: element.attr("xml:space") == Some("preserve"),
            },
            "w:tab" => RunContent::Tab,
            "w:ptab" => RunContent::PositionalTab,
            "w:br" => RunContent::Break {
                kind: BreakType::from_attr(element.attr("w:type")),
                clear: element.attr("w:clear").map(str::to_string),
            },
            "w:cr" => RunContent::CarriageReturn,
            "w:noBreakHyphen" => RunContent::NoBreakHyphen,
            "w:drawing" => RunContent::Drawing(element.clone()),
            "w:lastRenderedPageBreak" => RunContent::RenderedPageBreak(element.clone()),
            _ => return None,
        };
        Some(atom)
    }
}

/// Mutable view over a `w:r` element.
///
/// The run's children are an optional leading `w:rPr` plus inline atoms; all
/// mutation goes through the ordered insertion engine so that invariant is
/// maintained.
#[derive(Debug)]
pub struct Run<'a> {
    element: &'a mut Element,
}

impl<'a> Run<'a> {
    /// Wrap an existing `w:r` element
    pub fn new(element: &'a mut Element) -> Self {
        debug_assert_eq!(element.tag(), "w:r");
        Self { element }
    }

    /// The underlying element
    pub fn element(&self) -> &Element {
        self.element
    }

    /// Typed atoms of this run, in document order
    pub fn content(&self) -> Vec<RunContent> {
        self.element
            .children()
            .iter()
            .filter_map(RunContent::from_element)
            .collect()
    }

    /// The textual content of this run.
    ///
    /// Inline atoms are translated to their text equivalent: tabs to `\t`,
    /// line breaks and carriage returns to `\n`, no-break hyphens to `-`.
    /// Page and column breaks, drawings and rendered page-breaks contribute
    /// no characters. Deleted text is excluded; see [`Run::deleted_text`].
    pub fn text(&self) -> String {
        text_of(self.element)
    }

    /// The tracked-deletion text of this run (`w:delText` content)
    pub fn deleted_text(&self) -> String {
        let mut out = String::new();
        for child in self.element.children() {
            match child.tag() {
                "w:delText" => out.push_str(child.text()),
                "w:tab" => out.push('\t'),
                "w:br" | "w:cr" => out.push('\n'),
                _ => {}
            }
        }
        out
    }

    /// Replace this run's content with `text`.
    ///
    /// Existing inline atoms are removed (drawings included; setting text
    /// replaces content wholesale), a `w:rPr` child is retained. Tab
    /// characters become `w:tab`, newline and carriage-return characters
    /// each become a `w:br`.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.clear_content();
        ContentAppender::new(TextTarget::Inserted).append(self.element, text)
    }

    /// Replace this run's content with tracked-deletion text (`w:delText`)
    pub fn set_deleted_text(&mut self, text: &str) -> Result<()> {
        self.clear_content();
        ContentAppender::new(TextTarget::Deleted).append(self.element, text)
    }

    /// Remove all children except a `w:rPr` element if present
    pub fn clear_content(&mut self) {
        self.element.retain_children(|c| c.tag() == "w:rPr");
    }

    /// Append a single `w:t` atom containing `text`, marking it
    /// space-preserving when it has leading or trailing whitespace
    pub fn add_text(&mut self, text: &str) -> Result<()> {
        add_text_atom(self.element, "w:t", text)
    }

    /// Append a `w:tab` atom
    pub fn add_tab(&mut self) -> Result<()> {
        self.element.add_ordered("w:tab")?;
        Ok(())
    }

    /// Append a `w:br` atom of the given kind
    pub fn add_break(&mut self, kind: BreakType) -> Result<()> {
        let br = self.element.add_ordered("w:br")?;
        match kind {
            BreakType::Page => br.set_attr("w:type", "page"),
            BreakType::Column => br.set_attr("w:type", "column"),
            BreakType::TextWrapping => {}
        }
        Ok(())
    }

    /// Character style id from `w:rPr/w:rStyle`, `None` when absent
    pub fn style(&self) -> Option<&str> {
        self.element
            .find("w:rPr")
            .and_then(|rpr| rpr.find("w:rStyle"))
            .and_then(w_val)
    }

    /// Set or clear the character style.
    ///
    /// `None` removes only the `w:rStyle` element, never the `w:rPr`
    /// singleton.
    pub fn set_style(&mut self, style: Option<&str>) -> Result<()> {
        let rpr = self.element.get_or_add("w:rPr")?;
        match style {
            Some(value) => rpr.get_or_add("w:rStyle")?.set_attr("w:val", value),
            None => rpr.remove_singleton("w:rStyle")?,
        }
        Ok(())
    }

    /// Check if bold
    pub fn bold(&self) -> bool {
        self.element
            .find("w:rPr")
            .and_then(|rpr| rpr.find("w:b"))
            .is_some_and(parse_bool)
    }

    /// Set bold
    pub fn set_bold(&mut self, bold: bool) -> Result<()> {
        let rpr = self.element.get_or_add("w:rPr")?;
        let b = rpr.get_or_add("w:b")?;
        if bold {
            b.remove_attr("w:val");
        } else {
            b.set_attr("w:val", "0");
        }
        Ok(())
    }

    /// Check if italic
    pub fn italic(&self) -> bool {
        self.element
            .find("w:rPr")
            .and_then(|rpr| rpr.find("w:i"))
            .is_some_and(parse_bool)
    }

    /// Set italic
    pub fn set_italic(&mut self, italic: bool) -> Result<()> {
        let rpr = self.element.get_or_add("w:rPr")?;
        let i = rpr.get_or_add("w:i")?;
        if italic {
            i.remove_attr("w:val");
        } else {
            i.set_attr("w:val", "0");
        }
        Ok(())
    }

    /// Style this run `FootnoteReference` and append a `w:footnoteReference`
    /// atom pointing at footnote `id`.
    ///
    /// No start/end marker pair exists for footnotes; the body lives in the
    /// footnotes part.
    pub fn add_footnote_reference(&mut self, id: u64) -> Result<()> {
        self.set_style(Some("FootnoteReference"))?;
        self.element
            .add_ordered("w:footnoteReference")?
            .set_attr("w:id", id.to_string());
        Ok(())
    }

    /// Style this run `FootnoteReference` and append the `w:footnoteRef`
    /// glyph shown at the head of a footnote body.
    pub fn add_footnote_mark(&mut self) -> Result<()> {
        self.set_style(Some("FootnoteReference"))?;
        self.element.add_ordered("w:footnoteRef")?;
        Ok(())
    }

    /// Append a `w:commentReference` atom pointing at comment `id`
    pub fn add_comment_reference(&mut self, id: u64) -> Result<()> {
        self.element
            .add_ordered("w:commentReference")?
            .set_attr("w:id", id.to_string());
        Ok(())
    }

    /// Id carried by a `w:footnoteReference` atom, when exactly one exists
    pub fn footnote_id(&self) -> Option<u64> {
        let mut ids = self
            .element
            .children_with_tag("w:footnoteReference")
            .filter_map(crate::xml::w_id);
        match (ids.next(), ids.next()) {
            (Some(id), None) => Some(id),
            _ => None,
        }
    }
}

/// Which text element the appender emits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TextTarget {
    /// Regular content, `w:t`
    Inserted,
    /// Tracked-deletion content, `w:delText`
    Deleted,
}

impl TextTarget {
    fn tag(self) -> &'static str {
        match self {
            TextTarget::Inserted => "w:t",
            TextTarget::Deleted => "w:delText",
        }
    }
}

/// Translates a plain string into inline atoms appended to a `w:r` element.
///
/// A two-state machine over the input characters: regular characters
/// accumulate in a buffer, a tab flushes the buffer and emits `w:tab`, a
/// newline or carriage return flushes and emits `w:br`. `\r\n` is not
/// special-cased; each character is handled independently, so the pair
/// yields two breaks. The final flush never emits an empty text element.
struct ContentAppender {
    buffer: String,
    target: TextTarget,
}

impl ContentAppender {
    fn new(target: TextTarget) -> Self {
        Self {
            buffer: String::new(),
            target,
        }
    }

    fn append(mut self, run: &mut Element, text: &str) -> Result<()> {
        for ch in text.chars() {
            self.add_char(run, ch)?;
        }
        self.flush(run)
    }

    fn add_char(&mut self, run: &mut Element, ch: char) -> Result<()> {
        match ch {
            '\t' => {
                self.flush(run)?;
                run.add_ordered("w:tab")?;
            }
            '\n' | '\r' => {
                self.flush(run)?;
                run.add_ordered("w:br")?;
            }
            _ => self.buffer.push(ch),
        }
        Ok(())
    }

    fn flush(&mut self, run: &mut Element) -> Result<()> {
        if !self.buffer.is_empty() {
            add_text_atom(run, self.target.tag(), &self.buffer)?;
            self.buffer.clear();
        }
        Ok(())
    }
}

/// Text projection of a `w:r` element; see [`Run::text`]
pub(crate) fn text_of(run: &Element) -> String {
    let mut out = String::new();
    for child in run.children() {
        match child.tag() {
            "w:t" => out.push_str(child.text()),
            "w:tab" | "w:ptab" => out.push('\t'),
            "w:br" => {
                if BreakType::from_attr(child.attr("w:type")) == BreakType::TextWrapping {
                    out.push('\n');
                }
            }
            "w:cr" => out.push('\n'),
            "w:noBreakHyphen" => out.push('-'),
            _ => {}
        }
    }
    out
}

/// Append a text atom, marking it space-preserving when stripping whitespace
/// would change it
fn add_text_atom(run: &mut Element, tag: &str, text: &str) -> Result<()> {
    let atom = run.add_ordered(tag)?;
    atom.set_text(text);
    if text.trim().len() < text.len() {
        atom.set_attr("xml:space", "preserve");
    }
    Ok(())
}
