//! Comments collection (the w:comments part tree)

use crate::document::Paragraph;
use crate::error::Result;
use crate::xml::{w_id, wml_namespaces, Element};

/// The comment collection backing `word/comments.xml`.
///
/// Comments are stored as `w:comment` children of a `w:comments` root, each
/// carrying id, author, initials and date attributes plus body paragraphs.
/// Ids are allocated here and are unique for the lifetime of the document;
/// the in-body anchors referencing them are placed by the range linker.
#[derive(Debug)]
pub struct Comments {
    element: Element,
}

impl Comments {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            element: Element::new("w:comments"),
        }
    }

    /// Rebuild the collection from an existing `w:comments` tree
    pub fn from_element(element: Element) -> Self {
        debug_assert_eq!(element.tag(), "w:comments");
        Self { element }
    }

    /// Number of comments
    pub fn len(&self) -> usize {
        self.element.children_with_tag("w:comment").count()
    }

    /// Whether the collection holds no comments
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The id the next added comment will receive
    pub fn next_id(&self) -> u64 {
        self.element
            .children_with_tag("w:comment")
            .filter_map(w_id)
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Add a comment with the given metadata and body text, returning its id.
    ///
    /// The body is a single `CommentText`-styled paragraph containing `text`.
    pub fn add(&mut self, author: &str, initials: &str, timestamp: &str, text: &str) -> Result<u64> {
        let id = self.next_id();
        let comment = self.element.add_ordered("w:comment")?;
        comment.set_attr("w:id", id.to_string());
        comment.set_attr("w:author", author);
        comment.set_attr("w:initials", initials);
        comment.set_attr("w:date", timestamp);

        let body = comment.add_ordered("w:p")?;
        let mut paragraph = Paragraph::new(body);
        paragraph.set_style(Some("CommentText"))?;
        paragraph.set_text(text)?;
        Ok(id)
    }

    /// The `w:comment` element with the given id
    pub fn comment(&self, id: u64) -> Option<&Element> {
        self.element
            .children_with_tag("w:comment")
            .find(|c| w_id(c) == Some(id))
    }

    /// Serialize as a standalone `comments.xml` part
    pub fn to_part_xml(&self) -> Result<String> {
        let mut root = self.element.clone();
        for (name, uri) in wml_namespaces() {
            root.set_attr(name, uri);
        }
        root.to_part_xml()
    }
}

impl Default for Comments {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive comment initials from an author name.
///
/// All uppercase letters of the name; when the name has none, the first
/// character of each whitespace-separated token, uppercased. A documented
/// heuristic for the common case, not an internationalized-name algorithm.
pub fn derive_initials(author: &str) -> String {
    let upper: String = author.chars().filter(|c| c.is_uppercase()).collect();
    if !upper.is_empty() {
        return upper;
    }
    author
        .split_whitespace()
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
