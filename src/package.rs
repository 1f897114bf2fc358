//! Minimal OPC packaging for authored documents
//!
//! Write-only: assembles `[Content_Types].xml`, the relationship parts and
//! the document/comments/footnotes parts into a ZIP container Word accepts.
//! Reading existing packages is out of scope; externally produced trees
//! enter through [`crate::Document::from_document_xml`].

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::{Cursor, Seek, Write};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::xml::{CT, PR};

/// Content type of the main document part
pub const MAIN_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
/// Content type of the comments part
pub const COMMENTS: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.comments+xml";
/// Content type of the footnotes part
pub const FOOTNOTES: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.footnotes+xml";
/// Content type of relationship parts
pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
/// Generic XML content type
pub const XML: &str = "application/xml";

/// Well-known relationship types
pub mod rel_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const COMMENTS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";
    pub const FOOTNOTES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footnotes";
}

/// Write `document` as a complete `.docx` package.
///
/// The comments and footnotes parts are only emitted (and only referenced
/// from the content types and relationships) when their collections are
/// non-empty.
pub fn write_package<W: Write + Seek>(document: &Document, writer: W) -> Result<()> {
    let mut zip = ZipWriter::new(writer);
    let options: FileOptions<()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    let has_comments = !document.comments().is_empty();
    let has_footnotes = !document.footnotes().is_empty();
    log::debug!(
        "packaging document (comments part: {has_comments}, footnotes part: {has_footnotes})"
    );

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(content_types_xml(has_comments, has_footnotes)?.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(
        relationships_xml(&[(rel_types::OFFICE_DOCUMENT, "word/document.xml")])?.as_bytes(),
    )?;

    let mut document_rels: Vec<(&str, &str)> = Vec::new();
    if has_comments {
        document_rels.push((rel_types::COMMENTS, "comments.xml"));
    }
    if has_footnotes {
        document_rels.push((rel_types::FOOTNOTES, "footnotes.xml"));
    }
    if !document_rels.is_empty() {
        zip.start_file("word/_rels/document.xml.rels", options)?;
        zip.write_all(relationships_xml(&document_rels)?.as_bytes())?;
    }

    zip.start_file("word/document.xml", options)?;
    zip.write_all(document.document_xml()?.as_bytes())?;

    if has_comments {
        zip.start_file("word/comments.xml", options)?;
        zip.write_all(document.comments().to_part_xml()?.as_bytes())?;
    }
    if has_footnotes {
        zip.start_file("word/footnotes.xml", options)?;
        zip.write_all(document.footnotes().to_part_xml()?.as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}

fn content_types_xml(has_comments: bool, has_footnotes: bool) -> Result<String> {
    let mut buffer = Cursor::new(Vec::new());
    let mut xml = Writer::new(&mut buffer);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut types = BytesStart::new("Types");
    types.push_attribute(("xmlns", CT));
    xml.write_event(Event::Start(types))?;

    for (extension, content_type) in [("rels", RELATIONSHIPS), ("xml", XML)] {
        let mut default = BytesStart::new("Default");
        default.push_attribute(("Extension", extension));
        default.push_attribute(("ContentType", content_type));
        xml.write_event(Event::Empty(default))?;
    }

    let mut overrides = vec![("/word/document.xml", MAIN_DOCUMENT)];
    if has_comments {
        overrides.push(("/word/comments.xml", COMMENTS));
    }
    if has_footnotes {
        overrides.push(("/word/footnotes.xml", FOOTNOTES));
    }
    for (part_name, content_type) in overrides {
        let mut override_elem = BytesStart::new("Override");
        override_elem.push_attribute(("PartName", part_name));
        override_elem.push_attribute(("ContentType", content_type));
        xml.write_event(Event::Empty(override_elem))?;
    }

    xml.write_event(Event::End(BytesEnd::new("Types")))?;
    String::from_utf8(buffer.into_inner()).map_err(|e| Error::InvalidDocument(e.to_string()))
}

/// Serialize a `.rels` part; ids are assigned `rId1..` in slice order
fn relationships_xml(relationships: &[(&str, &str)]) -> Result<String> {
    let mut buffer = Cursor::new(Vec::new());
    let mut xml = Writer::new(&mut buffer);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut root = BytesStart::new("Relationships");
    root.push_attribute(("xmlns", PR));
    xml.write_event(Event::Start(root))?;

    for (index, (rel_type, target)) in relationships.iter().enumerate() {
        let mut rel = BytesStart::new("Relationship");
        rel.push_attribute(("Id", format!("rId{}", index + 1).as_str()));
        rel.push_attribute(("Type", *rel_type));
        rel.push_attribute(("Target", *target));
        xml.write_event(Event::Empty(rel))?;
    }

    xml.write_event(Event::End(BytesEnd::new("Relationships")))?;
    String::from_utf8(buffer.into_inner()).map_err(|e| Error::InvalidDocument(e.to_string()))
}
