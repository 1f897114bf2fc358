//! Integration test: authoring API

use docx_author::{Document, RunRef};

#[test]
fn test_create_document_with_text() {
    let mut doc = Document::new();
    doc.add_heading("My Document Title", 1).unwrap();
    doc.add_paragraph("Hello from Rust!").unwrap();
    doc.add_paragraph("This is the second paragraph.").unwrap();

    assert_eq!(doc.paragraph_count(), 3);
    assert_eq!(
        doc.text(),
        "My Document Title\nHello from Rust!\nThis is the second paragraph."
    );
}

#[test]
fn test_document_xml_reparses_to_same_text() {
    let mut doc = Document::new();
    doc.add_heading("Title", 0).unwrap();
    doc.add_paragraph("first\tindented").unwrap();
    doc.add_paragraph("line one\nline two").unwrap();

    let xml = doc.document_xml().unwrap();
    assert!(xml.contains("<w:tab/>"));
    assert!(xml.contains("<w:br/>"));

    let reparsed = Document::from_document_xml(&xml).unwrap();
    assert_eq!(reparsed.paragraph_count(), 3);
    assert_eq!(reparsed.text(), doc.text());
}

#[test]
fn test_mutate_externally_loaded_tree() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:r>
        <w:t>Loaded content</w:t>
      </w:r>
    </w:p>
  </w:body>
</w:document>"#;

    let mut doc = Document::from_document_xml(xml).unwrap();
    assert_eq!(doc.text(), "Loaded content");

    // style the loaded paragraph; the properties element must lead the run
    let mut paragraph = doc.paragraph_mut(0).unwrap();
    paragraph.set_style(Some("Quote")).unwrap();
    let children: Vec<&str> = paragraph
        .element()
        .children()
        .iter()
        .map(|c| c.tag())
        .collect();
    assert_eq!(children, vec!["w:pPr", "w:r"]);
}

#[test]
fn test_comment_markers_serialize_in_order() {
    let mut doc = Document::new();
    doc.add_paragraph("The annotated claim").unwrap();
    let id = doc
        .add_comment_on_run(
            RunRef::new(0, 0),
            "Ryan Mannion",
            "2024-06-01T10:30:00Z",
            "needs a citation",
            None,
        )
        .unwrap();
    assert_eq!(id, 0);

    let xml = doc.document_xml().unwrap();
    let start = xml.find("<w:commentRangeStart").unwrap();
    let text = xml.find("The annotated claim").unwrap();
    let end = xml.find("<w:commentRangeEnd").unwrap();
    let reference = xml.find("<w:commentReference").unwrap();
    assert!(start < text, "range start precedes the annotated run");
    assert!(text < end, "range end follows the annotated run");
    assert!(end < reference, "reference run follows the range end");
}

#[test]
fn test_comment_span_two_runs() {
    let mut doc = Document::new();
    {
        let mut paragraph = doc.add_paragraph("").unwrap();
        paragraph.add_run("first half, ").unwrap();
        paragraph.add_run("second half").unwrap();
    }
    doc.add_comment(
        RunRef::new(0, 0),
        RunRef::new(0, 1),
        "BlackBoiler",
        "2024-06-01T10:30:00Z",
        "span comment",
        None,
    )
    .unwrap();

    let comment = doc.comments().comment(0).unwrap();
    assert_eq!(comment.attr("w:initials"), Some("BB"));

    let mut paragraph = doc.paragraph_mut(0).unwrap();
    assert_eq!(paragraph.comment_id(), Some(0));
    // both original runs still read back, markers are zero-width
    assert_eq!(paragraph.text(), "first half, second half");
}

#[test]
fn test_footnote_end_to_end() {
    let mut doc = Document::new();
    doc.add_paragraph("A cited statement.").unwrap();
    let id = doc.add_footnote(0, "Source: somewhere.").unwrap();

    let footnote = doc.footnotes().footnote(id).unwrap();
    assert_eq!(footnote.attr("w:id"), Some("2"));

    let xml = doc.document_xml().unwrap();
    assert!(xml.contains(&format!("<w:footnoteReference w:id=\"{id}\"/>")));

    let part = doc.footnotes().to_part_xml().unwrap();
    assert!(part.contains("Source: somewhere."));
    assert!(part.contains("w:type=\"separator\""));
}

#[test]
fn test_tracked_changes_serialize() {
    let mut doc = Document::new();
    {
        let mut paragraph = doc.add_paragraph("kept text ").unwrap();
        paragraph
            .add_tracked_deletion(1, "Reviewer", "2024-06-01T10:30:00Z", "dropped text")
            .unwrap();
        paragraph
            .add_tracked_insertion(2, "Reviewer", "2024-06-01T10:30:00Z", "new text")
            .unwrap();
    }

    let xml = doc.document_xml().unwrap();
    assert!(xml.contains("<w:del "));
    assert!(xml.contains("<w:delText>dropped text</w:delText>"));
    assert!(xml.contains("<w:ins "));
    assert!(xml.contains("<w:t>new text</w:t>"));
}

#[test]
fn test_fake_list_markers_opt_in() {
    let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="5"/></w:numPr></w:pPr>
      <w:r><w:t>alpha</w:t></w:r>
    </w:p>
    <w:p>
      <w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="5"/></w:numPr></w:pPr>
      <w:r><w:t>beta</w:t></w:r>
    </w:p>
  </w:body>
</w:document>"#;

    let mut doc = Document::from_document_xml(xml).unwrap();
    // loading alone never rewrites anything
    assert_eq!(doc.text(), "alpha\nbeta");

    doc.apply_fake_list_markers();
    assert_eq!(doc.text(), "1) alpha\n2) beta");
}

#[test]
fn test_save_to_file() {
    let output_path = std::path::Path::new("target/test_output.docx");

    let mut doc = Document::new();
    doc.add_paragraph("Test document created by docx-author").unwrap();
    doc.add_paragraph("This is a test paragraph.").unwrap();
    doc.save(output_path).expect("Should save to file");

    assert!(output_path.exists(), "Output file should exist");
    let bytes = std::fs::read(output_path).unwrap();
    assert_eq!(&bytes[0..2], b"PK", "Should be valid ZIP file");

    std::fs::remove_file(output_path).ok();
}

#[test]
fn test_package_bytes() {
    let mut doc = Document::new();
    doc.add_heading("Packaged", 1).unwrap();
    doc.add_page_break().unwrap();
    doc.add_paragraph("After the break.").unwrap();

    let bytes = doc.to_bytes().expect("Should serialize to bytes");
    assert!(!bytes.is_empty(), "Should produce non-empty output");
    assert_eq!(&bytes[0..2], b"PK", "Should be valid ZIP file");
}
