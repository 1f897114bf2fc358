//! # docx-author
//!
//! Schema-aware authoring of WordprocessingML, the XML dialect inside
//! `.docx` files.
//!
//! ## Features
//!
//! - Ordered tree mutation: children land in their declared schema position
//!   no matter the call order
//! - Lossless plain-text encoding into run content (tabs, line breaks,
//!   whitespace preservation) and back
//! - Comment ranges, footnotes, tracked insertions/deletions
//! - Minimal `.docx` packaging of authored content
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docx_author::{Document, RunRef};
//!
//! let mut doc = Document::new();
//! doc.add_heading("Findings", 1)?;
//! doc.add_paragraph("The claim\tneeds review.")?;
//! doc.add_comment_on_run(
//!     RunRef::new(1, 0),
//!     "Ryan Mannion",
//!     "2024-06-01T10:30:00Z",
//!     "citation missing",
//!     None,
//! )?;
//! doc.save("reviewed.docx")?;
//! ```

pub mod document;
pub mod error;
pub mod package;
pub mod schema;
pub mod xml;

pub use document::{
    derive_initials, Body, BreakType, Comments, Document, Footnotes, Paragraph, Run, RunContent,
    RunRef,
};
pub use error::{Error, Result};
pub use xml::Element;
