//! Error types for docx-author

use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML encoding error: {0}")]
    XmlEncoding(#[from] quick_xml::encoding::EncodingError),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// A child tag was requested that the parent's element sequence does not
    /// declare. Always a programming error in the calling code, never a data
    /// error in the document being edited.
    #[error("'{child}' is not a declared child of '{parent}'")]
    SchemaViolation { parent: String, child: String },

    /// An annotation range is malformed: an endpoint is out of range, the
    /// endpoints sit in different paragraphs, or the end precedes the start.
    #[error("invalid annotation range: {0}")]
    InvalidRange(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
