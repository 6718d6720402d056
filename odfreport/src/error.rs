//! Error types for report generation

use crate::xml::XmlError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a generation or extraction pass
///
/// Missing placeholders and missing style catalogs are not errors; they are
/// skipped with a debug log.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Template file does not exist
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// A required content part is missing from the template package
    #[error("Template is missing required part '{0}'")]
    MissingPart(String),

    /// Reading or writing a file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The template package is not a readable ZIP archive
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A content part could not be parsed or serialized
    #[error("Invalid XML in '{part}': {source}")]
    Xml {
        /// Name of the package entry
        part: String,
        /// Underlying parser error
        #[source]
        source: XmlError,
    },

    /// A rich-text value is not a well-formed fragment
    #[error("Malformed rich text for '{name}': {source}")]
    MalformedRichText {
        /// Placeholder name the fragment was bound to
        name: String,
        /// Underlying parser error
        #[source]
        source: XmlError,
    },
}
