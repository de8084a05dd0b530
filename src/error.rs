//! Error types for the pdf2md library.

use std::io;
use thiserror::Error;

/// Result type alias for pdf2md operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a PDF to Markdown.
///
/// Only input and output failures reach the caller of a whole-document
/// conversion. Page-level failures are recovered by the converter and
/// reported through [`ConversionStats`](crate::ConversionStats).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the input or writing the output file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as a PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header carries a version we do not understand.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The PDF structure could not be decoded.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Text runs of a page could not be retrieved.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Link annotations of a page could not be retrieved.
    #[error("Annotation error: {0}")]
    Annotation(String),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
