//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! The trait provides a uniform interface for reading and writing documents.

use crate::ast::Document;
use crate::error::FormatError;
use crate::formats::notebook::Resources;

/// Trait for document formats
///
/// Implementors provide bidirectional conversion between a text representation and the AST.
/// Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_parsing(&self) -> bool {
///         true
///     }
///
///     fn parse(&self, source: &str) -> Result<Document, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "json", "markdown", "notebook")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format (e.g., ["md", "markdown"])
    ///
    /// Returns a slice of file extensions without the leading dot.
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → Document)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (Document → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a Document
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &str) -> Result<Document, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a Document into source text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _doc: &Document) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }

    /// Parse source text, also returning the binary resources it embeds.
    ///
    /// Formats without embedded resources can rely on the default
    /// implementation, which delegates to [`Format::parse`].
    fn parse_with_resources(&self, source: &str) -> Result<(Document, Resources), FormatError> {
        self.parse(source).map(|doc| (doc, Resources::new()))
    }

    /// Serialize a Document, embedding the resources it references.
    ///
    /// Formats that only reference resources by filename can rely on the
    /// default implementation, which delegates to [`Format::serialize`].
    fn serialize_with_resources(
        &self,
        doc: &Document,
        _resources: &Resources,
    ) -> Result<String, FormatError> {
        self.serialize(doc)
    }
}
