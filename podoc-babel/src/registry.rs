//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available formats.
//! Formats can be registered and retrieved by name.

use crate::ast::Document;
use crate::error::FormatError;
use crate::format::Format;
use crate::formats::notebook::Resources;
use std::collections::HashMap;
use tracing::debug;

/// Registry of document formats
///
/// Provides a centralized registry for all available formats.
/// Formats can be registered and retrieved by name.
///
/// # Examples
///
/// ```ignore
/// let mut registry = FormatRegistry::new();
/// registry.register(MyFormat);
///
/// let format = registry.get("my-format")?;
/// let doc = format.parse("source text")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Detect format from filename based on file extension
    ///
    /// Returns the format name if a matching extension is found, or None otherwise.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let registry = FormatRegistry::default();
    /// assert_eq!(registry.detect_format_from_filename("doc.ipynb"), Some("notebook".to_string()));
    /// assert_eq!(registry.detect_format_from_filename("doc.md"), Some("markdown".to_string()));
    /// assert_eq!(registry.detect_format_from_filename("doc.unknown"), None);
    /// ```
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        // Extract extension from filename
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?;

        // Search for a format that supports this extension
        for format in self.formats.values() {
            if format.file_extensions().contains(&extension) {
                return Some(format.name().to_string());
            }
        }

        None
    }

    fn parser(&self, format: &str) -> Result<&dyn Format, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support parsing"
            )));
        }
        Ok(fmt)
    }

    fn serializer(&self, format: &str) -> Result<&dyn Format, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        Ok(fmt)
    }

    /// Parse source text using the specified format
    pub fn parse(&self, source: &str, format: &str) -> Result<Document, FormatError> {
        self.parser(format)?.parse(source)
    }

    /// Parse source text, also collecting the resources it embeds
    pub fn parse_with_resources(
        &self,
        source: &str,
        format: &str,
    ) -> Result<(Document, Resources), FormatError> {
        self.parser(format)?.parse_with_resources(source)
    }

    /// Serialize a document using the specified format
    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        self.serializer(format)?.serialize(doc)
    }

    /// Serialize a document, embedding the resources it references
    pub fn serialize_with_resources(
        &self,
        doc: &Document,
        format: &str,
        resources: &Resources,
    ) -> Result<String, FormatError> {
        self.serializer(format)?
            .serialize_with_resources(doc, resources)
    }

    /// Convert source text from one format to another through the AST
    ///
    /// `resources` are made available to the target format; the returned mapping
    /// holds the resources extracted from the source together with them.
    pub fn convert(
        &self,
        source: &str,
        from: &str,
        to: &str,
        resources: &Resources,
    ) -> Result<(String, Resources), FormatError> {
        let (doc, mut extracted) = self.parse_with_resources(source, from)?;
        for (name, bytes) in resources {
            extracted
                .entry(name.clone())
                .or_insert_with(|| bytes.clone());
        }
        debug!(
            from,
            to,
            blocks = doc.blocks.len(),
            resources = extracted.len(),
            "converting"
        );
        let output = self.serialize_with_resources(&doc, to, &extracted)?;
        Ok((output, extracted))
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Register built-in formats
        registry.register(crate::formats::pandoc::PandocJsonFormat);
        registry.register(crate::formats::markdown::Markdown);
        registry.register(crate::formats::notebook::NotebookFormat::default());
        registry.register(crate::formats::treeviz::TreevizFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
