//! Error types for AST construction, decoding and format operations

use thiserror::Error;

/// Malformed node construction.
///
/// Raised at the point where the offending node is built, never deferred to
/// serialization time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The name is not part of the Block vocabulary
    #[error("unknown block kind '{0}'")]
    UnknownBlockKind(String),
    /// The name is not part of the Inline vocabulary
    #[error("unknown inline kind '{0}'")]
    UnknownInlineKind(String),
    /// A Block was given as the child of an Inline
    #[error("inline '{parent}' cannot contain block '{child}'")]
    BlockInInline { parent: String, child: String },
    /// A child was appended to an Inline holding literal text
    #[error("inline '{0}' holds literal text and cannot take child nodes")]
    ChildOfLiteral(String),
    /// The metadata key is outside the closed set recognized for the kind
    #[error("metadata key '{key}' is not recognized for '{kind}'")]
    UnknownMetadataKey { kind: String, key: String },
}

/// Malformed pandoc-compatible JSON.
///
/// Unknown node tags are not errors: they are dropped and their children are
/// spliced into the parent.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid document shape: {0}")]
    Shape(String),
    #[error("invalid node: {0}")]
    InvalidNode(String),
    #[error("inline '{0}' found at the top level of the document")]
    InlineAtTopLevel(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Failures of the notebook reader and writer.
#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("invalid notebook JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The document is not a notebook nbformat can read
    #[error("invalid notebook: {0}")]
    Format(String),
    /// An image output references a file missing from the resources mapping
    #[error("resource not found: {0}")]
    ResourceNotFound(String),
    /// A binary output payload is not valid base64
    #[error("invalid base64 payload for '{mime}' output: {source}")]
    InvalidResource {
        mime: String,
        #[source]
        source: base64::DecodeError,
    },
    #[error("markdown cell conversion failed: {0}")]
    Markdown(#[from] FormatError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the operation
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<DecodeError> for FormatError {
    fn from(err: DecodeError) -> Self {
        FormatError::ParseError(err.to_string())
    }
}

impl From<ValidationError> for FormatError {
    fn from(err: ValidationError) -> Self {
        FormatError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for FormatError {
    fn from(err: std::io::Error) -> Self {
        FormatError::Io(err.to_string())
    }
}

impl From<NotebookError> for FormatError {
    fn from(err: NotebookError) -> Self {
        match err {
            NotebookError::Markdown(inner) => inner,
            NotebookError::ResourceNotFound(_) => FormatError::SerializationError(err.to_string()),
            other => FormatError::ParseError(other.to_string()),
        }
    }
}
