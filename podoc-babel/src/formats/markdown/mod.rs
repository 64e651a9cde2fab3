//! Markdown format implementation
//!
//! This module implements bidirectional conversion between the podoc AST and CommonMark
//! Markdown. It is also the collaborator the notebook converter uses for markdown cells,
//! through the [`MarkdownAdapter`] trait.
//!
//! # Library Choice
//!
//! We use the `comrak` crate for Markdown parsing and serialization: a single crate for
//! both directions, CommonMark compliant, with the GFM extensions we need (tables,
//! strikethrough, autolinks, dollar math).
//!
//! # Element Mapping Table
//!
//! | AST Element          | Markdown Equivalent     | Notes                                   |
//! |----------------------|-------------------------|-----------------------------------------|
//! | Para / Plain         | Paragraph               | Items of tight lists read as Plain      |
//! | Header               | Heading (# ## ###)      | `level` metadata                        |
//! | CodeBlock            | Fenced code block       | `lang` ↔ info string                    |
//! | RawBlock             | HTML block              | Read with `format` = "html"             |
//! | BlockQuote           | Block quote (>)         | Direct mapping                          |
//! | BulletList           | List (* item)           | One Div per item                        |
//! | OrderedList          | List (1. item)          | `start` metadata                        |
//! | HorizontalRule       | Thematic break          | Direct mapping                          |
//! | Table                | GFM table               | Div rows, header row has class "header" |
//! | Str / Space          | Text                    | Text is split on whitespace             |
//! | LineBreak            | Hard break              | Soft breaks read as Space               |
//! | Emph/Strong/Strikeout| `*` / `**` / `~~`       | Direct mapping                          |
//! | Code / Math          | `` `code` `` / `$math$` | Math `display` ↔ `$$`                   |
//! | Link / Image         | `[..](url)` / `![..](url)` | `url` and `title` metadata           |
//!
//! # Lossy Conversions
//!
//! - Div and DefinitionList have no Markdown counterpart: their content is written in place
//! - Notebook bookkeeping metadata (`output`, `stream`, `execution_count`) is not written
//! - Multiple blank lines → single blank line (Markdown normalization)

pub mod parser;
pub mod serializer;

use crate::ast::{Block, Document};
use crate::error::FormatError;
use crate::format::Format;

/// Block-level Markdown reading and writing.
///
/// The notebook converter is generic over this seam so that markdown cells can be
/// handled by any Markdown implementation.
pub trait MarkdownAdapter {
    fn read_markdown(&self, text: &str) -> Result<Vec<Block>, FormatError>;

    fn write_markdown(&self, blocks: &[Block]) -> Result<String, FormatError>;
}

/// Format implementation for Markdown, backed by comrak
#[derive(Debug, Default, Clone, Copy)]
pub struct Markdown;

impl MarkdownAdapter for Markdown {
    fn read_markdown(&self, text: &str) -> Result<Vec<Block>, FormatError> {
        parser::parse_from_markdown(text)
    }

    fn write_markdown(&self, blocks: &[Block]) -> Result<String, FormatError> {
        serializer::serialize_to_markdown(blocks)
    }
}

impl Format for Markdown {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown format"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        self.read_markdown(source).map(Document::with_blocks)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        self.write_markdown(&doc.blocks)
    }
}
