//! Node kind vocabularies.
//!
//! The names match pandoc's JSON type tags exactly; they are part of the
//! interchange format and must not be renamed.

use crate::ast::metadata::keys;
use crate::error::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Structural (block-level) node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    Plain,
    Para,
    CodeBlock,
    RawBlock,
    BlockQuote,
    OrderedList,
    BulletList,
    DefinitionList,
    Header,
    HorizontalRule,
    Table,
    Div,
}

impl BlockKind {
    pub const ALL: [BlockKind; 12] = [
        BlockKind::Plain,
        BlockKind::Para,
        BlockKind::CodeBlock,
        BlockKind::RawBlock,
        BlockKind::BlockQuote,
        BlockKind::OrderedList,
        BlockKind::BulletList,
        BlockKind::DefinitionList,
        BlockKind::Header,
        BlockKind::HorizontalRule,
        BlockKind::Table,
        BlockKind::Div,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Plain => "Plain",
            BlockKind::Para => "Para",
            BlockKind::CodeBlock => "CodeBlock",
            BlockKind::RawBlock => "RawBlock",
            BlockKind::BlockQuote => "BlockQuote",
            BlockKind::OrderedList => "OrderedList",
            BlockKind::BulletList => "BulletList",
            BlockKind::DefinitionList => "DefinitionList",
            BlockKind::Header => "Header",
            BlockKind::HorizontalRule => "HorizontalRule",
            BlockKind::Table => "Table",
            BlockKind::Div => "Div",
        }
    }

    /// Metadata keys this kind accepts besides internal (`_`-prefixed) ones.
    pub fn metadata_keys(self) -> &'static [&'static str] {
        match self {
            BlockKind::CodeBlock => &[
                keys::LANG,
                keys::OUTPUT,
                keys::STREAM,
                keys::EXECUTION_COUNT,
            ],
            BlockKind::RawBlock => &[keys::FORMAT],
            BlockKind::Header => &[keys::LEVEL, keys::ID],
            BlockKind::OrderedList => &[keys::START],
            BlockKind::Div => &[keys::ID, keys::CLASS],
            _ => &[],
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ValidationError::UnknownBlockKind(s.to_string()))
    }
}

/// Span-level node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InlineKind {
    Str,
    Emph,
    Strong,
    Strikeout,
    Code,
    Space,
    LineBreak,
    Math,
    Link,
    Image,
}

impl InlineKind {
    pub const ALL: [InlineKind; 10] = [
        InlineKind::Str,
        InlineKind::Emph,
        InlineKind::Strong,
        InlineKind::Strikeout,
        InlineKind::Code,
        InlineKind::Space,
        InlineKind::LineBreak,
        InlineKind::Math,
        InlineKind::Link,
        InlineKind::Image,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InlineKind::Str => "Str",
            InlineKind::Emph => "Emph",
            InlineKind::Strong => "Strong",
            InlineKind::Strikeout => "Strikeout",
            InlineKind::Code => "Code",
            InlineKind::Space => "Space",
            InlineKind::LineBreak => "LineBreak",
            InlineKind::Math => "Math",
            InlineKind::Link => "Link",
            InlineKind::Image => "Image",
        }
    }

    /// Metadata keys this kind accepts besides internal (`_`-prefixed) ones.
    pub fn metadata_keys(self) -> &'static [&'static str] {
        match self {
            InlineKind::Link | InlineKind::Image => &[keys::URL, keys::TITLE],
            InlineKind::Math => &[keys::DISPLAY],
            _ => &[],
        }
    }
}

impl fmt::Display for InlineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InlineKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InlineKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ValidationError::UnknownInlineKind(s.to_string()))
    }
}
