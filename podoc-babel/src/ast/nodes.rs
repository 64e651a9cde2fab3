//! Core data structures of the AST.

use crate::ast::kinds::{BlockKind, InlineKind};
use crate::ast::metadata::{is_internal, keys, Metadata};
use crate::error::ValidationError;
use serde_json::Value;

/// A structural element. Its children are Blocks or Inlines, never text.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    kind: BlockKind,
    metadata: Metadata,
    children: Vec<Node>,
}

/// A span-level element. Its children are Inlines or a literal string.
#[derive(Debug, Clone, PartialEq)]
pub struct Inline {
    kind: InlineKind,
    metadata: Metadata,
    children: InlineChildren,
}

/// The two shapes an Inline's content can take.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineChildren {
    Nodes(Vec<Inline>),
    Text(String),
}

/// Either category of node, as found in a Block's children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Block(Block),
    Inline(Inline),
}

/// Represents the root of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
    pub metadata: Metadata,
}

fn check_metadata_key(
    kind: &str,
    allowed: &[&str],
    key: &str,
) -> Result<(), ValidationError> {
    if is_internal(key) || allowed.contains(&key) {
        Ok(())
    } else {
        Err(ValidationError::UnknownMetadataKey {
            kind: kind.to_string(),
            key: key.to_string(),
        })
    }
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Block {
            kind,
            metadata: Metadata::new(),
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: BlockKind, children: Vec<Node>) -> Self {
        Block {
            kind,
            metadata: Metadata::new(),
            children,
        }
    }

    pub fn para(inlines: Vec<Inline>) -> Self {
        Block::with_children(BlockKind::Para, inlines.into_iter().map(Node::Inline).collect())
    }

    pub fn plain(inlines: Vec<Inline>) -> Self {
        Block::with_children(BlockKind::Plain, inlines.into_iter().map(Node::Inline).collect())
    }

    /// A code block holding `text` as a single Str child.
    pub fn code_block(lang: Option<&str>, text: impl Into<String>) -> Self {
        let mut block = Block::with_children(
            BlockKind::CodeBlock,
            vec![Node::Inline(Inline::str(text))],
        );
        if let Some(lang) = lang.filter(|l| !l.is_empty()) {
            block.metadata.insert(keys::LANG, lang);
        }
        block
    }

    pub fn raw_block(format: &str, text: impl Into<String>) -> Self {
        let mut block =
            Block::with_children(BlockKind::RawBlock, vec![Node::Inline(Inline::str(text))]);
        block.metadata.insert(keys::FORMAT, format);
        block
    }

    pub fn header(level: u8, inlines: Vec<Inline>) -> Self {
        let mut block = Block::with_children(
            BlockKind::Header,
            inlines.into_iter().map(Node::Inline).collect(),
        );
        block.metadata.insert(keys::LEVEL, level);
        block
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn into_children(self) -> Vec<Node> {
        self.children
    }

    /// Append a Block or Inline child. Blocks accept both categories.
    pub fn add_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Builder form of [`Block::add_child`].
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.add_child(child);
        self
    }

    /// Set a metadata entry, rejecting keys this kind does not recognize.
    pub fn set_metadata(
        &mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<(), ValidationError> {
        check_metadata_key(self.kind.name(), self.kind.metadata_keys(), key)?;
        self.metadata.insert(key, value);
        Ok(())
    }

    /// Builder form of [`Block::set_metadata`].
    pub fn with_metadata(
        mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<Self, ValidationError> {
        self.set_metadata(key, value)?;
        Ok(self)
    }

    /// Text content with markup stripped (spaces as `' '`, line breaks as `'\n'`).
    ///
    /// For code and raw blocks this is the literal source.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Inline(inline) => inline.push_plain_text(&mut out),
                Node::Block(block) => out.push_str(&block.plain_text()),
            }
        }
        out
    }

    /// Visit every Inline below this block, depth first.
    pub fn visit_inlines_mut(&mut self, f: &mut impl FnMut(&mut Inline)) {
        for child in &mut self.children {
            match child {
                Node::Block(block) => block.visit_inlines_mut(f),
                Node::Inline(inline) => inline.visit_mut(f),
            }
        }
    }

    /// The inline children, skipping nested blocks.
    pub fn inlines(&self) -> impl Iterator<Item = &Inline> {
        self.children.iter().filter_map(Node::as_inline)
    }

    /// The block children, skipping inlines.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.children.iter().filter_map(Node::as_block)
    }
}

impl Inline {
    pub fn new(kind: InlineKind) -> Self {
        Inline::with_children(kind, Vec::new())
    }

    pub fn with_children(kind: InlineKind, children: Vec<Inline>) -> Self {
        Inline {
            kind,
            metadata: Metadata::new(),
            children: InlineChildren::Nodes(children),
        }
    }

    /// An inline whose content is literal text.
    pub fn text(kind: InlineKind, text: impl Into<String>) -> Self {
        Inline {
            kind,
            metadata: Metadata::new(),
            children: InlineChildren::Text(text.into()),
        }
    }

    pub fn str(text: impl Into<String>) -> Self {
        Inline::text(InlineKind::Str, text)
    }

    pub fn space() -> Self {
        Inline::new(InlineKind::Space)
    }

    pub fn line_break() -> Self {
        Inline::new(InlineKind::LineBreak)
    }

    pub fn code(text: impl Into<String>) -> Self {
        Inline::text(InlineKind::Code, text)
    }

    pub fn math(text: impl Into<String>, display: bool) -> Self {
        let mut math = Inline::text(InlineKind::Math, text);
        if display {
            math.metadata.insert(keys::DISPLAY, true);
        }
        math
    }

    pub fn link(url: &str, children: Vec<Inline>) -> Self {
        let mut link = Inline::with_children(InlineKind::Link, children);
        link.metadata.insert(keys::URL, url);
        link
    }

    /// An image pointing at `url`; `alt` is its description.
    pub fn image(url: &str, alt: Vec<Inline>) -> Self {
        let mut image = Inline::with_children(InlineKind::Image, alt);
        image.metadata.insert(keys::URL, url);
        image
    }

    pub fn kind(&self) -> InlineKind {
        self.kind
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn children(&self) -> &InlineChildren {
        &self.children
    }

    pub fn url(&self) -> Option<&str> {
        self.metadata.get_str(keys::URL)
    }

    /// Point a Link or Image somewhere else. Other kinds carry no url and are left unchanged.
    pub fn set_url(&mut self, url: &str) {
        if matches!(self.kind, InlineKind::Link | InlineKind::Image) {
            self.metadata.insert(keys::URL, url);
        }
    }

    /// Visit this inline and then its descendants.
    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut Inline)) {
        f(self);
        if let InlineChildren::Nodes(nodes) = &mut self.children {
            for node in nodes {
                node.visit_mut(f);
            }
        }
    }

    /// Literal text payload, if this inline holds text rather than nodes.
    pub fn as_text(&self) -> Option<&str> {
        match &self.children {
            InlineChildren::Text(text) => Some(text),
            InlineChildren::Nodes(_) => None,
        }
    }

    /// Append an Inline child. Fails when this inline holds literal text.
    pub fn add_child(&mut self, child: Inline) -> Result<(), ValidationError> {
        match &mut self.children {
            InlineChildren::Nodes(nodes) => {
                nodes.push(child);
                Ok(())
            }
            InlineChildren::Text(_) => {
                Err(ValidationError::ChildOfLiteral(self.kind.name().to_string()))
            }
        }
    }

    /// Replace the content with literal text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = InlineChildren::Text(text.into());
    }

    pub fn set_metadata(
        &mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<(), ValidationError> {
        check_metadata_key(self.kind.name(), self.kind.metadata_keys(), key)?;
        self.metadata.insert(key, value);
        Ok(())
    }

    pub fn with_metadata(
        mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<Self, ValidationError> {
        self.set_metadata(key, value)?;
        Ok(self)
    }

    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_plain_text(&mut out);
        out
    }

    fn push_plain_text(&self, out: &mut String) {
        match (&self.kind, &self.children) {
            (InlineKind::Space, _) => out.push(' '),
            (InlineKind::LineBreak, _) => out.push('\n'),
            (_, InlineChildren::Text(text)) => out.push_str(text),
            (_, InlineChildren::Nodes(nodes)) => {
                for node in nodes {
                    node.push_plain_text(out);
                }
            }
        }
    }
}

impl Node {
    /// Build a Block from its kind name.
    ///
    /// Fails if `name` is not a Block kind or a metadata key is not
    /// recognized for it.
    pub fn block(
        name: &str,
        metadata: Metadata,
        children: Vec<Node>,
    ) -> Result<Node, ValidationError> {
        let kind: BlockKind = name.parse()?;
        for (key, _) in metadata.iter() {
            check_metadata_key(name, kind.metadata_keys(), key)?;
        }
        Ok(Node::Block(Block {
            kind,
            metadata,
            children,
        }))
    }

    /// Build an Inline from its kind name and child nodes.
    ///
    /// Fails if `name` is not an Inline kind or any child is a Block.
    pub fn inline(name: &str, children: Vec<Node>) -> Result<Node, ValidationError> {
        let kind: InlineKind = name.parse()?;
        let children = children
            .into_iter()
            .map(|child| match child {
                Node::Inline(inline) => Ok(inline),
                Node::Block(block) => Err(ValidationError::BlockInInline {
                    parent: name.to_string(),
                    child: block.kind.name().to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::Inline(Inline::with_children(kind, children)))
    }

    /// Build a literal-text Inline from its kind name.
    pub fn inline_text(name: &str, text: impl Into<String>) -> Result<Node, ValidationError> {
        let kind: InlineKind = name.parse()?;
        Ok(Node::Inline(Inline::text(kind, text)))
    }

    /// Append `child`, enforcing the shape rule of this node's category.
    pub fn add_child(&mut self, child: Node) -> Result<(), ValidationError> {
        match (self, child) {
            (Node::Block(block), child) => {
                block.add_child(child);
                Ok(())
            }
            (Node::Inline(inline), Node::Inline(child)) => inline.add_child(child),
            (Node::Inline(inline), Node::Block(child)) => Err(ValidationError::BlockInInline {
                parent: inline.kind.name().to_string(),
                child: child.kind.name().to_string(),
            }),
        }
    }

    pub fn set_metadata(
        &mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<(), ValidationError> {
        match self {
            Node::Block(block) => block.set_metadata(key, value),
            Node::Inline(inline) => inline.set_metadata(key, value),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Node::Block(block) => block.kind.name(),
            Node::Inline(inline) => inline.kind.name(),
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Node::Block(_))
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Node::Inline(_))
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Inline(_) => None,
        }
    }

    pub fn as_inline(&self) -> Option<&Inline> {
        match self {
            Node::Inline(inline) => Some(inline),
            Node::Block(_) => None,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            Node::Block(block) => &block.metadata,
            Node::Inline(inline) => &inline.metadata,
        }
    }
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Node::Block(block)
    }
}

impl From<Inline> for Node {
    fn from(inline: Inline) -> Self {
        Node::Inline(inline)
    }
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Document {
            blocks,
            metadata: Metadata::new(),
        }
    }

    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
