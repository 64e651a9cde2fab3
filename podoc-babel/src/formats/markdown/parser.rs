//! Markdown parsing (Markdown → AST)
//!
//! Pipeline: Markdown string → Comrak AST → podoc Blocks

use crate::ast::{keys, Block, BlockKind, Inline, InlineKind, Node};
use crate::error::FormatError;
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};

/// Parse a Markdown string into top-level blocks
pub fn parse_from_markdown(source: &str) -> Result<Vec<Block>, FormatError> {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);

    let mut blocks = Vec::new();
    for child in root.children() {
        blocks.extend(convert_block(child, false)?);
    }
    Ok(blocks)
}

pub(super) fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.math_dollars = true;
    options
}

/// Convert one Comrak block node. `tight` is set inside items of tight lists,
/// whose paragraphs become `Plain` as in pandoc.
fn convert_block<'a>(node: &'a AstNode<'a>, tight: bool) -> Result<Vec<Block>, FormatError> {
    let value = node.data.borrow().value.clone();

    let block = match value {
        NodeValue::Paragraph => {
            let inlines = convert_inlines(node)?;
            if tight {
                Block::plain(inlines)
            } else {
                Block::para(inlines)
            }
        }

        NodeValue::Heading(heading) => Block::header(heading.level, convert_inlines(node)?),

        NodeValue::CodeBlock(code_block) => {
            // The info string may carry attributes after the language
            let lang = code_block.info.split_whitespace().next();
            Block::code_block(lang, code_block.literal)
        }

        NodeValue::HtmlBlock(html) => Block::raw_block("html", html.literal),

        NodeValue::BlockQuote => {
            Block::with_children(BlockKind::BlockQuote, convert_blocks(node, false)?)
        }

        NodeValue::List(list) => {
            let kind = match list.list_type {
                ListType::Bullet => BlockKind::BulletList,
                ListType::Ordered => BlockKind::OrderedList,
            };
            let mut block = Block::new(kind);
            if kind == BlockKind::OrderedList {
                block.set_metadata(keys::START, list.start)?;
            }
            for item in node.children() {
                let item_blocks = convert_blocks(item, list.tight)?;
                block.add_child(Block::with_children(BlockKind::Div, item_blocks));
            }
            block
        }

        NodeValue::ThematicBreak => Block::new(BlockKind::HorizontalRule),

        NodeValue::Table(_) => {
            let mut table = Block::new(BlockKind::Table);
            for row in node.children() {
                let header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
                let mut row_block = Block::new(BlockKind::Div);
                if header {
                    row_block.set_metadata(keys::CLASS, "header")?;
                }
                for cell in row.children() {
                    row_block.add_child(Block::plain(convert_inlines(cell)?));
                }
                table.add_child(row_block);
            }
            table
        }

        // Front matter, footnotes and other extensions have no AST counterpart
        _ => return Ok(Vec::new()),
    };

    Ok(vec![block])
}

fn convert_blocks<'a>(node: &'a AstNode<'a>, tight: bool) -> Result<Vec<Node>, FormatError> {
    let mut blocks = Vec::new();
    for child in node.children() {
        blocks.extend(convert_block(child, tight)?.into_iter().map(Node::Block));
    }
    Ok(blocks)
}

fn convert_inlines<'a>(node: &'a AstNode<'a>) -> Result<Vec<Inline>, FormatError> {
    let mut inlines = Vec::new();
    for child in node.children() {
        collect_inline(child, &mut inlines)?;
    }
    Ok(inlines)
}

fn collect_inline<'a>(node: &'a AstNode<'a>, out: &mut Vec<Inline>) -> Result<(), FormatError> {
    let value = node.data.borrow().value.clone();

    match value {
        NodeValue::Text(text) => out.extend(split_words(&text)),
        NodeValue::SoftBreak => out.push(Inline::space()),
        NodeValue::LineBreak => out.push(Inline::line_break()),
        NodeValue::Code(code) => out.push(Inline::code(code.literal)),
        NodeValue::Math(math) => out.push(Inline::math(math.literal, math.display_math)),
        NodeValue::Emph => out.push(Inline::with_children(
            InlineKind::Emph,
            convert_inlines(node)?,
        )),
        NodeValue::Strong => out.push(Inline::with_children(
            InlineKind::Strong,
            convert_inlines(node)?,
        )),
        NodeValue::Strikethrough => out.push(Inline::with_children(
            InlineKind::Strikeout,
            convert_inlines(node)?,
        )),
        NodeValue::Link(link) => {
            let mut inline = Inline::link(&link.url, convert_inlines(node)?);
            if !link.title.is_empty() {
                inline.set_metadata(keys::TITLE, link.title)?;
            }
            out.push(inline);
        }
        NodeValue::Image(link) => {
            let mut inline = Inline::image(&link.url, convert_inlines(node)?);
            if !link.title.is_empty() {
                inline.set_metadata(keys::TITLE, link.title)?;
            }
            out.push(inline);
        }
        NodeValue::HtmlInline(html) => out.extend(split_words(&html)),
        _ => out.extend(convert_inlines(node)?),
    }
    Ok(())
}

/// Split text into `Str` words separated by `Space`, as pandoc does.
pub fn split_words(text: &str) -> Vec<Inline> {
    let mut inlines = Vec::new();
    let mut word = String::new();
    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !word.is_empty() {
                inlines.push(Inline::str(std::mem::take(&mut word)));
            }
            pending_space = true;
        } else {
            if pending_space {
                inlines.push(Inline::space());
                pending_space = false;
            }
            word.push(ch);
        }
    }
    if !word.is_empty() {
        inlines.push(Inline::str(word));
    }
    if pending_space {
        inlines.push(Inline::space());
    }
    inlines
}
