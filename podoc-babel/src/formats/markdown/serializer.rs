//! Markdown serialization (AST → Markdown)
//!
//! Pipeline: podoc Blocks → Comrak AST → Markdown string (Comrak's CommonMark renderer)

use super::parser::default_comrak_options;
use crate::ast::{keys, Block, BlockKind, Inline, InlineChildren, InlineKind, Node};
use crate::error::FormatError;
use comrak::nodes::{
    Ast, AstNode, ListDelimType, ListType, NodeCode, NodeCodeBlock, NodeHeading, NodeHtmlBlock,
    NodeLink, NodeList, NodeMath, NodeTable, NodeValue, TableAlignment,
};
use comrak::{format_commonmark, Arena};
use std::cell::RefCell;

/// Serialize blocks to CommonMark Markdown
pub fn serialize_to_markdown(blocks: &[Block]) -> Result<String, FormatError> {
    let arena = Arena::new();
    let root = alloc(&arena, NodeValue::Document);
    for block in blocks {
        append_block(&arena, root, block);
    }

    let mut output = Vec::new();
    let mut options = default_comrak_options();
    // Raw HTML blocks are written back verbatim
    options.render.unsafe_ = true;
    format_commonmark(root, &options, &mut output).map_err(|e| {
        FormatError::SerializationError(format!("Comrak serialization failed: {e}"))
    })?;

    let markdown = String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))?;

    // Remove Comrak's "end list" HTML comments which appear between consecutive lists
    Ok(markdown.replace("<!-- end list -->\n\n", ""))
}

fn alloc<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
}

fn append_block<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, block: &Block) {
    let meta = block.metadata();

    match block.kind() {
        BlockKind::Para | BlockKind::Plain => {
            let node = alloc(arena, NodeValue::Paragraph);
            parent.append(node);
            append_children(arena, node, block);
        }

        BlockKind::Header => {
            let level = meta.get_i64(keys::LEVEL).unwrap_or(1).clamp(1, 6) as u8;
            let node = alloc(
                arena,
                NodeValue::Heading(NodeHeading {
                    level,
                    setext: false,
                }),
            );
            parent.append(node);
            append_children(arena, node, block);
        }

        BlockKind::CodeBlock => {
            let mut literal = block.plain_text();
            if !literal.ends_with('\n') {
                literal.push('\n');
            }
            let node = alloc(
                arena,
                NodeValue::CodeBlock(NodeCodeBlock {
                    fenced: true,
                    fence_char: b'`',
                    fence_length: 3,
                    fence_offset: 0,
                    info: meta.get_str(keys::LANG).unwrap_or_default().to_string(),
                    literal,
                }),
            );
            parent.append(node);
        }

        BlockKind::RawBlock => {
            let mut literal = block.plain_text();
            if !literal.ends_with('\n') {
                literal.push('\n');
            }
            let node = alloc(
                arena,
                NodeValue::HtmlBlock(NodeHtmlBlock {
                    block_type: 0,
                    literal,
                }),
            );
            parent.append(node);
        }

        BlockKind::BlockQuote | BlockKind::Div | BlockKind::DefinitionList => {
            let container = if block.kind() == BlockKind::BlockQuote {
                let node = alloc(arena, NodeValue::BlockQuote);
                parent.append(node);
                node
            } else {
                // No Markdown counterpart: the content is written in place
                parent
            };
            append_children(arena, container, block);
        }

        BlockKind::BulletList | BlockKind::OrderedList => {
            let list = list_attributes(block);
            let node = alloc(arena, NodeValue::List(list));
            parent.append(node);
            for child in block.children() {
                let item = alloc(arena, NodeValue::Item(list));
                node.append(item);
                match child {
                    Node::Block(item_block) if item_block.kind() == BlockKind::Div => {
                        append_children(arena, item, item_block)
                    }
                    Node::Block(other) => append_block(arena, item, other),
                    Node::Inline(inline) => {
                        let para = alloc(arena, NodeValue::Paragraph);
                        item.append(para);
                        append_inline(arena, para, inline);
                    }
                }
            }
        }

        BlockKind::HorizontalRule => parent.append(alloc(arena, NodeValue::ThematicBreak)),

        BlockKind::Table => append_table(arena, parent, block),
    }
}

fn list_attributes(block: &Block) -> NodeList {
    let ordered = block.kind() == BlockKind::OrderedList;
    // Tight when no item holds a full paragraph
    let tight = block
        .blocks()
        .flat_map(|item| item.blocks())
        .all(|b| b.kind() != BlockKind::Para);
    NodeList {
        list_type: if ordered {
            ListType::Ordered
        } else {
            ListType::Bullet
        },
        marker_offset: 0,
        padding: 0,
        start: block.metadata().get_i64(keys::START).unwrap_or(1).max(0) as usize,
        delimiter: ListDelimType::Period,
        bullet_char: b'*',
        tight,
    }
}

fn append_table<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, block: &Block) {
    let rows: Vec<&Block> = block.blocks().collect();
    let num_columns = rows.iter().map(|row| row.children().len()).max().unwrap_or(0);
    let table = alloc(
        arena,
        NodeValue::Table(NodeTable {
            alignments: vec![TableAlignment::None; num_columns],
            num_columns,
            num_rows: rows.len(),
            num_nonempty_cells: 0,
        }),
    );
    parent.append(table);

    for (index, row) in rows.iter().enumerate() {
        let header = row.metadata().get_str(keys::CLASS) == Some("header") || index == 0;
        let row_node = alloc(arena, NodeValue::TableRow(header));
        table.append(row_node);
        for cell in row.children() {
            let cell_node = alloc(arena, NodeValue::TableCell);
            row_node.append(cell_node);
            match cell {
                Node::Block(cell_block) => append_children(arena, cell_node, cell_block),
                Node::Inline(inline) => append_inline(arena, cell_node, inline),
            }
        }
    }
}

fn append_children<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, block: &Block) {
    for child in block.children() {
        match child {
            Node::Block(child) => append_block(arena, parent, child),
            Node::Inline(inline) => append_inline(arena, parent, inline),
        }
    }
}

fn append_inline<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, inline: &Inline) {
    let meta = inline.metadata();

    let value = match inline.kind() {
        InlineKind::Str => NodeValue::Text(inline.plain_text()),
        InlineKind::Space => NodeValue::Text(" ".to_string()),
        InlineKind::LineBreak => NodeValue::LineBreak,
        InlineKind::Code => NodeValue::Code(NodeCode {
            num_backticks: 1,
            literal: inline.plain_text(),
        }),
        InlineKind::Math => NodeValue::Math(NodeMath {
            dollar_math: true,
            display_math: meta.get_bool(keys::DISPLAY).unwrap_or(false),
            literal: inline.plain_text(),
        }),
        InlineKind::Emph => NodeValue::Emph,
        InlineKind::Strong => NodeValue::Strong,
        InlineKind::Strikeout => NodeValue::Strikethrough,
        InlineKind::Link => NodeValue::Link(NodeLink {
            url: meta.get_str(keys::URL).unwrap_or_default().to_string(),
            title: meta.get_str(keys::TITLE).unwrap_or_default().to_string(),
        }),
        InlineKind::Image => NodeValue::Image(NodeLink {
            url: meta.get_str(keys::URL).unwrap_or_default().to_string(),
            title: meta.get_str(keys::TITLE).unwrap_or_default().to_string(),
        }),
    };

    let node = alloc(arena, value);
    parent.append(node);

    match (inline.kind(), inline.children()) {
        (InlineKind::Str | InlineKind::Code | InlineKind::Math, _) => {}
        (_, InlineChildren::Nodes(children)) => {
            for child in children {
                append_inline(arena, node, child);
            }
        }
        (_, InlineChildren::Text(text)) => {
            node.append(alloc(arena, NodeValue::Text(text.clone())));
        }
    }
}
