//! Cell boundary inference for the notebook writer.
//!
//! A document read from a notebook is flat: a code cell becomes its input CodeBlock
//! followed by one Block per output. Writing it back first regroups those runs.

use super::resources::output_mime;
use crate::ast::{keys, Block, BlockKind, InlineKind, Node};

/// A top-level position after wrapping
#[derive(Debug, Clone, PartialEq)]
pub enum Wrapped<'a> {
    /// A Block outside any code cell
    Block(&'a Block),
    /// An input CodeBlock followed by its outputs
    CodeCell(Vec<&'a Block>),
}

/// Group each code input with the output Blocks that follow it.
///
/// A CodeBlock without `output` metadata opens a new group. While a group is open,
/// output representations (see [`is_output`]) join it; any other Block closes it.
pub fn wrap_code_cells(blocks: &[Block]) -> Vec<Wrapped<'_>> {
    let mut wrapped = Vec::new();
    let mut group: Option<Vec<&Block>> = None;

    for block in blocks {
        if is_code_input(block) {
            if let Some(cell) = group.replace(vec![block]) {
                wrapped.push(Wrapped::CodeCell(cell));
            }
        } else if let (Some(cell), true) = (group.as_mut(), is_output(block)) {
            cell.push(block);
        } else {
            if let Some(cell) = group.take() {
                wrapped.push(Wrapped::CodeCell(cell));
            }
            wrapped.push(Wrapped::Block(block));
        }
    }
    if let Some(cell) = group {
        wrapped.push(Wrapped::CodeCell(cell));
    }
    wrapped
}

fn is_code_input(block: &Block) -> bool {
    block.kind() == BlockKind::CodeBlock && !block.metadata().contains_key(keys::OUTPUT)
}

/// Whether `block` represents a code cell output: a CodeBlock carrying `output`
/// metadata, or a paragraph holding nothing but an image named like an output resource.
pub fn is_output(block: &Block) -> bool {
    match block.kind() {
        BlockKind::CodeBlock => block.metadata().contains_key(keys::OUTPUT),
        BlockKind::Para | BlockKind::Plain => output_image(block).is_some(),
        _ => false,
    }
}

/// The resource filename and mime type of an image output paragraph
pub fn output_image(block: &Block) -> Option<(&str, &'static str)> {
    let [Node::Inline(image)] = block.children() else {
        return None;
    };
    if image.kind() != InlineKind::Image {
        return None;
    }
    let url = image.url()?;
    Some((url, output_mime(url)?))
}
