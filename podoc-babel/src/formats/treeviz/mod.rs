//! Treeviz formatter for AST nodes
//!
//! Treeviz is a visual representation of the AST, one node per line, with box-drawing
//! connectors encoding the nesting.
//!
//! So the format is :
//! <prefix><connector> <icon> <kind> [{metadata}] ["text"] (text truncated to 30 characters)
//!
//! Example:
//!
//! ⧉ Document (2 blocks)
//! ├─ § Header {level=1}
//! │ └─ ◦ Str "Title"
//! └─ 𝒱 CodeBlock {lang=python}
//!   └─ ◦ Str "print(1)"

use super::icons::get_icon;
use crate::ast::{is_internal, Block, Document, Inline, InlineChildren, Metadata, Node};
use crate::error::FormatError;
use crate::format::Format;
use serde_json::Value;
use std::collections::HashMap;

const MAX_TEXT: usize = 30;

#[derive(Debug, Clone, Copy, Default)]
struct Options {
    /// Also show internal (`_`-prefixed) metadata
    include_all: bool,
}

fn format_block(
    block: &Block,
    prefix: &str,
    child_index: usize,
    child_count: usize,
    options: Options,
    output: &mut String,
) {
    let is_last = child_index + 1 == child_count;
    push_line(
        output,
        prefix,
        is_last,
        block.kind().name(),
        &metadata_label(block.metadata(), options),
    );

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let children = block.children();
    for (i, child) in children.iter().enumerate() {
        match child {
            Node::Block(b) => format_block(b, &child_prefix, i, children.len(), options, output),
            Node::Inline(inline) => {
                format_inline(inline, &child_prefix, i, children.len(), options, output)
            }
        }
    }
}

fn format_inline(
    inline: &Inline,
    prefix: &str,
    child_index: usize,
    child_count: usize,
    options: Options,
    output: &mut String,
) {
    let is_last = child_index + 1 == child_count;
    let mut label = metadata_label(inline.metadata(), options);
    if let InlineChildren::Text(text) = inline.children() {
        label.push_str(&format!(" \"{}\"", truncate(text)));
    }
    push_line(output, prefix, is_last, inline.kind().name(), &label);

    if let InlineChildren::Nodes(children) = inline.children() {
        let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        for (i, child) in children.iter().enumerate() {
            format_inline(child, &child_prefix, i, children.len(), options, output);
        }
    }
}

fn push_line(output: &mut String, prefix: &str, is_last: bool, name: &str, label: &str) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{}{} {} {}{}\n",
        prefix,
        connector,
        get_icon(name),
        name,
        label
    ));
}

fn metadata_label(metadata: &Metadata, options: Options) -> String {
    let entries: Vec<String> = metadata
        .iter()
        .filter(|(key, _)| options.include_all || !is_internal(key))
        .map(|(key, value)| match value {
            Value::String(s) => format!("{key}={}", truncate(s)),
            other => format!("{key}={other}"),
        })
        .collect();
    if entries.is_empty() {
        String::new()
    } else {
        format!(" {{{}}}", entries.join(", "))
    }
}

fn truncate(text: &str) -> String {
    let escaped = text.replace('\n', "\\n");
    if escaped.chars().count() > MAX_TEXT {
        let head: String = escaped.chars().take(MAX_TEXT - 1).collect();
        format!("{head}…")
    } else {
        escaped
    }
}

pub fn to_treeviz_str(doc: &Document) -> String {
    to_treeviz_str_with_params(doc, &HashMap::new())
}

/// Convert a document to treeviz string with optional parameters
///
/// # Parameters
///
/// - `"ast-full"`: When set to `"true"`, also shows internal bookkeeping metadata
///   (such as the originating notebook cell of each block)
pub fn to_treeviz_str_with_params(doc: &Document, params: &HashMap<String, String>) -> String {
    let options = Options {
        include_all: params
            .get("ast-full")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false),
    };

    let mut output = format!(
        "{} Document ({} blocks){}\n",
        get_icon("Document"),
        doc.blocks.len(),
        metadata_label(&doc.metadata, options)
    );
    for (i, block) in doc.blocks.iter().enumerate() {
        format_block(block, "", i, doc.blocks.len(), options, &mut output);
    }
    output
}

/// Format implementation for treeviz format
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree", "treeviz"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(to_treeviz_str(doc))
    }
}
