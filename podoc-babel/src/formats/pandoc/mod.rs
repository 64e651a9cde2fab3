//! Pandoc-compatible JSON codec
//!
//! Strategy: direct mapping between the AST and a JSON document shaped like
//! pandoc's legacy JSON AST.
//!
//! # Schema
//!
//! ```text
//! [ {"unMeta": {...}}, [ block, ... ] ]
//!
//! block  = {"t": <Block tag>,  "m": {...}, "c": [node, ...]}
//! inline = {"t": <Inline tag>, "c": [inline, ...] | "text"}
//!        | {"t": <Inline tag>, "m": {...}, "c": ...}      (Link, Image, Math with metadata)
//! ```
//!
//! The tag vocabulary is the one of [`BlockKind`] and [`InlineKind`].
//!
//! # Decoding Policy
//!
//! | Input                                   | Result                                  |
//! |-----------------------------------------|-----------------------------------------|
//! | outer value is not a 2-element array    | `DecodeError::Shape`                    |
//! | node without a string `t`               | `DecodeError::InvalidNode`              |
//! | `c` missing                             | no children (pandoc omits it on Space)  |
//! | Block with a string `c`                 | `DecodeError::InvalidNode`              |
//! | Block inside an Inline                  | `DecodeError::Validation`               |
//! | unrecognized tag                        | node dropped, children spliced in place |
//! | unrecognized metadata key               | key dropped                             |
//!
//! Keys starting with `_` are carried through untouched.
//!
//! # Persistence
//!
//! Files are written pretty-printed with sorted keys and a trailing newline
//! so that stored documents diff cleanly.

use crate::ast::{Block, BlockKind, Document, Inline, InlineChildren, InlineKind, Metadata, Node};
use crate::ast::metadata::is_internal;
use crate::error::{DecodeError, FormatError};
use crate::format::Format;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Key of the document metadata object.
pub const META_KEY: &str = "unMeta";

const TAG: &str = "t";
const METADATA: &str = "m";
const CHILDREN: &str = "c";

/// Encode a document into its JSON value.
pub fn encode(doc: &Document) -> Value {
    let mut meta = Map::new();
    meta.insert(META_KEY.to_string(), doc.metadata.to_json());
    Value::Array(vec![
        Value::Object(meta),
        Value::Array(doc.blocks.iter().map(encode_block).collect()),
    ])
}

// Keys are inserted in sorted order so output stays sorted even when
// serde_json preserves insertion order.
fn encode_block(block: &Block) -> Value {
    let mut obj = Map::new();
    obj.insert(
        CHILDREN.to_string(),
        Value::Array(block.children().iter().map(encode_node).collect()),
    );
    obj.insert(METADATA.to_string(), block.metadata().to_json());
    obj.insert(TAG.to_string(), Value::String(block.kind().name().to_string()));
    Value::Object(obj)
}

fn encode_inline(inline: &Inline) -> Value {
    let mut obj = Map::new();
    let children = match inline.children() {
        InlineChildren::Text(text) => Value::String(text.clone()),
        InlineChildren::Nodes(nodes) => Value::Array(nodes.iter().map(encode_inline).collect()),
    };
    obj.insert(CHILDREN.to_string(), children);
    if !inline.metadata().is_empty() {
        obj.insert(METADATA.to_string(), inline.metadata().to_json());
    }
    obj.insert(TAG.to_string(), Value::String(inline.kind().name().to_string()));
    Value::Object(obj)
}

fn encode_node(node: &Node) -> Value {
    match node {
        Node::Block(block) => encode_block(block),
        Node::Inline(inline) => encode_inline(inline),
    }
}

/// Decode a JSON value into a document.
pub fn decode(value: &Value) -> Result<Document, DecodeError> {
    let parts = value
        .as_array()
        .ok_or_else(|| DecodeError::Shape("expected a top-level array".to_string()))?;
    if parts.len() != 2 {
        return Err(DecodeError::Shape(format!(
            "expected 2 top-level elements, found {}",
            parts.len()
        )));
    }

    let metadata = decode_document_metadata(&parts[0])?;
    let items = parts[1]
        .as_array()
        .ok_or_else(|| DecodeError::Shape("second element must be an array of blocks".to_string()))?;

    let mut blocks = Vec::with_capacity(items.len());
    for node in decode_children(items)? {
        match node {
            Node::Block(block) => blocks.push(block),
            Node::Inline(inline) => {
                return Err(DecodeError::InlineAtTopLevel(inline.kind().name().to_string()))
            }
        }
    }

    Ok(Document { blocks, metadata })
}

fn decode_document_metadata(value: &Value) -> Result<Metadata, DecodeError> {
    let obj = value
        .as_object()
        .ok_or_else(|| DecodeError::Shape("first element must be a metadata object".to_string()))?;
    match obj.get(META_KEY) {
        None | Some(Value::Null) => Ok(Metadata::new()),
        Some(Value::Object(entries)) => Ok(entries
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()),
        Some(other) => Err(DecodeError::Shape(format!(
            "'{META_KEY}' must be an object, found {other}"
        ))),
    }
}

enum Payload<'a> {
    Nodes(&'a [Value]),
    Text(&'a str),
}

fn decode_children(items: &[Value]) -> Result<Vec<Node>, DecodeError> {
    let mut nodes = Vec::with_capacity(items.len());
    for item in items {
        nodes.extend(decode_node(item)?);
    }
    Ok(nodes)
}

/// Decode one node. Returns several nodes when an unknown node is replaced
/// by its children, and none when an unknown node had no node children.
fn decode_node(value: &Value) -> Result<Vec<Node>, DecodeError> {
    let obj = value
        .as_object()
        .ok_or_else(|| DecodeError::InvalidNode(format!("expected an object, found {value}")))?;
    let tag = obj
        .get(TAG)
        .and_then(Value::as_str)
        .ok_or_else(|| DecodeError::InvalidNode(format!("missing type tag in {value}")))?;
    let payload = match obj.get(CHILDREN) {
        None | Some(Value::Null) => Payload::Nodes(&[]),
        Some(Value::Array(items)) => Payload::Nodes(items),
        Some(Value::String(text)) => Payload::Text(text),
        Some(other) => {
            return Err(DecodeError::InvalidNode(format!(
                "children of '{tag}' must be an array or a string, found {other}"
            )))
        }
    };

    if let Ok(kind) = tag.parse::<BlockKind>() {
        let children = match payload {
            Payload::Nodes(items) => decode_children(items)?,
            Payload::Text(_) => {
                return Err(DecodeError::InvalidNode(format!(
                    "block '{tag}' cannot hold a string payload"
                )))
            }
        };
        let metadata = decode_metadata(tag, kind.metadata_keys(), obj.get(METADATA))?;
        return Ok(vec![Node::block(tag, metadata, children)?]);
    }

    if let Ok(kind) = tag.parse::<InlineKind>() {
        let mut node = match payload {
            Payload::Text(text) => Node::inline_text(tag, text)?,
            Payload::Nodes(items) => Node::inline(tag, decode_children(items)?)?,
        };
        let metadata = decode_metadata(tag, kind.metadata_keys(), obj.get(METADATA))?;
        for (key, value) in metadata.iter() {
            node.set_metadata(key, value.clone())?;
        }
        return Ok(vec![node]);
    }

    debug!(tag, "dropping unknown node and splicing its children");
    match payload {
        Payload::Nodes(items) => decode_children(items),
        Payload::Text(_) => Ok(Vec::new()),
    }
}

fn decode_metadata(
    tag: &str,
    allowed: &[&str],
    value: Option<&Value>,
) -> Result<Metadata, DecodeError> {
    let entries = match value {
        None | Some(Value::Null) => return Ok(Metadata::new()),
        Some(Value::Object(entries)) => entries,
        Some(other) => {
            return Err(DecodeError::InvalidNode(format!(
                "metadata of '{tag}' must be an object, found {other}"
            )))
        }
    };

    let mut metadata = Metadata::new();
    for (key, value) in entries {
        if is_internal(key) || allowed.contains(&key.as_str()) {
            metadata.insert(key.clone(), value.clone());
        } else {
            debug!(tag, key = key.as_str(), "dropping unrecognized metadata key");
        }
    }
    Ok(metadata)
}

/// Serialize a document to pretty JSON with a trailing newline.
pub fn to_json_string(doc: &Document) -> String {
    format!("{:#}\n", encode(doc))
}

pub fn from_json_str(source: &str) -> Result<Document, DecodeError> {
    let value: Value = serde_json::from_str(source)?;
    decode(&value)
}

/// Open a `.json` file and decode it.
pub fn open(path: impl AsRef<Path>) -> Result<Document, FormatError> {
    let path = path.as_ref();
    debug!("Open JSON file `{}`", path.display());
    let source = fs::read_to_string(path)?;
    Ok(from_json_str(&source)?)
}

/// Encode a document and write it to a `.json` file.
pub fn save(path: impl AsRef<Path>, doc: &Document) -> Result<(), FormatError> {
    let path = path.as_ref();
    debug!("Save JSON file `{}`", path.display());
    fs::write(path, to_json_string(doc))?;
    Ok(())
}

/// Format implementation for the pandoc-compatible JSON AST
pub struct PandocJsonFormat;

impl Format for PandocJsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Pandoc-compatible JSON AST"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(from_json_str(source)?)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(to_json_string(doc))
    }
}
