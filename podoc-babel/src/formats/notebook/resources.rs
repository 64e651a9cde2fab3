//! Binary resources extracted from notebook outputs.

use super::model::{payload_text, rich_output, MimeBundle, Output};
use crate::ast::{Document, Inline, InlineKind};
use crate::error::NotebookError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

/// Filename → raw bytes, passed alongside a Document.
pub type Resources = BTreeMap<String, Vec<u8>>;

/// Extractable mime types, in order of preference, with their file extension.
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/bmp", "bmp"),
    ("image/webp", "webp"),
    ("image/svg+xml", "svg"),
    ("application/pdf", "pdf"),
];

/// Mime types whose payload is text rather than base64
const TEXT_MIMES: &[&str] = &["image/svg+xml"];

static OUTPUT_FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^output_(\d+)_(\d+)\.(png|jpg|gif|bmp|webp|svg|pdf)$").unwrap()
});

pub fn extension_for(mime: &str) -> Option<&'static str> {
    MIME_EXTENSIONS
        .iter()
        .find(|(known, _)| *known == mime)
        .map(|(_, ext)| *ext)
}

pub fn mime_for(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit_once('.')?.1;
    MIME_EXTENSIONS
        .iter()
        .find(|(_, known)| *known == ext)
        .map(|(mime, _)| *mime)
}

pub fn is_text_mime(mime: &str) -> bool {
    TEXT_MIMES.contains(&mime)
}

/// Name of the resource extracted from output `output_index` of cell `cell_index`.
///
/// Unknown mime types fall back to a `bin` extension.
pub fn output_filename(mime: &str, cell_index: usize, output_index: usize) -> String {
    let ext = extension_for(mime).unwrap_or("bin");
    format!("output_{cell_index}_{output_index}.{ext}")
}

/// Whether `name` follows the `output_<cell>_<output>.<ext>` convention with a known extension.
pub fn is_output_filename(name: &str) -> bool {
    output_mime(name).is_some()
}

/// The mime type of an output resource, or `None` if `name` is not one.
pub fn output_mime(name: &str) -> Option<&'static str> {
    if OUTPUT_FILENAME.is_match(name) {
        mime_for(name)
    } else {
        None
    }
}

/// The first recognized binary payload of a rich output, decoded.
///
/// Returns `Ok(None)` for stream and error outputs, and for rich outputs without
/// a recognized mime type.
pub fn extract_output(output: &Output) -> Result<Option<(String, Vec<u8>)>, NotebookError> {
    match rich_output(output)? {
        Some(rich) => extract_data(&rich.data),
        None => Ok(None),
    }
}

/// The first recognized binary payload of a mime bundle, decoded.
pub fn extract_data(data: &MimeBundle) -> Result<Option<(String, Vec<u8>)>, NotebookError> {
    let Some((mime, payload)) = find_binary(data) else {
        return Ok(None);
    };

    let bytes = if is_text_mime(mime) {
        payload.into_bytes()
    } else {
        decode_base64(&payload).map_err(|source| NotebookError::InvalidResource {
            mime: mime.to_string(),
            source,
        })?
    };
    Ok(Some((mime.to_string(), bytes)))
}

fn find_binary(data: &MimeBundle) -> Option<(&'static str, String)> {
    MIME_EXTENSIONS.iter().find_map(|(mime, _)| {
        data.get(*mime)
            .and_then(payload_text)
            .map(|payload| (*mime, payload))
    })
}

/// Decode a base64 payload, ignoring the line breaks notebooks insert.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(compact)
}

/// The notebook payload for a resource: base64, or text for text mimes.
pub fn encode_payload(mime: &str, bytes: &[u8]) -> Value {
    if is_text_mime(mime) {
        Value::String(String::from_utf8_lossy(bytes).into_owned())
    } else {
        Value::String(STANDARD.encode(bytes))
    }
}

/// Point the output images of `doc` whose resource is in `resources` into `dir`:
/// `output_1_0.png` becomes `dir/output_1_0.png`. Other urls are left alone.
pub fn prefix_output_urls(doc: &mut Document, dir: &str, resources: &Resources) {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() || dir == "." {
        return;
    }
    rewrite_image_urls(doc, |url| {
        (is_output_filename(url) && resources.contains_key(url)).then(|| format!("{dir}/{url}"))
    });
}

/// Undo [`prefix_output_urls`], so the urls name entries of the resources mapping again.
pub fn strip_output_urls(doc: &mut Document, dir: &str) {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() || dir == "." {
        return;
    }
    rewrite_image_urls(doc, |url| {
        url.strip_prefix(dir)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| is_output_filename(name))
            .map(str::to_string)
    });
}

fn rewrite_image_urls(doc: &mut Document, rewrite: impl Fn(&str) -> Option<String>) {
    for block in &mut doc.blocks {
        block.visit_inlines_mut(&mut |inline: &mut Inline| {
            if inline.kind() != InlineKind::Image {
                return;
            }
            if let Some(url) = inline.url().and_then(&rewrite) {
                inline.set_url(&url);
            }
        });
    }
}
