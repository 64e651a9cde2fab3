//! Fixture helpers shared by the integration tests.

use podoc_babel::ast::Document;
use podoc_babel::formats::notebook::model::payload_text;
use podoc_babel::formats::notebook::{open_notebook, Notebook};
use podoc_babel::formats::pandoc;
use serde_json::Value;
use std::path::PathBuf;

pub fn fixture_path(area: &str, name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(area)
        .join(name)
}

pub fn read_fixture_bytes(area: &str, name: &str) -> Vec<u8> {
    let path = fixture_path(area, name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}

pub fn open_ast(name: &str) -> Document {
    pandoc::open(fixture_path("ast", name)).expect("Should open AST fixture")
}

pub fn open_notebook_fixture(name: &str) -> Notebook {
    open_notebook(fixture_path("notebook", name)).expect("Should open notebook fixture")
}

/// Cells as JSON without their ids, multiline strings joined, so that cells compare
/// whichever layout their notebook was saved in.
pub fn cell_values(notebook: &Notebook) -> Vec<Value> {
    let value = serde_json::to_value(notebook).expect("Should serialize notebook");
    let cells = value["cells"].as_array().cloned().unwrap_or_default();
    cells
        .into_iter()
        .map(|mut cell| {
            if let Some(fields) = cell.as_object_mut() {
                fields.remove("id");
            }
            join_multiline(&mut cell);
            cell
        })
        .collect()
}

fn join_multiline(value: &mut Value) {
    match value {
        Value::Object(fields) => {
            for (key, field) in fields.iter_mut() {
                let multiline = matches!(key.as_str(), "source" | "text") || key.contains('/');
                match payload_text(field) {
                    Some(text) if multiline => *field = Value::String(text),
                    _ => join_multiline(field),
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(join_multiline),
        _ => {}
    }
}
