//! Writer tests (AST → Notebook)

use crate::common::{cell_values, open_ast, open_notebook_fixture, read_fixture_bytes};
use podoc_babel::ast::{keys, Block, Document, Inline};
use podoc_babel::formats::notebook::model::{notebook_language, output_type, rich_output};
use podoc_babel::formats::notebook::{
    wrap_code_cells, Cell, Notebook, NotebookOptions, NotebookReader, NotebookWriter, Output,
    Resources, Wrapped,
};
use podoc_babel::NotebookError;

fn png_resources() -> Resources {
    let mut resources = Resources::new();
    resources.insert(
        "output_1_0.png".to_string(),
        read_fixture_bytes("markdown", "output_1_0.png"),
    );
    resources
}

fn write(doc: &Document, resources: &Resources) -> Notebook {
    NotebookWriter::new()
        .write(doc, resources)
        .expect("Should write notebook")
}

fn read_back(notebook: &Notebook) -> (Document, Resources) {
    NotebookReader::new()
        .read(notebook)
        .expect("Should read notebook")
}

fn code_outputs(cell: &Cell) -> &[Output] {
    let Cell::Code { outputs, .. } = cell else {
        panic!("Expected a code cell");
    };
    outputs
}

#[test]
fn test_code_ast_writes_fixture_cells() {
    let notebook = write(&open_ast("code.json"), &Resources::new());
    assert_eq!(
        cell_values(&notebook),
        cell_values(&open_notebook_fixture("code.ipynb"))
    );
}

#[test]
fn test_image_ast_round_trips_through_reader() {
    let notebook = write(&open_ast("image.json"), &png_resources());

    let (written, written_resources) = read_back(&notebook);
    let (expected, expected_resources) = read_back(&open_notebook_fixture("image.ipynb"));
    assert_eq!(written, expected);
    assert_eq!(written_resources, expected_resources);
}

#[test]
fn test_image_output_is_display_data() {
    let notebook = write(&open_ast("image.json"), &png_resources());
    let outputs = code_outputs(&notebook.cells[1]);
    assert_eq!(outputs.len(), 1);
    assert_eq!(output_type(&outputs[0]), "display_data");
    let rich = rich_output(&outputs[0]).unwrap().unwrap();
    assert!(rich.data.contains_key("image/png"));
    assert!(rich.data.contains_key("text/plain"));
}

#[test]
fn test_missing_resource_is_an_error() {
    let err = NotebookWriter::new()
        .write(&open_ast("image.json"), &Resources::new())
        .unwrap_err();
    assert!(matches!(err, NotebookError::ResourceNotFound(name) if name == "output_1_0.png"));
}

#[test]
fn test_write_then_read_keeps_document() {
    let doc = Document::with_blocks(vec![
        Block::code_block(Some("python"), "a"),
        Block::para(vec![Inline::image("output_0_0.png", vec![])]),
    ]);
    let mut resources = Resources::new();
    resources.insert("output_0_0.png".to_string(), b"\x89PNG".to_vec());

    let notebook = write(&doc, &resources);
    assert_eq!(notebook.cells.len(), 1);

    let (read_back, read_resources) = read_back(&notebook);
    assert_eq!(read_back, doc);
    assert_eq!(read_resources, resources);
}

#[test]
fn test_code_block_language_survives_round_trip() {
    let doc = Document::with_blocks(vec![Block::code_block(Some("rust"), "fn main() {}")]);
    let notebook = write(&doc, &Resources::new());
    assert_eq!(notebook_language(&notebook), Some("rust"));

    let (back, _) = read_back(&notebook);
    assert_eq!(back, doc);
}

#[test]
fn test_code_block_without_language_survives_round_trip() {
    let doc = Document::with_blocks(vec![Block::code_block(None, "a")]);
    let (back, _) = read_back(&write(&doc, &Resources::new()));
    assert_eq!(back, doc);
    assert_eq!(back.blocks[0].metadata().get_str(keys::LANG), None);
}

#[test]
fn test_mixed_languages_survive_round_trip() {
    let doc = Document::with_blocks(vec![
        Block::code_block(Some("python"), "x = 1"),
        Block::para(vec![Inline::str("and")]),
        Block::code_block(Some("rust"), "let x = 1;"),
        Block::code_block(None, "x"),
    ]);
    let (back, _) = read_back(&write(&doc, &Resources::new()));
    assert_eq!(back, doc);
}

#[test]
fn test_code_block_with_two_image_outputs() {
    let doc = Document::with_blocks(vec![
        Block::code_block(Some("python"), "plot(a)\nplot(b)"),
        Block::para(vec![Inline::image("output_0_0.png", vec![])]),
        Block::para(vec![Inline::image("output_0_1.png", vec![])]),
    ]);
    assert_eq!(
        wrap_code_cells(&doc.blocks),
        vec![Wrapped::CodeCell(doc.blocks.iter().collect())]
    );

    let png = read_fixture_bytes("markdown", "output_1_0.png");
    let mut resources = Resources::new();
    resources.insert("output_0_0.png".to_string(), png.clone());
    resources.insert("output_0_1.png".to_string(), png);

    let notebook = write(&doc, &resources);
    assert_eq!(notebook.cells.len(), 1);
    let outputs = code_outputs(&notebook.cells[0]);
    assert_eq!(outputs.len(), 2);
    assert!(outputs.iter().all(|o| output_type(o) == "display_data"));

    let (back, back_resources) = read_back(&notebook);
    assert_eq!(back, doc);
    assert_eq!(back_resources, resources);
}

#[test]
fn test_code_ast_grouping() {
    let doc = open_ast("code.json");
    let wrapped = wrap_code_cells(&doc.blocks);
    assert_eq!(wrapped.len(), 3);
    assert_eq!(wrapped[0], Wrapped::Block(&doc.blocks[0]));
    assert_eq!(wrapped[1], Wrapped::Block(&doc.blocks[1]));
    assert_eq!(
        wrapped[2],
        Wrapped::CodeCell(doc.blocks[2..5].iter().collect())
    );
}

#[test]
fn test_error_output() {
    let doc = Document::with_blocks(vec![
        Block::code_block(Some("python"), "1 / 0"),
        Block::code_block(None, "ZeroDivisionError: division by zero\nTraceback line")
            .with_metadata(keys::OUTPUT, "error")
            .unwrap(),
    ]);
    let notebook = write(&doc, &Resources::new());
    let Output::Error(error) = &code_outputs(&notebook.cells[0])[0] else {
        panic!("Expected an error output");
    };
    assert_eq!(error.ename, "ZeroDivisionError");
    assert_eq!(error.evalue, "division by zero");
    assert_eq!(error.traceback, vec!["Traceback line".to_string()]);
}

#[test]
fn test_multiline_traceback_entries_survive_round_trip() {
    let traceback = vec![
        "\u{1b}[0;31m----------------------------\u{1b}[0m".to_string(),
        "Cell In[1], line 1\n----> 1 d['x']\n".to_string(),
        "KeyError: 'x'".to_string(),
    ];
    let source = serde_json::json!({
        "cells": [{
            "cell_type": "code", "execution_count": 1, "metadata": {}, "source": "d['x']",
            "outputs": [{
                "output_type": "error", "ename": "KeyError", "evalue": "'x'",
                "traceback": traceback
            }]
        }],
        "metadata": {"language_info": {"name": "python"}},
        "nbformat": 4,
        "nbformat_minor": 4
    });
    let notebook = podoc_babel::formats::notebook::notebook_from_str(&source.to_string()).unwrap();

    let (doc, _) = read_back(&notebook);
    let rewritten = write(&doc, &Resources::new());
    let Output::Error(error) = &code_outputs(&rewritten.cells[0])[0] else {
        panic!("Expected an error output");
    };
    assert_eq!(error.ename, "KeyError");
    assert_eq!(error.evalue, "'x'");
    assert_eq!(error.traceback, traceback);
}

#[test]
fn test_kernel_options() {
    let options = NotebookOptions {
        language: "julia".to_string(),
        kernel_name: "julia-1.10".to_string(),
        kernel_display_name: "Julia 1.10".to_string(),
    };
    let notebook = NotebookWriter::new()
        .with_options(options)
        .write(&Document::new(), &Resources::new())
        .unwrap();
    assert!(notebook.cells.is_empty());
    assert_eq!(notebook_language(&notebook), Some("julia"));
    let kernelspec = notebook.metadata.kernelspec.as_ref().unwrap();
    assert_eq!(kernelspec.name, "julia-1.10");
}
