//! Reader tests (Notebook → AST)

use crate::common::{open_ast, open_notebook_fixture, read_fixture_bytes};
use podoc_babel::ast::{keys, BlockKind, Document};
use podoc_babel::formats::markdown::{Markdown, MarkdownAdapter};
use podoc_babel::formats::notebook::{extract_output, Cell, NotebookReader};

fn read(name: &str) -> Document {
    let (doc, _) = NotebookReader::new()
        .read(&open_notebook_fixture(name))
        .expect("Should read notebook");
    doc
}

#[test]
fn test_hello_matches_markdown_reader() {
    let doc = read("hello.ipynb");
    assert_eq!(doc.blocks, Markdown.read_markdown("hello *world*").unwrap());
}

#[test]
fn test_code_notebook_matches_ast_fixture() {
    assert_eq!(read("code.ipynb"), open_ast("code.json"));
}

#[test]
fn test_image_notebook_matches_ast_fixture() {
    assert_eq!(read("image.ipynb"), open_ast("image.json"));
}

#[test]
fn test_blocks_record_their_cell() {
    let doc = read("code.ipynb");
    let cells: Vec<_> = doc
        .blocks
        .iter()
        .map(|b| b.metadata().get_i64(keys::CELL))
        .collect();
    assert_eq!(
        cells,
        vec![Some(0), Some(0), Some(1), Some(1), Some(1), Some(2)]
    );
}

#[test]
fn test_cell_index_is_ignored_by_equality() {
    let doc = read("code.ipynb");
    let fixture = open_ast("code.json");
    assert!(fixture.blocks[0].metadata().get(keys::CELL).is_none());
    assert_eq!(doc.blocks[0], fixture.blocks[0]);
    assert_eq!(doc.blocks[0].metadata().len(), fixture.blocks[0].metadata().len() + 1);
}

#[test]
fn test_image_resource_is_extracted() {
    let (doc, resources) = NotebookReader::new()
        .read(&open_notebook_fixture("image.ipynb"))
        .unwrap();
    let png = read_fixture_bytes("markdown", "output_1_0.png");

    assert_eq!(resources.len(), 1);
    assert_eq!(resources.get("output_1_0.png"), Some(&png));

    let image = doc.blocks[2].inlines().next().unwrap();
    assert_eq!(image.url(), Some("output_1_0.png"));
    assert_eq!(image.plain_text(), "<Figure>");
}

#[test]
fn test_extract_output_on_fixture() {
    let notebook = open_notebook_fixture("image.ipynb");
    let Cell::Code { outputs, .. } = &notebook.cells[1] else {
        panic!("Expected a code cell");
    };
    let (mime, bytes) = extract_output(&outputs[0]).unwrap().unwrap();
    assert_eq!(mime, "image/png");
    assert_eq!(bytes, read_fixture_bytes("markdown", "output_1_0.png"));
}

#[test]
fn test_text_outputs_are_code_blocks() {
    let doc = read("code.ipynb");
    let kinds: Vec<_> = doc.blocks.iter().map(|b| b.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            BlockKind::Header,
            BlockKind::Para,
            BlockKind::CodeBlock,
            BlockKind::CodeBlock,
            BlockKind::CodeBlock,
            BlockKind::Para,
        ]
    );
    assert_eq!(doc.blocks[3].metadata().get_str(keys::STREAM), Some("stdout"));
    assert_eq!(
        doc.blocks[4].metadata().get_str(keys::OUTPUT),
        Some("execute_result")
    );
}
