//! File and Format-level tests for notebooks

use crate::common::{cell_values, fixture_path, open_ast, open_notebook_fixture};
use podoc_babel::format::Format;
use podoc_babel::formats::notebook::{open_notebook, save_notebook, NotebookFormat};
use podoc_babel::{FormatError, FormatRegistry, Resources};
use tempfile::tempdir;

#[test]
fn test_save_and_open() {
    let notebook = open_notebook_fixture("code.ipynb");
    let dir = tempdir().unwrap();
    let path = dir.path().join("copy.ipynb");

    save_notebook(&path, &notebook).unwrap();
    let reopened = open_notebook(&path).unwrap();
    assert_eq!(cell_values(&reopened), cell_values(&notebook));
    assert_eq!(
        serde_json::to_value(&reopened.metadata).unwrap(),
        serde_json::to_value(&notebook.metadata).unwrap()
    );

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.ends_with("}\n"));
}

#[test]
fn test_open_missing_file() {
    let result = open_notebook(fixture_path("notebook", "missing.ipynb"));
    assert!(matches!(result, Err(FormatError::Io(_))));
}

#[test]
fn test_format_parse_with_resources() {
    let source = std::fs::read_to_string(fixture_path("notebook", "image.ipynb")).unwrap();
    let (doc, resources) = NotebookFormat::default()
        .parse_with_resources(&source)
        .unwrap();
    assert_eq!(doc, open_ast("image.json"));
    assert!(resources.contains_key("output_1_0.png"));
}

#[test]
fn test_registry_notebook_to_markdown() {
    let source = std::fs::read_to_string(fixture_path("notebook", "code.ipynb")).unwrap();
    let (markdown, resources) = FormatRegistry::default()
        .convert(&source, "notebook", "markdown", &Resources::new())
        .unwrap();
    assert!(resources.is_empty());
    assert!(markdown.starts_with("## Hello world\n\nSome text.\n"));
    assert!(markdown.contains("a = 1\nprint(a)\na + 1\n"));
    assert!(markdown.trim_end().ends_with("The end."));
}

#[test]
fn test_registry_notebook_to_json_and_back() {
    let source = std::fs::read_to_string(fixture_path("notebook", "code.ipynb")).unwrap();
    let registry = FormatRegistry::default();
    let (json, _) = registry
        .convert(&source, "notebook", "json", &Resources::new())
        .unwrap();
    let (notebook, _) = registry
        .convert(&json, "json", "notebook", &Resources::new())
        .unwrap();

    let written = podoc_babel::formats::notebook::notebook_from_str(&notebook).unwrap();
    assert_eq!(
        cell_values(&written),
        cell_values(&open_notebook_fixture("code.ipynb"))
    );
}
