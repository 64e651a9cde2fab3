//! AST → Notebook

use super::cells::{output_image, wrap_code_cells, Wrapped};
use super::model::{
    cell_from_json, output_from_json, split_lines, Cell, MimeBundle, Notebook, Output, NBFORMAT,
};
use super::reader::{CELL_METADATA, DEFAULT_LANGUAGE};
use super::resources::{encode_payload, Resources};
use crate::ast::{keys, Block, BlockKind, Document};
use crate::error::NotebookError;
use crate::formats::markdown::{Markdown, MarkdownAdapter};
use serde_json::{json, Value};
use tracing::debug;

/// Kernel information written into the notebook metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookOptions {
    pub language: String,
    pub kernel_name: String,
    pub kernel_display_name: String,
}

impl Default for NotebookOptions {
    fn default() -> Self {
        NotebookOptions {
            language: DEFAULT_LANGUAGE.to_string(),
            kernel_name: "python3".to_string(),
            kernel_display_name: "Python 3".to_string(),
        }
    }
}

/// Writes a Document back into a notebook, regrouping code cells and
/// re-embedding the resources their image outputs reference.
///
/// The notebook language is the `lang` of the first code input, or the configured
/// language when the document has none. Code inputs whose `lang` differs from it
/// record their own under the `podoc` cell metadata entry.
pub struct NotebookWriter<M = Markdown> {
    markdown: M,
    options: NotebookOptions,
}

impl NotebookWriter<Markdown> {
    pub fn new() -> Self {
        Self::with_markdown(Markdown)
    }
}

impl Default for NotebookWriter<Markdown> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MarkdownAdapter> NotebookWriter<M> {
    pub fn with_markdown(markdown: M) -> Self {
        NotebookWriter {
            markdown,
            options: NotebookOptions::default(),
        }
    }

    pub fn with_options(mut self, options: NotebookOptions) -> Self {
        self.options = options;
        self
    }

    pub fn write(&self, doc: &Document, resources: &Resources) -> Result<Notebook, NotebookError> {
        let wrapped = wrap_code_cells(&doc.blocks);
        let language = document_language(&wrapped).unwrap_or(self.options.language.as_str());

        let mut notebook: Notebook = serde_json::from_value(json!({
            "cells": [],
            "metadata": self.notebook_metadata(language),
            "nbformat": NBFORMAT.0,
            "nbformat_minor": NBFORMAT.1,
        }))?;

        let mut prose: Vec<Block> = Vec::new();
        for item in wrapped {
            match item {
                Wrapped::Block(block) if is_raw_cell(block) => {
                    self.flush_prose(&mut prose, &mut notebook.cells)?;
                    let cell = raw_cell(block, cell_id(&notebook.cells))?;
                    notebook.cells.push(cell);
                }
                Wrapped::Block(block) => prose.push(block.clone()),
                Wrapped::CodeCell(blocks) => {
                    self.flush_prose(&mut prose, &mut notebook.cells)?;
                    let id = cell_id(&notebook.cells);
                    notebook.cells.push(code_cell(&blocks, language, id, resources)?);
                }
            }
        }
        self.flush_prose(&mut prose, &mut notebook.cells)?;

        debug!(
            blocks = doc.blocks.len(),
            cells = notebook.cells.len(),
            language,
            "wrote notebook"
        );
        Ok(notebook)
    }

    fn flush_prose(&self, prose: &mut Vec<Block>, cells: &mut Vec<Cell>) -> Result<(), NotebookError> {
        if prose.is_empty() {
            return Ok(());
        }
        let source = self.markdown.write_markdown(prose)?;
        let cell = cell_from_json(json!({
            "id": cell_id(cells),
            "cell_type": "markdown",
            "metadata": {},
            "source": split_lines(source.trim_end()),
        }))?;
        cells.push(cell);
        prose.clear();
        Ok(())
    }

    /// Kernel metadata. The kernelspec comes from the options, so it is only written
    /// when the notebook language is the configured one.
    fn notebook_metadata(&self, language: &str) -> Value {
        let options = &self.options;
        let mut metadata = json!({ "language_info": { "name": language } });
        if language == options.language {
            metadata["kernelspec"] = json!({
                "display_name": options.kernel_display_name,
                "language": options.language,
                "name": options.kernel_name,
            });
        }
        metadata
    }
}

/// The `lang` of the first code input, if it has one
fn document_language<'a>(wrapped: &[Wrapped<'a>]) -> Option<&'a str> {
    wrapped
        .iter()
        .find_map(|item| match item {
            Wrapped::CodeCell(blocks) => blocks
                .first()
                .copied()
                .map(|input| input.metadata().get_str(keys::LANG)),
            Wrapped::Block(_) => None,
        })
        .flatten()
}

fn cell_id(cells: &[Cell]) -> String {
    format!("cell-{}", cells.len())
}

/// HTML stays inside markdown cells; any other raw content gets its own cell.
fn is_raw_cell(block: &Block) -> bool {
    block.kind() == BlockKind::RawBlock && block.metadata().get_str(keys::FORMAT) != Some("html")
}

fn raw_cell(block: &Block, id: String) -> Result<Cell, NotebookError> {
    let metadata = match block.metadata().get_str(keys::FORMAT) {
        Some("ipynb") | None => json!({}),
        Some(format) => json!({ "raw_mimetype": format }),
    };
    cell_from_json(json!({
        "id": id,
        "cell_type": "raw",
        "metadata": metadata,
        "source": split_lines(&block.plain_text()),
    }))
}

fn code_cell(
    blocks: &[&Block],
    language: &str,
    id: String,
    resources: &Resources,
) -> Result<Cell, NotebookError> {
    let Some((input, outputs)) = blocks.split_first() else {
        return cell_from_json(json!({
            "id": id,
            "cell_type": "code",
            "execution_count": null,
            "metadata": {},
            "outputs": [],
            "source": [],
        }));
    };
    let execution_count = input.metadata().get_i64(keys::EXECUTION_COUNT);
    let outputs = outputs
        .iter()
        .map(|block| write_output(block, execution_count, resources))
        .collect::<Result<Vec<_>, _>>()?;

    let metadata = match input.metadata().get_str(keys::LANG) {
        Some(lang) if lang == language => json!({}),
        lang => json!({ (CELL_METADATA): { (keys::LANG): lang } }),
    };
    let source = input.plain_text();
    let mut cell = cell_from_json(json!({
        "id": id,
        "cell_type": "code",
        "execution_count": execution_count,
        "metadata": metadata,
        "outputs": [],
        "source": split_lines(&source),
    }))?;
    if let Cell::Code { outputs: slot, .. } = &mut cell {
        *slot = outputs;
    }
    Ok(cell)
}

fn write_output(
    block: &Block,
    cell_execution_count: Option<i64>,
    resources: &Resources,
) -> Result<Output, NotebookError> {
    if let Some((url, mime)) = output_image(block) {
        let bytes = resources
            .get(url)
            .ok_or_else(|| NotebookError::ResourceNotFound(url.to_string()))?;

        let mut data = MimeBundle::new();
        data.insert(mime.to_string(), encode_payload(mime, bytes));
        let alt = block.plain_text();
        if !alt.is_empty() {
            data.insert("text/plain".to_string(), Value::String(alt));
        }
        return output_from_json(json!({
            "output_type": "display_data",
            "data": data,
            "metadata": {},
        }));
    }

    let meta = block.metadata();
    let text = block.plain_text();
    let value = match meta.get_str(keys::OUTPUT) {
        Some("stream") => json!({
            "output_type": "stream",
            "name": meta.get_str(keys::STREAM).unwrap_or("stdout"),
            "text": text,
        }),
        Some("error") => {
            let recorded = meta
                .get(keys::TRACEBACK)
                .and_then(|entries| serde_json::from_value(entries.clone()).ok());
            let (header, traceback) = split_error(&text, recorded);
            let (ename, evalue) = header.split_once(": ").unwrap_or((header, ""));
            json!({
                "output_type": "error",
                "ename": ename,
                "evalue": evalue,
                "traceback": traceback,
            })
        }
        // execute_result always carries a count; 0 when neither the output nor its cell has one
        Some("execute_result") => json!({
            "output_type": "execute_result",
            "execution_count": meta
                .get_i64(keys::EXECUTION_COUNT)
                .or(cell_execution_count)
                .unwrap_or(0),
            "data": { "text/plain": text },
            "metadata": {},
        }),
        _ => json!({
            "output_type": "display_data",
            "data": { "text/plain": text },
            "metadata": {},
        }),
    };
    output_from_json(value)
}

/// Split error text into its `ename: evalue` header and the traceback entries.
///
/// Entries recorded by the reader win as long as the text still ends with them;
/// otherwise every line after the header is one entry.
fn split_error(text: &str, recorded: Option<Vec<String>>) -> (&str, Vec<String>) {
    if let Some(entries) = recorded {
        let tail: String = entries.iter().map(|entry| format!("\n{entry}")).collect();
        if let Some(header) = text.strip_suffix(tail.as_str()) {
            return (header, entries);
        }
    }
    let (header, rest) = text.split_once('\n').unwrap_or((text, ""));
    (header, rest.lines().map(str::to_string).collect())
}
