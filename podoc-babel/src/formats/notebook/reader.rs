//! Notebook → AST

use super::model::{
    cell_metadata, notebook_language, payload_text, rich_output, Cell, Notebook, Output,
};
use super::resources::{extract_data, output_filename, Resources};
use crate::ast::{keys, Block, Document, Inline};
use crate::error::NotebookError;
use crate::formats::markdown::parser::split_words;
use crate::formats::markdown::{Markdown, MarkdownAdapter};
use serde_json::Value;
use tracing::debug;

/// Language used for code blocks when the notebook does not declare one
pub const DEFAULT_LANGUAGE: &str = "python";

/// Cell metadata entry where the writer records what the notebook kernel cannot
/// express, such as a code input whose `lang` differs from the notebook language.
pub const CELL_METADATA: &str = "podoc";

/// Reads a notebook into a flat Document plus the binary resources of its outputs.
///
/// Every top-level Block records the index of the cell it came from under the
/// internal `_cell` metadata key.
pub struct NotebookReader<M = Markdown> {
    markdown: M,
    language: String,
}

impl NotebookReader<Markdown> {
    pub fn new() -> Self {
        Self::with_markdown(Markdown)
    }
}

impl Default for NotebookReader<Markdown> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MarkdownAdapter> NotebookReader<M> {
    pub fn with_markdown(markdown: M) -> Self {
        NotebookReader {
            markdown,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Fallback language for notebooks without kernel metadata
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn read(&self, notebook: &Notebook) -> Result<(Document, Resources), NotebookError> {
        let language = notebook_language(notebook).unwrap_or(self.language.as_str());
        let mut doc = Document::new();
        let mut resources = Resources::new();

        for (cell_index, cell) in notebook.cells.iter().enumerate() {
            let blocks = match cell {
                Cell::Markdown { source, .. } => self.markdown.read_markdown(&source.concat())?,
                Cell::Raw { source, .. } => {
                    let metadata = cell_metadata(cell)?;
                    let format = metadata
                        .get("raw_mimetype")
                        .and_then(Value::as_str)
                        .unwrap_or("ipynb");
                    vec![Block::raw_block(format, source.concat())]
                }
                Cell::Code {
                    source,
                    execution_count,
                    outputs,
                    ..
                } => {
                    let lang = match recorded_lang(cell)? {
                        Some(recorded) => recorded,
                        None => Some(language.to_string()),
                    };
                    let mut input = Block::code_block(lang.as_deref(), source.concat());
                    if let Some(count) = execution_count {
                        input.set_metadata(keys::EXECUTION_COUNT, *count)?;
                    }
                    let mut blocks = vec![input];
                    for (output_index, output) in outputs.iter().enumerate() {
                        let block =
                            read_output(output, cell_index, output_index, &mut resources)?;
                        blocks.extend(block);
                    }
                    blocks
                }
            };

            for block in blocks {
                doc.add_block(block.with_metadata(keys::CELL, cell_index)?);
            }
        }

        debug!(
            cells = notebook.cells.len(),
            blocks = doc.blocks.len(),
            resources = resources.len(),
            "read notebook"
        );
        Ok((doc, resources))
    }
}

/// The input lang the writer recorded for a code cell.
///
/// `Some(None)` means the input had no lang; `None` means nothing was recorded and
/// the notebook language applies.
fn recorded_lang(cell: &Cell) -> Result<Option<Option<String>>, NotebookError> {
    let metadata = cell_metadata(cell)?;
    Ok(metadata
        .get(CELL_METADATA)
        .and_then(|entry| entry.get(keys::LANG))
        .map(|lang| lang.as_str().map(str::to_string)))
}

/// The Block representing one output, if it has a representation at all.
fn read_output(
    output: &Output,
    cell_index: usize,
    output_index: usize,
    resources: &mut Resources,
) -> Result<Option<Block>, NotebookError> {
    let block = match output {
        Output::Stream { name, text, .. } => Block::code_block(None, text.0.as_str())
            .with_metadata(keys::OUTPUT, "stream")?
            .with_metadata(keys::STREAM, name.as_str())?,

        Output::Error(error) => {
            let mut text = format!("{}: {}", error.ename, error.evalue);
            for entry in &error.traceback {
                text.push('\n');
                text.push_str(entry);
            }
            let mut block = Block::code_block(None, text).with_metadata(keys::OUTPUT, "error")?;
            if error.evalue.contains('\n') || !traceback_survives_lines(&error.traceback) {
                block.set_metadata(keys::TRACEBACK, error.traceback.clone())?;
            }
            block
        }

        Output::DisplayData(_) | Output::ExecuteResult(_) => {
            let Some(rich) = rich_output(output)? else {
                return Ok(None);
            };
            let plain = rich.data.get("text/plain").and_then(payload_text);

            if let Some((mime, bytes)) = extract_data(&rich.data)? {
                let filename = output_filename(&mime, cell_index, output_index);
                let alt = plain.as_deref().map(split_words).unwrap_or_default();
                let image = Block::para(vec![Inline::image(&filename, alt)]);
                resources.insert(filename, bytes);
                image
            } else if let Some(text) = plain {
                let mut block =
                    Block::code_block(None, text).with_metadata(keys::OUTPUT, rich.output_type)?;
                if rich.output_type == "execute_result" {
                    if let Some(count) = rich.execution_count {
                        block.set_metadata(keys::EXECUTION_COUNT, count)?;
                    }
                }
                block
            } else {
                debug!(
                    cell = cell_index,
                    output = output_index,
                    mimes = ?rich.data.keys().collect::<Vec<_>>(),
                    "skipping output without a recognized mime type"
                );
                return Ok(None);
            }
        }
    };
    Ok(Some(block))
}

/// Whether splitting the joined traceback into lines gives back the same entries.
fn traceback_survives_lines(traceback: &[String]) -> bool {
    let joined = traceback.join("\n");
    joined.lines().eq(traceback.iter().map(String::as_str))
}
