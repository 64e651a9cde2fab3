//! Helpers over the `nbformat` v4 document model.
//!
//! The reader and writer work on [`nbformat::v4`] types. New cells and outputs are
//! built from their notebook JSON form, so they go through the same validation as
//! a notebook read from disk.

use crate::error::NotebookError;
use serde_json::{Map, Value};

pub use nbformat::v4::{Cell, Notebook, Output};

/// Mime type → payload. Payloads are a string, a list of line strings, or
/// (for `application/json`) arbitrary JSON.
pub type MimeBundle = Map<String, Value>;

/// nbformat version written by the notebook writer
pub const NBFORMAT: (i32, i32) = (4, 5);

/// Parse a notebook, upgrading documents older than 4.5 (no cell ids).
pub fn parse(source: &str) -> Result<Notebook, NotebookError> {
    let notebook = nbformat::parse_notebook(source)
        .map_err(|err| NotebookError::Format(err.to_string()))?;
    match notebook {
        nbformat::Notebook::V4(notebook) => Ok(notebook),
        nbformat::Notebook::Legacy(legacy) => nbformat::upgrade_legacy_notebook(legacy)
            .map_err(|err| NotebookError::Format(err.to_string())),
        #[allow(unreachable_patterns)]
        _ => Err(NotebookError::Format(
            "only nbformat 4 notebooks are supported".to_string(),
        )),
    }
}

/// The kernel language, from `language_info.name` or `kernelspec.language`
pub fn notebook_language(notebook: &Notebook) -> Option<&str> {
    let metadata = &notebook.metadata;
    metadata
        .language_info
        .as_ref()
        .map(|info| info.name.as_str())
        .or_else(|| {
            metadata
                .kernelspec
                .as_ref()
                .and_then(|spec| spec.language.as_deref())
        })
}

pub fn cell_type(cell: &Cell) -> &'static str {
    match cell {
        Cell::Markdown { .. } => "markdown",
        Cell::Code { .. } => "code",
        Cell::Raw { .. } => "raw",
    }
}

pub fn cell_source(cell: &Cell) -> String {
    match cell {
        Cell::Markdown { source, .. } | Cell::Code { source, .. } | Cell::Raw { source, .. } => {
            source.concat()
        }
    }
}

/// Cell metadata as a JSON object, including keys nbformat does not model.
pub fn cell_metadata(cell: &Cell) -> Result<Map<String, Value>, NotebookError> {
    let metadata = match cell {
        Cell::Markdown { metadata, .. }
        | Cell::Code { metadata, .. }
        | Cell::Raw { metadata, .. } => serde_json::to_value(metadata)?,
    };
    Ok(match metadata {
        Value::Object(map) => map.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        _ => Map::new(),
    })
}

/// The `output_type` tag
pub fn output_type(output: &Output) -> &'static str {
    match output {
        Output::Stream { .. } => "stream",
        Output::DisplayData(_) => "display_data",
        Output::ExecuteResult(_) => "execute_result",
        Output::Error(_) => "error",
    }
}

/// The payload of a `display_data` or `execute_result` output.
#[derive(Debug, Clone, PartialEq)]
pub struct RichOutput {
    pub output_type: &'static str,
    pub data: MimeBundle,
    pub execution_count: Option<i64>,
}

/// The mime bundle and execution count of a rich output, in notebook JSON form.
///
/// Returns `Ok(None)` for stream and error outputs.
pub fn rich_output(output: &Output) -> Result<Option<RichOutput>, NotebookError> {
    if !matches!(output, Output::DisplayData(_) | Output::ExecuteResult(_)) {
        return Ok(None);
    }
    let mut value = serde_json::to_value(output)?;
    let data = match value.get_mut("data").map(Value::take) {
        Some(Value::Object(data)) => data,
        _ => MimeBundle::new(),
    };
    Ok(Some(RichOutput {
        output_type: output_type(output),
        data,
        execution_count: value.get("execution_count").and_then(Value::as_i64),
    }))
}

/// Build a cell from its notebook JSON form.
pub fn cell_from_json(value: Value) -> Result<Cell, NotebookError> {
    Ok(serde_json::from_value(value)?)
}

/// Build an output from its notebook JSON form.
pub fn output_from_json(value: Value) -> Result<Output, NotebookError> {
    Ok(serde_json::from_value(value)?)
}

/// Join a payload given as a string or a list of line strings.
pub fn payload_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Array(lines) => lines
            .iter()
            .map(|line| line.as_str())
            .collect::<Option<Vec<_>>>()
            .map(|lines| lines.concat()),
        _ => None,
    }
}

/// Split text into lines, each keeping its trailing newline (nbformat convention).
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}
