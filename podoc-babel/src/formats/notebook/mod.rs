//! Jupyter notebook format
//!
//! Converts between nbformat v4 notebooks and the AST. Notebooks are read and written
//! with the [`nbformat`] crate; documents older than nbformat 4.5 are upgraded on read.
//!
//! # Reading
//!
//! Markdown cells go through the Markdown reader. A code cell becomes a CodeBlock holding
//! its source, followed by one Block per output:
//!
//! | Output                          | Block                                               |
//! |---------------------------------|-----------------------------------------------------|
//! | stream                          | CodeBlock, `output` = "stream", `stream` = name     |
//! | rich output with a binary mime  | Para holding an Image whose url is the resource     |
//! | rich output with text only      | CodeBlock, `output` = output type                   |
//! | error                           | CodeBlock, `output` = "error", name, value, traceback |
//!
//! A code cell's input takes the notebook language as its `lang`, unless the cell
//! metadata records another one (see [`NotebookWriter`]).
//!
//! Binary payloads are decoded into the [`Resources`] mapping under
//! `output_<cell>_<output>.<ext>`. Raw cells become RawBlocks.
//!
//! # Writing
//!
//! The document is first regrouped into code cells by [`cells::wrap_code_cells`]. Runs of
//! other Blocks become markdown cells; image outputs are re-embedded from the resources.
//! Text targets link images from a resources directory with [`prefix_output_urls`].

pub mod cells;
pub mod model;
pub mod reader;
pub mod resources;
pub mod writer;

pub use cells::{wrap_code_cells, Wrapped};
pub use model::{Cell, Notebook, Output};
pub use reader::NotebookReader;
pub use resources::{
    extract_output, output_filename, prefix_output_urls, strip_output_urls, Resources,
};
pub use writer::{NotebookOptions, NotebookWriter};

use crate::ast::Document;
use crate::error::{FormatError, NotebookError};
use crate::format::Format;
use std::fs;
use std::path::Path;
use tracing::debug;

pub fn notebook_from_str(source: &str) -> Result<Notebook, NotebookError> {
    model::parse(source)
}

/// Pretty JSON with a trailing newline
pub fn notebook_to_string(notebook: &Notebook) -> Result<String, NotebookError> {
    Ok(format!("{}\n", serde_json::to_string_pretty(notebook)?))
}

pub fn open_notebook(path: impl AsRef<Path>) -> Result<Notebook, FormatError> {
    let path = path.as_ref();
    debug!("Open notebook `{}`", path.display());
    let source = fs::read_to_string(path)?;
    Ok(notebook_from_str(&source)?)
}

pub fn save_notebook(path: impl AsRef<Path>, notebook: &Notebook) -> Result<(), FormatError> {
    let path = path.as_ref();
    debug!("Save notebook `{}`", path.display());
    fs::write(path, notebook_to_string(notebook)?)?;
    Ok(())
}

/// Format implementation for `.ipynb` notebooks
#[derive(Debug, Default, Clone)]
pub struct NotebookFormat {
    options: NotebookOptions,
}

impl NotebookFormat {
    pub fn new(options: NotebookOptions) -> Self {
        NotebookFormat { options }
    }

    fn reader(&self) -> NotebookReader {
        NotebookReader::new().with_language(self.options.language.as_str())
    }

    fn writer(&self) -> NotebookWriter {
        NotebookWriter::new().with_options(self.options.clone())
    }
}

impl Format for NotebookFormat {
    fn name(&self) -> &str {
        "notebook"
    }

    fn description(&self) -> &str {
        "Jupyter notebook (nbformat 4)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["ipynb"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        self.parse_with_resources(source).map(|(doc, _)| doc)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        self.serialize_with_resources(doc, &Resources::new())
    }

    fn parse_with_resources(&self, source: &str) -> Result<(Document, Resources), FormatError> {
        let notebook = notebook_from_str(source)?;
        Ok(self.reader().read(&notebook)?)
    }

    fn serialize_with_resources(
        &self,
        doc: &Document,
        resources: &Resources,
    ) -> Result<String, FormatError> {
        let notebook = self.writer().write(doc, resources)?;
        Ok(notebook_to_string(&notebook)?)
    }
}
