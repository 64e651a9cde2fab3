//! Markup document conversion through a single AST
//!
//!     This crate provides the podoc Abstract Syntax Tree, a pandoc-compatible JSON codec for
//!     it, and the formats that read and write documents through it (Markdown, Jupyter
//!     notebooks, the JSON AST itself, and a tree dump for inspection).
//!
//!     TLDR: For format authors:
//!         - Babel never parses or serializes Markdown text itself, but relies on comrak for it
//!         - A format converts between its own model and the AST, nothing more
//!         - Binary content (notebook images) never lives in the AST: it travels in a side
//!           `Resources` mapping and the AST references it by filename
//!
//! Architecture
//!
//!     Every conversion is Format A → AST → Format B. The AST (./ast/) is the only shared
//!     vocabulary; formats know nothing about each other.
//!
//!     This is a pure lib, that is, it powers podoc-cli but is shell agnostic: no code
//!     should be written that supposes a shell environment, be it to std print, env vars etc.
//!     File helpers (`pandoc::open`, `notebook::open_notebook`) are the only I/O.
//!
//!     The file structure :
//!     .
//!     ├── ast                     # Node model: kinds, metadata, nodes
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── markdown            # comrak based reader/writer, MarkdownAdapter
//!     │   ├── notebook            # nbformat model, reader, writer, cell wrapping, resources
//!     │   ├── pandoc              # JSON codec
//!     │   └── treeviz             # tree dump
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     ├── <area>
//!     │   └── <testname>.rs
//!     └── fixtures
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Core Algorithms
//!
//!     Two places do real work. The codec's decoder (./formats/pandoc/) recovers from unknown
//!     node tags by splicing their children into the parent, bottom-up. The notebook writer
//!     (./formats/notebook/cells.rs) infers cell boundaries from a flat block sequence: a code
//!     block opens a cell and the output blocks that follow it join that cell.
//!
//! Library Choices
//!
//!     We offload as much as possible to specialized crates: comrak for Markdown, serde_json
//!     for both JSON formats, base64 for notebook payloads. The scope here is adapting those
//!     libraries' models to the AST and back.

pub mod ast;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;

pub use ast::{Block, Document, Inline, Node};
pub use error::{DecodeError, FormatError, NotebookError, ValidationError};
pub use format::Format;
pub use formats::notebook::Resources;
pub use registry::FormatRegistry;
