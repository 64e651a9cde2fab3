//! Format implementations
//!
//! This module contains all format implementations that convert between
//! the AST and various text representations.

pub mod icons;
pub mod markdown;
pub mod notebook;
pub mod pandoc;
pub mod treeviz;

pub use markdown::{Markdown, MarkdownAdapter};
pub use notebook::{NotebookFormat, NotebookOptions};
pub use pandoc::PandocJsonFormat;
pub use treeviz::TreevizFormat;
