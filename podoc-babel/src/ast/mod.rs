//! The podoc Abstract Syntax Tree.
//!
//! Every conversion goes through this tree. It mirrors pandoc's document
//! model, restricted to a fixed vocabulary:
//!
//!     Block kinds:  Plain, Para, CodeBlock, RawBlock, BlockQuote, OrderedList,
//!                   BulletList, DefinitionList, Header, HorizontalRule, Table, Div
//!     Inline kinds: Str, Emph, Strong, Strikeout, Code, Space, LineBreak, Math,
//!                   Link, Image
//!
//! Shape rules
//!
//!     - A Block's children are Blocks or Inlines, never a raw string.
//!     - An Inline's children are either Inlines or a single literal string,
//!       never a Block and never both.
//!
//!     Both rules hold by construction: `Block` stores `Vec<Node>` and `Inline`
//!     stores [`InlineChildren`]. The name-based constructors on [`Node`] exist
//!     for readers working from untyped input and report violations as
//!     [`ValidationError`](crate::error::ValidationError).
//!
//! Ownership
//!
//!     Trees are built bottom-up. A child is moved into its parent, so a node
//!     has exactly one parent and cycles cannot be expressed.
//!
//! Conventions used by the readers
//!
//!     - Code and raw blocks hold their source as a single `Str` child.
//!     - List items are `Div` children of `BulletList` / `OrderedList`.
//!     - Link and Image targets live in the inline's `url` metadata.

pub mod kinds;
pub mod metadata;
pub mod nodes;

pub use kinds::{BlockKind, InlineKind};
pub use metadata::{is_internal, keys, Metadata};
pub use nodes::{Block, Document, Inline, InlineChildren, Node};
