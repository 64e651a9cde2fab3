//! Notebook format tests
//!
//! Tests for Notebook ↔ AST conversion against the fixtures in `fixtures/notebook` and
//! their expected ASTs in `fixtures/ast`.

mod files;
mod reader;
mod writer;
