//! Pandoc-compatible JSON codec tests

mod codec;
mod properties;
