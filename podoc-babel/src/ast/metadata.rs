//! Node and document metadata.
//!
//! Metadata is an ordered string-keyed map of JSON values. Every node kind
//! accepts a closed set of keys (see [`BlockKind::metadata_keys`] and
//! [`InlineKind::metadata_keys`]). Keys starting with `_` are internal
//! bookkeeping: they are always accepted, they survive the JSON codec, and
//! they are ignored by equality.
//!
//! [`BlockKind::metadata_keys`]: crate::ast::BlockKind::metadata_keys
//! [`InlineKind::metadata_keys`]: crate::ast::InlineKind::metadata_keys

use serde_json::Value;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Recognized metadata keys.
pub mod keys {
    /// Language of a code block (`"python"`)
    pub const LANG: &str = "lang";
    /// Marks a code block as a notebook output; the value is the output type
    pub const OUTPUT: &str = "output";
    /// Stream name of a stream output (`"stdout"`, `"stderr"`)
    pub const STREAM: &str = "stream";
    pub const EXECUTION_COUNT: &str = "execution_count";
    /// Format of a raw block (`"html"`, `"latex"`)
    pub const FORMAT: &str = "format";
    pub const LEVEL: &str = "level";
    pub const ID: &str = "id";
    pub const CLASS: &str = "class";
    pub const START: &str = "start";
    pub const URL: &str = "url";
    pub const TITLE: &str = "title";
    /// Display (as opposed to inline) math
    pub const DISPLAY: &str = "display";
    /// Index of the notebook cell a block was read from
    pub const CELL: &str = "_cell";
    /// Traceback entries of an error output, when its text alone cannot restore them
    pub const TRACEBACK: &str = "_traceback";
}

/// Whether a key is internal bookkeeping rather than document content.
pub fn is_internal(key: &str) -> bool {
    key.starts_with('_')
}

#[derive(Debug, Clone, Default)]
pub struct Metadata(BTreeMap<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Metadata(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert without key validation. Node-level checks live in
    /// `Block::set_metadata` and `Inline::set_metadata`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Entries that are document content, skipping internal bookkeeping.
    pub fn content_entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter().filter(|(key, _)| !is_internal(key))
    }

    /// Copy of this map with the internal keys removed.
    pub fn without_internal(&self) -> Metadata {
        self.content_entries()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl PartialEq for Metadata {
    fn eq(&self, other: &Self) -> bool {
        self.content_entries().eq(other.content_entries())
    }
}

impl FromIterator<(String, Value)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Metadata(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
