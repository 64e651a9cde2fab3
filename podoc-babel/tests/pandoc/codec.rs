//! Encoding, decoding and persistence of the JSON AST

use crate::common::{fixture_path, open_ast};
use insta::assert_snapshot;
use podoc_babel::ast::{keys, Block, BlockKind, Document, Inline, InlineKind};
use podoc_babel::error::DecodeError;
use podoc_babel::formats::pandoc::{decode, encode, from_json_str, open, save, to_json_string};
use serde_json::json;

#[test]
fn test_fixture_round_trip() {
    for name in ["code.json", "image.json"] {
        let doc = open_ast(name);
        assert_eq!(decode(&encode(&doc)).unwrap(), doc, "{name}");
    }
}

#[test]
fn test_fixture_text_is_stable() {
    let path = fixture_path("ast", "code.json");
    let text = std::fs::read_to_string(&path).unwrap();
    let doc = from_json_str(&text).unwrap();
    assert_eq!(to_json_string(&doc), text);
}

#[test]
fn test_fixture_content() {
    let doc = open_ast("code.json");
    let kinds: Vec<_> = doc.blocks.iter().map(|b| b.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            BlockKind::Header,
            BlockKind::Para,
            BlockKind::CodeBlock,
            BlockKind::CodeBlock,
            BlockKind::CodeBlock,
            BlockKind::Para,
        ]
    );
    assert_eq!(doc.blocks[2].metadata().get_str(keys::LANG), Some("python"));
    assert_eq!(doc.blocks[3].metadata().get_str(keys::OUTPUT), Some("stream"));
}

#[test]
fn test_json_string_snapshot() {
    let doc = Document::with_blocks(vec![
        Block::header(1, vec![Inline::str("Title")]),
        Block::para(vec![Inline::link("https://x.org", vec![Inline::str("x")])]),
    ]);
    assert_snapshot!(to_json_string(&doc), @r###"
    [
      {
        "unMeta": {}
      },
      [
        {
          "c": [
            {
              "c": "Title",
              "t": "Str"
            }
          ],
          "m": {
            "level": 1
          },
          "t": "Header"
        },
        {
          "c": [
            {
              "c": [
                {
                  "c": "x",
                  "t": "Str"
                }
              ],
              "m": {
                "url": "https://x.org"
              },
              "t": "Link"
            }
          ],
          "m": {},
          "t": "Para"
        }
      ]
    ]
    "###);
}

#[test]
fn test_unknown_inline_is_spliced_in_place() {
    let value = json!([
        {"unMeta": {}},
        [{"t": "Para", "m": {}, "c": [
            {"t": "Str", "c": "a"},
            {"t": "SmallCaps", "c": [{"t": "Str", "c": "b"}, {"t": "Space"}]},
            {"t": "Str", "c": "c"}
        ]}]
    ]);
    let doc = decode(&value).unwrap();
    assert_eq!(
        doc,
        Document::with_blocks(vec![Block::para(vec![
            Inline::str("a"),
            Inline::str("b"),
            Inline::space(),
            Inline::str("c"),
        ])])
    );
}

#[test]
fn test_unknown_block_is_spliced_at_top_level() {
    let value = json!([
        {"unMeta": {}},
        [
            {"t": "Para", "m": {}, "c": [{"t": "Str", "c": "first"}]},
            {"t": "Note", "m": {}, "c": [
                {"t": "Para", "m": {}, "c": [{"t": "Str", "c": "inner"}]},
                {"t": "Figure", "c": [
                    {"t": "Plain", "m": {}, "c": [{"t": "Str", "c": "deep"}]}
                ]}
            ]},
            {"t": "HorizontalRule", "m": {}, "c": []}
        ]
    ]);
    let doc = decode(&value).unwrap();
    let texts: Vec<_> = doc.blocks.iter().map(|b| b.plain_text()).collect();
    assert_eq!(texts, vec!["first", "inner", "deep", ""]);
    assert_eq!(doc.blocks[3].kind(), BlockKind::HorizontalRule);
}

#[test]
fn test_nested_unknown_inside_emphasis() {
    let value = json!([
        {"unMeta": {}},
        [{"t": "Plain", "m": {}, "c": [
            {"t": "Emph", "c": [{"t": "Span", "c": [{"t": "Str", "c": "x"}]}]}
        ]}]
    ]);
    let doc = decode(&value).unwrap();
    let emph = doc.blocks[0].inlines().next().unwrap();
    assert_eq!(emph.kind(), InlineKind::Emph);
    assert_eq!(emph.plain_text(), "x");
}

#[test]
fn test_malformed_documents() {
    assert!(matches!(
        decode(&json!({"blocks": []})),
        Err(DecodeError::Shape(_))
    ));
    assert!(matches!(
        decode(&json!([{"unMeta": {}}, [{"m": {}, "c": []}]])),
        Err(DecodeError::InvalidNode(_))
    ));
    assert!(matches!(
        from_json_str("[{\"unMeta\": {}}, ["),
        Err(DecodeError::Json(_))
    ));
}

#[test]
fn test_save_then_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");

    let mut doc = Document::with_blocks(vec![Block::code_block(Some("rust"), "fn main() {}")]);
    doc.metadata.insert("title", "Example");
    save(&path, &doc).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.ends_with("]\n"));
    assert_eq!(open(&path).unwrap(), doc);
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = open(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, podoc_babel::FormatError::Io(_)));
}
