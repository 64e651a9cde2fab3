//! Export tests for Markdown format (AST → Markdown)

use podoc_babel::ast::{keys, Block, BlockKind, Document, Inline, InlineKind};
use podoc_babel::format::Format;
use podoc_babel::formats::markdown::{Markdown, MarkdownAdapter};

fn ast_to_md(blocks: Vec<Block>) -> String {
    Markdown
        .serialize(&Document::with_blocks(blocks))
        .expect("Should serialize markdown")
}

/// Markdown → AST → Markdown → AST must be stable
fn assert_stable(md: &str) {
    let first = Markdown.read_markdown(md).unwrap();
    let rendered = Markdown.write_markdown(&first).unwrap();
    let second = Markdown.read_markdown(&rendered).unwrap();
    assert_eq!(first, second, "unstable through:\n{rendered}");
}

#[test]
fn test_heading() {
    assert_eq!(
        ast_to_md(vec![Block::header(2, vec![Inline::str("Intro")])]),
        "## Intro\n"
    );
}

#[test]
fn test_paragraphs_are_separated() {
    assert_eq!(
        ast_to_md(vec![
            Block::para(vec![Inline::str("a")]),
            Block::para(vec![Inline::str("b")]),
        ]),
        "a\n\nb\n"
    );
}

#[test]
fn test_strong_and_code() {
    let md = ast_to_md(vec![Block::para(vec![
        Inline::with_children(InlineKind::Strong, vec![Inline::str("bold")]),
        Inline::space(),
        Inline::code("x"),
    ])]);
    assert_eq!(md, "**bold** `x`\n");
}

#[test]
fn test_ordered_list_start() {
    let list = Block::new(BlockKind::OrderedList)
        .with_metadata(keys::START, 3)
        .unwrap()
        .child(Block::with_children(
            BlockKind::Div,
            vec![Block::plain(vec![Inline::str("three")]).into()],
        ));
    let md = ast_to_md(vec![list]);
    assert_eq!(md, "3. three\n");
}

#[test]
fn test_stable_round_trips() {
    assert_stable("# Title\n\nSome *emphasis* and **strong** text.\n");
    assert_stable("* one\n* two\n  * nested\n");
    assert_stable("1. first\n2. second\n");
    assert_stable("> quote\n>\n> more\n");
    assert_stable("```rust\nfn main() {}\n```\n");
    assert_stable("[link](https://example.org) and ![img](a.png)\n");
    assert_stable("| a | b |\n|---|---|\n| 1 | 2 |\n");
    assert_stable("text with $x$ math\n");
    assert_stable("a\n\n---\n\nb\n");
}

#[test]
fn test_notebook_metadata_is_not_rendered() {
    let output = Block::code_block(None, "1\n")
        .with_metadata(keys::OUTPUT, "stream")
        .unwrap();
    let md = ast_to_md(vec![output]);
    assert!(!md.contains("stream"));
    assert!(md.contains("1\n"));
}
