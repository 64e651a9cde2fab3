//! Property tests: node shape rules and codec round trip

use podoc_babel::ast::{Block, BlockKind, Document, Inline, InlineKind, Metadata, Node};
use podoc_babel::formats::pandoc::{decode, encode, from_json_str, to_json_string};
use proptest::prelude::*;

/// A tree described by kind names only, as an untyped reader would see it
#[derive(Debug, Clone)]
enum NamedTree {
    Text(String, String),
    Nodes(String, Vec<NamedTree>),
}

fn kind_name() -> impl Strategy<Value = String> {
    let names: Vec<String> = BlockKind::ALL
        .iter()
        .map(|k| k.name().to_string())
        .chain(InlineKind::ALL.iter().map(|k| k.name().to_string()))
        .chain(["Note", "Span", "SmallCaps"].iter().map(|s| s.to_string()))
        .collect();
    proptest::sample::select(names)
}

fn named_tree() -> impl Strategy<Value = NamedTree> {
    let leaf = (kind_name(), "[a-z ]{0,6}").prop_map(|(name, text)| NamedTree::Text(name, text));
    leaf.prop_recursive(4, 32, 4, |inner| {
        (kind_name(), prop::collection::vec(inner, 0..4))
            .prop_map(|(name, children)| NamedTree::Nodes(name, children))
    })
}

fn is_block_name(name: &str) -> bool {
    name.parse::<BlockKind>().is_ok()
}

fn is_inline_name(name: &str) -> bool {
    name.parse::<InlineKind>().is_ok()
}

fn build(tree: &NamedTree) -> Result<Node, podoc_babel::ValidationError> {
    match tree {
        NamedTree::Text(name, text) => Node::inline_text(name, text.as_str()),
        NamedTree::Nodes(name, children) => {
            let children = children.iter().map(build).collect::<Result<Vec<_>, _>>()?;
            if is_block_name(name) {
                Node::block(name, Metadata::new(), children)
            } else {
                Node::inline(name, children)
            }
        }
    }
}

/// Whether a tree respects the shape rules and uses known kinds only
fn is_well_formed(tree: &NamedTree) -> bool {
    match tree {
        NamedTree::Text(name, _) => is_inline_name(name),
        NamedTree::Nodes(name, children) => {
            children.iter().all(is_well_formed)
                && (is_block_name(name)
                    || (is_inline_name(name) && children.iter().all(builds_inline)))
        }
    }
}

fn builds_inline(tree: &NamedTree) -> bool {
    match tree {
        NamedTree::Text(..) => true,
        NamedTree::Nodes(name, _) => is_inline_name(name),
    }
}

fn root_name(tree: &NamedTree) -> &str {
    match tree {
        NamedTree::Text(name, _) | NamedTree::Nodes(name, _) => name,
    }
}

fn word() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,8}"
}

fn inline() -> impl Strategy<Value = Inline> + Clone {
    let leaf = prop_oneof![
        word().prop_map(Inline::str),
        Just(Inline::space()),
        Just(Inline::line_break()),
        word().prop_map(Inline::code),
        (word(), any::<bool>()).prop_map(|(text, display)| Inline::math(text, display)),
    ];
    leaf.prop_recursive(3, 24, 3, |inner| {
        let children = prop::collection::vec(inner, 0..3);
        prop_oneof![
            children
                .clone()
                .prop_map(|c| Inline::with_children(InlineKind::Emph, c)),
            children
                .clone()
                .prop_map(|c| Inline::with_children(InlineKind::Strong, c)),
            children
                .clone()
                .prop_map(|c| Inline::with_children(InlineKind::Strikeout, c)),
            (word(), children.clone()).prop_map(|(url, c)| Inline::link(&url, c)),
            (word(), children).prop_map(|(url, c)| Inline::image(&format!("{url}.png"), c)),
        ]
    })
}

fn block() -> impl Strategy<Value = Block> {
    let inlines = prop::collection::vec(inline(), 0..4);
    let leaf = prop_oneof![
        inlines.clone().prop_map(Block::para),
        inlines.clone().prop_map(Block::plain),
        (1u8..=6, inlines).prop_map(|(level, c)| Block::header(level, c)),
        (proptest::option::of(word()), "[a-z =\n]{0,12}")
            .prop_map(|(lang, text)| Block::code_block(lang.as_deref(), text)),
        Just(Block::new(BlockKind::HorizontalRule)),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        let blocks = prop::collection::vec(inner, 0..3);
        prop_oneof![
            blocks.clone().prop_map(|b| {
                Block::with_children(BlockKind::BlockQuote, b.into_iter().map(Node::Block).collect())
            }),
            blocks.prop_map(|b| {
                let item = Block::with_children(BlockKind::Div, b.into_iter().map(Node::Block).collect());
                Block::new(BlockKind::BulletList).child(item)
            }),
        ]
    })
}

fn document() -> impl Strategy<Value = Document> {
    prop::collection::vec(block(), 0..5).prop_map(Document::with_blocks)
}

proptest! {
    #[test]
    fn construction_succeeds_iff_well_formed(tree in named_tree()) {
        let result = build(&tree);
        prop_assert_eq!(result.is_ok(), is_well_formed(&tree), "{:?}", tree);
        if let Ok(node) = result {
            prop_assert_eq!(node.name(), root_name(&tree));
            prop_assert_eq!(node.is_block(), is_block_name(root_name(&tree)));
        }
    }

    #[test]
    fn codec_round_trip(doc in document()) {
        prop_assert_eq!(decode(&encode(&doc)).unwrap(), doc.clone());
        prop_assert_eq!(from_json_str(&to_json_string(&doc)).unwrap(), doc);
    }
}
