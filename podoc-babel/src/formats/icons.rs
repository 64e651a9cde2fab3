//! Icon mapping for the tree visualization format

/// Get the Unicode icon for a node kind name
///
/// Returns a single Unicode character that visually represents the node kind.
pub fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Document" => "⧉",
        "Para" => "¶",
        "Plain" => "↵",
        "CodeBlock" => "𝒱",
        "RawBlock" => "ℛ",
        "BlockQuote" => "❝",
        "BulletList" => "☰",
        "OrderedList" => "№",
        "DefinitionList" => "≔",
        "Header" => "§",
        "HorizontalRule" => "⎯",
        "Table" => "▦",
        "Div" => "□",
        "Str" => "◦",
        "Emph" => "𝐼",
        "Strong" => "𝐁",
        "Strikeout" => "≁",
        "Code" => "ƒ",
        "Space" => "␣",
        "LineBreak" => "⏎",
        "Math" => "√",
        "Link" => "⊕",
        "Image" => "▣",
        _ => "○",
    }
}
