//! Shared icon mapping for the block tree visualization

/// Get the Unicode icon for a given node type
///
/// Returns a single Unicode character that visually represents the node type,
/// for quick identification in `treeviz` output.
pub fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Document" => "⧉",
        "Heading" => "§",
        "Paragraph" => "¶",
        "Quote" => "❝",
        "List" => "☰",
        "ListItem" => "•",
        "Table" => "▦",
        "TableRow" => "≡",
        "Rule" => "⎯",
        "Text" => "◦",
        "Bold" => "𝐁",
        "Italic" => "𝐼",
        "Code" => "ƒ",
        "Link" => "⊕",
        "Break" => "↵",
        _ => "○",
    }
}
