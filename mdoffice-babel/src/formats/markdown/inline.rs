//! Inline span tokenizer shared by the block parser and the table extractor.
//!
//! Backslash escapes are swapped for private-use placeholders before the
//! span pattern runs, so an escaped `*` can never open or close emphasis, and
//! are restored to their literal character once the spans are cut.

use crate::ir::nodes::Inline;
use once_cell::sync::Lazy;
use regex::Regex;

/// Alternation in priority order: bold, italic, code, link, explicit break.
static INLINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*(.+?)\*\*|\*(.+?)\*|`(.+?)`|\[([^\]]+)\]\(([^)\s]+)\)| {2}\n")
        .expect("inline pattern is valid")
});

/// First code point of the block used to protect escaped ASCII punctuation.
const PLACEHOLDER_BASE: u32 = 0xF0000;

/// Tokenizes a text fragment into styled spans.
///
/// Unterminated delimiters and malformed links are kept as literal text.
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let protected = protect_escapes(text);
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE_PATTERN.captures_iter(&protected) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            push_span(&mut spans, Inline::Text(restore_escapes(&protected[last..whole.start()])));
        }

        let span = if let Some(bold) = caps.get(1) {
            Inline::Bold(restore_escapes(bold.as_str()))
        } else if let Some(italic) = caps.get(2) {
            Inline::Italic(restore_escapes(italic.as_str()))
        } else if let Some(code) = caps.get(3) {
            Inline::Code(restore_escapes(code.as_str()))
        } else if let (Some(label), Some(url)) = (caps.get(4), caps.get(5)) {
            Inline::Link {
                text: restore_escapes(label.as_str()),
                url: restore_escapes(url.as_str()),
            }
        } else {
            Inline::Break
        };
        push_span(&mut spans, span);
        last = whole.end();
    }

    if last < protected.len() {
        push_span(&mut spans, Inline::Text(restore_escapes(&protected[last..])));
    }
    spans
}

fn push_span(spans: &mut Vec<Inline>, span: Inline) {
    if !matches!(span, Inline::Break) && span.text().is_empty() {
        return;
    }
    spans.push(span);
}

fn protect_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_punctuation() {
                    chars.next();
                    out.push(placeholder_for(next));
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

fn placeholder_for(c: char) -> char {
    char::from_u32(PLACEHOLDER_BASE + c as u32).unwrap_or(c)
}

fn restore_escapes(text: &str) -> String {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if (PLACEHOLDER_BASE..PLACEHOLDER_BASE + 0x80).contains(&code) {
                char::from_u32(code - PLACEHOLDER_BASE).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}
