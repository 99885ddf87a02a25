//! JSON dump of the block model, for tooling and debugging.

use crate::error::FormatError;
use crate::format::{Format, FormatRole, RenderOptions, Rendered};
use crate::ir::nodes::Document;

pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Block model as pretty-printed JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn role(&self) -> FormatRole {
        FormatRole::Writer
    }

    fn render(&self, doc: &Document, _options: &RenderOptions) -> Result<Rendered, FormatError> {
        serde_json::to_string_pretty(doc)
            .map(Rendered::Text)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::markdown::parse_markdown;

    #[test]
    fn blocks_are_tagged_by_type() {
        let doc = parse_markdown("# Hi\n\n---");
        let Rendered::Text(text) = JsonFormat.render(&doc, &RenderOptions::new()).unwrap() else {
            panic!("json is text");
        };
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["blocks"][0]["type"], "heading");
        assert_eq!(json["blocks"][0]["level"], 1);
        assert_eq!(json["blocks"][0]["content"][0]["value"], "Hi");
        assert_eq!(json["blocks"][1]["type"], "rule");
    }
}
