//! CLI-specific transforms
//!
//! Views used by `mdoffice inspect` to look at what a conversion will see.
//!
//! - `blocks-treeviz`: block model as a tree with icons (`--extra-spans` adds inline spans)
//! - `blocks-json`: block model as JSON
//! - `xlsx-cells`: the worksheet cells an Excel conversion writes, formulas translated
//! - `slides-json`: slide records parsed from a JSON slide list, plus skipped entries
//!
//! Block transforms read the source with the named input format (markdown, commonmark,
//! html). `slides-json` ignores it.

use mdoffice_babel::formats::pptx::slides_from_json;
use mdoffice_babel::formats::treeviz::to_treeviz_str_with_params;
use mdoffice_babel::formats::xlsx::cell::{column_to_letters, CellValue};
use mdoffice_babel::formats::xlsx::renderer::XlsxRenderer;
use mdoffice_babel::ir::nodes::Document;
use mdoffice_babel::FormatRegistry;
use std::collections::HashMap;
use std::fmt::Write;

/// All available CLI transforms
pub use crate::cli::AVAILABLE_TRANSFORMS;

/// Execute a named transform on a source text.
///
/// # Extra Parameters
///
/// - `spans`: "true" - show inline spans in `blocks-treeviz`
///
/// # Examples
///
/// ```ignore
/// let output = execute_transform("# Title", "markdown", "blocks-treeviz", &HashMap::new())?;
/// ```
pub fn execute_transform(
    source: &str,
    from: &str,
    transform_name: &str,
    extra_params: &HashMap<String, String>,
) -> Result<String, String> {
    match transform_name {
        "blocks-treeviz" => {
            let doc = parse(source, from)?;
            Ok(to_treeviz_str_with_params(&doc, extra_params))
        }
        "blocks-json" => {
            let doc = parse(source, from)?;
            serde_json::to_string_pretty(&doc)
                .map(|json| json + "\n")
                .map_err(|e| format!("JSON serialization failed: {e}"))
        }
        "xlsx-cells" => {
            let doc = parse(source, from)?;
            Ok(worksheet_cells(&doc))
        }
        "slides-json" => {
            let (records, issues) =
                slides_from_json(source).map_err(|e| format!("Transform failed: {e}"))?;
            let value = serde_json::json!({
                "slides": records,
                "skipped": issues.iter().map(ToString::to_string).collect::<Vec<_>>(),
            });
            serde_json::to_string_pretty(&value)
                .map(|json| json + "\n")
                .map_err(|e| format!("JSON serialization failed: {e}"))
        }
        other => Err(format!(
            "Unknown transform '{other}'. Available: {}",
            AVAILABLE_TRANSFORMS.join(", ")
        )),
    }
}

fn parse(source: &str, from: &str) -> Result<Document, String> {
    FormatRegistry::default()
        .parse(source, from)
        .map_err(|e| format!("Transform failed: {e}"))
}

/// One line per cell: address, then the value as Excel will hold it.
fn worksheet_cells(doc: &Document) -> String {
    let sheet = XlsxRenderer::new().render(doc);
    let mut output = String::new();
    for ((row, col), cell) in &sheet.cells {
        let value = match &cell.value {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(text) => format!("{text:?}"),
            CellValue::Formula(formula) => format!("={formula}"),
        };
        let _ = writeln!(output, "{}{row}\t{value}", column_to_letters(*col));
    }
    output
}
