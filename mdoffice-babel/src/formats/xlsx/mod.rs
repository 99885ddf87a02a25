//! XLSX writer
//!
//! Headings and tables of the block model become one worksheet. Table cells may hold
//! formulas with symbolic references ([`formula`]) that are resolved against where
//! each table landed on the sheet.
//!
//! Layout: a heading takes one row plus one blank row; a table takes its rows plus two
//! blank rows. Row 0 of every table is the header.

pub mod cell;
pub mod formula;
pub mod renderer;
pub mod styles;

use chrono::Utc;

use crate::common::package::{app_properties_xml, core_properties_xml, Package};
use crate::common::xml::escape_xml;
use crate::error::FormatError;
use crate::format::{Format, FormatRole, RenderOptions, Rendered};
use crate::ir::nodes::Document;

use self::renderer::XlsxRenderer;
use self::styles::StylesBuilder;

pub const DEFAULT_SHEET_TITLE: &str = "Data Report";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// Render a document into XLSX bytes with a single sheet.
pub fn render_xlsx(doc: &Document, sheet_title: &str) -> Result<Vec<u8>, FormatError> {
    let sheet = XlsxRenderer::new().render(doc);
    let title = sheet_name(sheet_title);

    let mut styles = StylesBuilder::new();
    let sheet_xml = sheet.to_xml(&mut styles)?;

    let mut package = Package::new();
    package.add("[Content_Types].xml", CONTENT_TYPES_XML);
    package.add("_rels/.rels", ROOT_RELS_XML);
    package.add("xl/workbook.xml", workbook_xml(&title));
    package.add("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML);
    package.add("xl/worksheets/sheet1.xml", sheet_xml);
    package.add("xl/styles.xml", styles.to_xml()?);
    package.add("docProps/core.xml", core_properties_xml(&title, Utc::now()));
    package.add("docProps/app.xml", app_properties_xml("mdoffice"));
    package.finish()
}

fn workbook_xml(title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        escape_xml(title)
    )
}

/// Excel sheet names: at most 31 characters, none of `[]:*?/\`.
pub fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        DEFAULT_SHEET_TITLE.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Format implementation for XLSX output
#[derive(Debug)]
pub struct XlsxFormat {
    sheet_title: String,
}

impl Default for XlsxFormat {
    fn default() -> Self {
        Self {
            sheet_title: DEFAULT_SHEET_TITLE.to_string(),
        }
    }
}

impl XlsxFormat {
    pub fn with_sheet_title(title: impl Into<String>) -> Self {
        Self {
            sheet_title: title.into(),
        }
    }
}

impl Format for XlsxFormat {
    fn name(&self) -> &str {
        "xlsx"
    }

    fn description(&self) -> &str {
        "Excel workbook (Office Open XML) built from headings and tables"
    }

    fn file_extensions(&self) -> &[&str] {
        &["xlsx"]
    }

    fn role(&self) -> FormatRole {
        FormatRole::Writer
    }

    fn option_keys(&self) -> &[&str] {
        &["sheet_title"]
    }

    fn render(&self, doc: &Document, options: &RenderOptions) -> Result<Rendered, FormatError> {
        let title = options
            .get("sheet_title")
            .map(String::as_str)
            .unwrap_or(&self.sheet_title);
        render_xlsx(doc, title).map(Rendered::Binary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_names_are_sanitised() {
        assert_eq!(sheet_name("Q1/Q2 [draft]"), "Q1Q2 draft");
        assert_eq!(sheet_name("   "), DEFAULT_SHEET_TITLE);
        assert_eq!(sheet_name(&"x".repeat(40)).len(), 31);
    }
}
