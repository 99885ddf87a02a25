//! Block model → WordprocessingML.

use std::fmt::Write as FmtWrite;

use tracing::debug;

use crate::common::xml::{escape_xml, needs_space_preserve};
use crate::error::FormatError;
use crate::ir::nodes::{Block, Document, Inline, List, Table, TableCellAlignment};

/// Deepest list level with its own paragraph style. Deeper items reuse it.
const MAX_STYLED_LIST_LEVEL: usize = 2;
/// WordprocessingML numbering definitions carry nine levels.
const MAX_NUMBERING_LEVEL: usize = 8;

const HYPERLINK_COLOR: &str = "0000FF";
const CODE_FONT: &str = "Courier New";

/// Numbering instance of one rendered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberingInstance {
    pub num_id: u32,
    pub ordered: bool,
}

/// External hyperlink target registered during rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperlinkRel {
    pub id: String,
    pub url: String,
}

/// Output of one render pass: the document body plus what it references.
#[derive(Debug, Default)]
pub struct RenderedBody {
    pub document_xml: String,
    pub hyperlinks: Vec<HyperlinkRel>,
    pub numbering: Vec<NumberingInstance>,
}

/// Relationship ids 1 and 2 are taken by styles and numbering.
const FIRST_HYPERLINK_REL: usize = 3;

/// Bullets share one numbering instance.
const BULLET_NUM_ID: u32 = 1;

/// Sequential writer for `word/document.xml`.
pub struct DocxRenderer {
    xml: String,
    hyperlinks: Vec<HyperlinkRel>,
    numbering: Vec<NumberingInstance>,
}

impl Default for DocxRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxRenderer {
    pub fn new() -> Self {
        Self {
            xml: String::with_capacity(4096),
            hyperlinks: Vec::new(),
            numbering: vec![NumberingInstance {
                num_id: BULLET_NUM_ID,
                ordered: false,
            }],
        }
    }

    pub fn render(mut self, doc: &Document) -> Result<RenderedBody, FormatError> {
        self.xml
            .push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        self.xml.push_str(r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>"#);

        for block in &doc.blocks {
            self.write_block(block)?;
        }

        // A4 portrait with one inch margins.
        self.xml.push_str(r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>"#);
        self.xml.push_str("</w:body></w:document>");

        debug!(
            blocks = doc.blocks.len(),
            hyperlinks = self.hyperlinks.len(),
            lists = self.numbering.len() - 1,
            "rendered docx body"
        );
        Ok(RenderedBody {
            document_xml: self.xml,
            hyperlinks: self.hyperlinks,
            numbering: self.numbering,
        })
    }

    fn write_block(&mut self, block: &Block) -> Result<(), FormatError> {
        match block {
            Block::Heading(h) => {
                let style = format!("Heading{}", h.level.clamp(1, 6));
                self.write_paragraph(Some(&style), None, &h.content)
            }
            Block::Paragraph(p) if p.is_empty() => {
                self.xml.push_str("<w:p/>");
                Ok(())
            }
            Block::Paragraph(p) => self.write_paragraph(None, None, &p.content),
            Block::Quote(q) => self.write_paragraph(Some("Quote"), None, &q.content),
            Block::List(list) => self.write_list(list),
            Block::Table(table) => self.write_table(table),
            Block::Rule => {
                self.xml.push_str(r#"<w:p><w:pPr><w:pBdr><w:bottom w:val="single" w:sz="6" w:space="1" w:color="auto"/></w:pBdr></w:pPr></w:p>"#);
                Ok(())
            }
        }
    }

    fn write_paragraph(
        &mut self,
        style: Option<&str>,
        numbering: Option<(u32, usize)>,
        content: &[Inline],
    ) -> Result<(), FormatError> {
        self.xml.push_str("<w:p>");
        if style.is_some() || numbering.is_some() {
            self.xml.push_str("<w:pPr>");
            if let Some(style) = style {
                write!(self.xml, r#"<w:pStyle w:val="{style}"/>"#)?;
            }
            if let Some((num_id, level)) = numbering {
                write!(
                    self.xml,
                    r#"<w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{num_id}"/></w:numPr>"#,
                    level.min(MAX_NUMBERING_LEVEL)
                )?;
            }
            self.xml.push_str("</w:pPr>");
        }
        self.write_runs(content)?;
        self.xml.push_str("</w:p>");
        Ok(())
    }

    /// Items first, then each item's nested lists, depth first.
    fn write_list(&mut self, list: &List) -> Result<(), FormatError> {
        let num_id = if list.ordered {
            let num_id = self.numbering.len() as u32 + 1;
            self.numbering.push(NumberingInstance {
                num_id,
                ordered: true,
            });
            num_id
        } else {
            BULLET_NUM_ID
        };
        let style = list_style(list.ordered, list.level);

        for item in &list.items {
            self.write_paragraph(Some(&style), Some((num_id, list.level)), &item.content)?;
            for nested in &item.children {
                self.write_list(nested)?;
            }
        }
        Ok(())
    }

    fn write_table(&mut self, table: &Table) -> Result<(), FormatError> {
        let columns = table.column_count();
        if columns == 0 {
            return Ok(());
        }

        self.xml.push_str(r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="0" w:type="auto"/><w:tblLook w:val="04A0" w:firstRow="1" w:lastRow="0" w:firstColumn="1" w:lastColumn="0" w:noHBand="0" w:noVBand="1"/></w:tblPr><w:tblGrid>"#);
        for _ in 0..columns {
            self.xml.push_str("<w:gridCol/>");
        }
        self.xml.push_str("</w:tblGrid>");

        for (row_index, row) in table.rows.iter().enumerate() {
            self.xml.push_str("<w:tr>");
            if row_index == 0 {
                self.xml.push_str("<w:trPr><w:tblHeader/></w:trPr>");
            }
            for col in 0..columns {
                self.xml
                    .push_str(r#"<w:tc><w:tcPr><w:tcW w:w="0" w:type="auto"/></w:tcPr><w:p>"#);
                // Ragged rows are padded with empty cells.
                if let Some(cell) = row.cells.get(col) {
                    if let Some(jc) = justification(cell.align) {
                        write!(self.xml, r#"<w:pPr><w:jc w:val="{jc}"/></w:pPr>"#)?;
                    }
                    self.write_runs(&cell.content)?;
                }
                self.xml.push_str("</w:p></w:tc>");
            }
            self.xml.push_str("</w:tr>");
        }
        self.xml.push_str("</w:tbl>");
        Ok(())
    }

    fn write_runs(&mut self, content: &[Inline]) -> Result<(), FormatError> {
        for span in content {
            match span {
                Inline::Text(text) => self.write_run("", text)?,
                Inline::Bold(text) => self.write_run("<w:b/><w:bCs/>", text)?,
                Inline::Italic(text) => self.write_run("<w:i/><w:iCs/>", text)?,
                Inline::Code(text) => {
                    let props = format!(
                        r#"<w:rFonts w:ascii="{CODE_FONT}" w:hAnsi="{CODE_FONT}" w:cs="{CODE_FONT}"/>"#
                    );
                    self.write_run(&props, text)?
                }
                Inline::Link { text, url } => {
                    let id = self.hyperlink_rel(url);
                    write!(self.xml, r#"<w:hyperlink r:id="{id}">"#)?;
                    let props = format!(
                        r#"<w:rStyle w:val="Hyperlink"/><w:color w:val="{HYPERLINK_COLOR}"/><w:u w:val="single"/>"#
                    );
                    self.write_run(&props, text)?;
                    self.xml.push_str("</w:hyperlink>");
                }
                Inline::Break => self.xml.push_str("<w:r><w:br/></w:r>"),
            }
        }
        Ok(())
    }

    fn write_run(&mut self, props: &str, text: &str) -> Result<(), FormatError> {
        self.xml.push_str("<w:r>");
        if !props.is_empty() {
            write!(self.xml, "<w:rPr>{props}</w:rPr>")?;
        }
        if needs_space_preserve(text) {
            write!(self.xml, r#"<w:t xml:space="preserve">{}</w:t>"#, escape_xml(text))?;
        } else {
            write!(self.xml, "<w:t>{}</w:t>", escape_xml(text))?;
        }
        self.xml.push_str("</w:r>");
        Ok(())
    }

    /// Each link gets its own relationship, even for repeated URLs.
    fn hyperlink_rel(&mut self, url: &str) -> String {
        let id = format!("rId{}", FIRST_HYPERLINK_REL + self.hyperlinks.len());
        self.hyperlinks.push(HyperlinkRel {
            id: id.clone(),
            url: url.to_string(),
        });
        id
    }
}

/// `ListBullet`, `ListBullet2`, `ListBullet3` and the `ListNumber` equivalents.
pub fn list_style(ordered: bool, level: usize) -> String {
    let base = if ordered { "ListNumber" } else { "ListBullet" };
    match level.min(MAX_STYLED_LIST_LEVEL) {
        0 => base.to_string(),
        n => format!("{base}{}", n + 1),
    }
}

fn justification(align: TableCellAlignment) -> Option<&'static str> {
    match align {
        TableCellAlignment::Left => Some("left"),
        TableCellAlignment::Center => Some("center"),
        TableCellAlignment::Right => Some("right"),
        TableCellAlignment::None => None,
    }
}
