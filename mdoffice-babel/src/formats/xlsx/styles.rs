//! `xl/styles.xml` generation.
//!
//! Fonts, fills, borders and number formats come from fixed tables; each distinct
//! [`CellStyle`] used by the sheet becomes one `xf` record.

use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

use super::cell::{CellStyle, Fill, FontStyle, HorizontalAlignment, NumberFormat};
use crate::error::FormatError;

const HEADER_FILL: &str = "366092";
const FORMULA_FILL: &str = "E7F3FF";

/// `(size, bold, italic, color, font name)`, indexed by [`font_id`].
const FONTS: [(u32, bool, bool, Option<&str>, &str); 8] = [
    (11, false, false, None, "Calibri"),
    (11, true, false, None, "Calibri"),
    (11, false, true, None, "Calibri"),
    (11, false, false, None, "Courier New"),
    (11, true, false, Some("FFFFFF"), "Calibri"),
    (16, true, false, Some("2F5597"), "Calibri"),
    (14, true, false, Some("4472C4"), "Calibri"),
    (12, true, false, None, "Calibri"),
];

fn font_id(font: FontStyle) -> usize {
    match font {
        FontStyle::Regular => 0,
        FontStyle::Bold => 1,
        FontStyle::Italic => 2,
        FontStyle::Monospace => 3,
        FontStyle::Header => 4,
        FontStyle::Heading(1) => 5,
        FontStyle::Heading(2) => 6,
        FontStyle::Heading(_) => 7,
    }
}

/// Fill 0 and 1 are the two Excel requires (`none`, `gray125`).
fn fill_id(fill: Fill) -> usize {
    match fill {
        Fill::None => 0,
        Fill::Header => 2,
        Fill::Formula => 3,
    }
}

/// Built-in number format ids.
fn num_fmt_id(format: NumberFormat) -> u32 {
    match format {
        NumberFormat::General => 0,
        NumberFormat::Thousands => 3,
        NumberFormat::Percent => 10,
    }
}

/// Interns cell styles into `xf` indices. Index 0 is the default style.
#[derive(Debug)]
pub struct StylesBuilder {
    formats: Vec<CellStyle>,
    lookup: HashMap<CellStyle, u32>,
}

impl Default for StylesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StylesBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            formats: Vec::new(),
            lookup: HashMap::new(),
        };
        builder.intern(CellStyle::default());
        builder
    }

    pub fn intern(&mut self, style: CellStyle) -> u32 {
        if let Some(id) = self.lookup.get(&style) {
            return *id;
        }
        let id = self.formats.len() as u32;
        self.formats.push(style);
        self.lookup.insert(style, id);
        id
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    pub fn to_xml(&self) -> Result<String, FormatError> {
        let mut xml = String::with_capacity(2048);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        write!(xml, r#"<fonts count="{}">"#, FONTS.len())?;
        for (size, bold, italic, color, name) in FONTS {
            xml.push_str("<font>");
            if bold {
                xml.push_str("<b/>");
            }
            if italic {
                xml.push_str("<i/>");
            }
            write!(xml, r#"<sz val="{size}"/>"#)?;
            match color {
                Some(rgb) => write!(xml, r#"<color rgb="FF{rgb}"/>"#)?,
                None => xml.push_str(r#"<color theme="1"/>"#),
            }
            write!(xml, r#"<name val="{name}"/><family val="2"/></font>"#)?;
        }
        xml.push_str("</fonts>");

        xml.push_str(r#"<fills count="4">"#);
        xml.push_str(r#"<fill><patternFill patternType="none"/></fill>"#);
        xml.push_str(r#"<fill><patternFill patternType="gray125"/></fill>"#);
        for rgb in [HEADER_FILL, FORMULA_FILL] {
            write!(
                xml,
                r#"<fill><patternFill patternType="solid"><fgColor rgb="FF{rgb}"/><bgColor rgb="FF{rgb}"/></patternFill></fill>"#
            )?;
        }
        xml.push_str("</fills>");

        xml.push_str(r#"<borders count="2">"#);
        xml.push_str("<border><left/><right/><top/><bottom/><diagonal/></border>");
        xml.push_str(r#"<border><left style="thin"><color auto="1"/></left><right style="thin"><color auto="1"/></right><top style="thin"><color auto="1"/></top><bottom style="thin"><color auto="1"/></bottom><diagonal/></border>"#);
        xml.push_str("</borders>");

        xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);

        write!(xml, r#"<cellXfs count="{}">"#, self.formats.len())?;
        for style in &self.formats {
            write!(
                xml,
                r#"<xf numFmtId="{}" fontId="{}" fillId="{}" borderId="{}" xfId="0""#,
                num_fmt_id(style.number_format),
                font_id(style.font),
                fill_id(style.fill),
                u8::from(style.bordered)
            )?;
            if style.number_format != NumberFormat::General {
                xml.push_str(r#" applyNumberFormat="1""#);
            }
            if style.font != FontStyle::Regular {
                xml.push_str(r#" applyFont="1""#);
            }
            if style.fill != Fill::None {
                xml.push_str(r#" applyFill="1""#);
            }
            if style.bordered {
                xml.push_str(r#" applyBorder="1""#);
            }
            match style.align {
                Some(align) => {
                    let horizontal = match align {
                        HorizontalAlignment::Left => "left",
                        HorizontalAlignment::Center => "center",
                        HorizontalAlignment::Right => "right",
                    };
                    write!(
                        xml,
                        r#" applyAlignment="1"><alignment horizontal="{horizontal}"/></xf>"#
                    )?;
                }
                None => xml.push_str("/>"),
            }
        }
        xml.push_str("</cellXfs>");

        xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);
        xml.push_str("</styleSheet>");
        Ok(xml)
    }
}
