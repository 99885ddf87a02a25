//! Package parts around `word/document.xml`.

use std::fmt::Write as FmtWrite;

use super::renderer::{HyperlinkRel, NumberingInstance};
use crate::common::xml::escape_xml;
use crate::error::FormatError;

pub const CONTENT_TYPES_XML: &str = include_str!("resources/content_types.xml");
pub const ROOT_RELS_XML: &str = include_str!("resources/root_rels.xml");
pub const DEFAULT_STYLES_XML: &str = include_str!("resources/styles.xml");

const BULLET_ABSTRACT: u32 = 0;
const DECIMAL_ABSTRACT: u32 = 1;
const BULLET_GLYPHS: [&str; 3] = ["\u{2022}", "o", "\u{25AA}"];

/// `word/_rels/document.xml.rels`: styles, numbering, then one entry per hyperlink.
pub fn document_rels_xml(hyperlinks: &[HyperlinkRel]) -> Result<String, FormatError> {
    let mut xml = String::with_capacity(512 + hyperlinks.len() * 160);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    xml.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#);
    xml.push_str(r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>"#);
    for link in hyperlinks {
        write!(
            xml,
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="{}" TargetMode="External"/>"#,
            link.id,
            escape_xml(&link.url)
        )?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

/// `word/numbering.xml`: one bullet and one decimal definition, and one instance
/// per rendered list. Ordered instances restart every level at 1.
pub fn numbering_xml(instances: &[NumberingInstance]) -> Result<String, FormatError> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    );

    write!(
        xml,
        r#"<w:abstractNum w:abstractNumId="{BULLET_ABSTRACT}"><w:multiLevelType w:val="hybridMultilevel"/>"#
    )?;
    for level in 0..9 {
        write!(
            xml,
            r#"<w:lvl w:ilvl="{level}"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="{}"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="{}" w:hanging="360"/></w:pPr></w:lvl>"#,
            BULLET_GLYPHS[level % BULLET_GLYPHS.len()],
            720 * (level + 1)
        )?;
    }
    xml.push_str("</w:abstractNum>");

    write!(
        xml,
        r#"<w:abstractNum w:abstractNumId="{DECIMAL_ABSTRACT}"><w:multiLevelType w:val="hybridMultilevel"/>"#
    )?;
    for level in 0..9 {
        write!(
            xml,
            r#"<w:lvl w:ilvl="{level}"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%{}."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="{}" w:hanging="360"/></w:pPr></w:lvl>"#,
            level + 1,
            720 * (level + 1)
        )?;
    }
    xml.push_str("</w:abstractNum>");

    for instance in instances {
        if instance.ordered {
            write!(
                xml,
                r#"<w:num w:numId="{}"><w:abstractNumId w:val="{DECIMAL_ABSTRACT}"/>"#,
                instance.num_id
            )?;
            for level in 0..9 {
                write!(
                    xml,
                    r#"<w:lvlOverride w:ilvl="{level}"><w:startOverride w:val="1"/></w:lvlOverride>"#
                )?;
            }
            xml.push_str("</w:num>");
        } else {
            write!(
                xml,
                r#"<w:num w:numId="{}"><w:abstractNumId w:val="{BULLET_ABSTRACT}"/></w:num>"#,
                instance.num_id
            )?;
        }
    }
    xml.push_str("</w:numbering>");
    Ok(xml)
}
