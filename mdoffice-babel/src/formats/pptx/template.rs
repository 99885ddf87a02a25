//! Built-in presentation template and slide geometry.
//!
//! The built-in deck has one master and five layouts, in this order:
//!
//! | Index | Layout            | Placeholders (by position)     |
//! |-------|-------------------|--------------------------------|
//! | 0     | Title Slide       | centred title, subtitle        |
//! | 1     | Title and Content | title, content                 |
//! | 2     | Section Header    | title, text                    |
//! | 3     | Title Only        | title                          |
//! | 4     | Blank             |                                |

use std::fmt::Write as FmtWrite;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::common::package::{app_properties_xml, core_properties_xml, Package};
use crate::error::FormatError;

pub const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const SLIDE_HEIGHT: i64 = 6_858_000;

/// Slide aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "4:3")]
    FourThree,
    #[serde(rename = "16:9")]
    SixteenNine,
}

impl AspectRatio {
    /// Slide size in EMU.
    pub fn slide_size(self) -> (i64, i64) {
        match self {
            AspectRatio::FourThree => (9_144_000, SLIDE_HEIGHT),
            AspectRatio::SixteenNine => (12_192_000, SLIDE_HEIGHT),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::FourThree => "4:3",
            AspectRatio::SixteenNine => "16:9",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "4:3" => Ok(AspectRatio::FourThree),
            "16:9" => Ok(AspectRatio::SixteenNine),
            other => Err(FormatError::InvalidInput(format!(
                "unknown aspect ratio '{other}' (expected 4:3 or 16:9)"
            ))),
        }
    }
}

/// Which template layout each slide kind uses, by position in the master's layout list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutIndices {
    pub title: usize,
    pub section: usize,
    pub content: usize,
}

impl Default for LayoutIndices {
    fn default() -> Self {
        Self {
            title: 0,
            section: 2,
            content: 1,
        }
    }
}

struct LayoutSpec {
    name: &'static str,
    kind: &'static str,
    /// `(placeholder type, idx)`; `None` type means a generic content placeholder.
    placeholders: &'static [(Option<&'static str>, u32)],
}

const LAYOUTS: [LayoutSpec; 5] = [
    LayoutSpec {
        name: "Title Slide",
        kind: "title",
        placeholders: &[(Some("ctrTitle"), 0), (Some("subTitle"), 1)],
    },
    LayoutSpec {
        name: "Title and Content",
        kind: "obj",
        placeholders: &[(Some("title"), 0), (None, 1)],
    },
    LayoutSpec {
        name: "Section Header",
        kind: "secHead",
        placeholders: &[(Some("title"), 0), (Some("body"), 1)],
    },
    LayoutSpec {
        name: "Title Only",
        kind: "titleOnly",
        placeholders: &[(Some("title"), 0)],
    },
    LayoutSpec {
        name: "Blank",
        kind: "blank",
        placeholders: &[],
    },
];

/// The built-in template as a package with no slides.
pub fn builtin_package(aspect: AspectRatio) -> Result<Package, FormatError> {
    let (width, height) = aspect.slide_size();
    let mut package = Package::new();

    package.add("[Content_Types].xml", content_types_xml()?);
    package.add("_rels/.rels", ROOT_RELS_XML);
    package.add("ppt/presentation.xml", presentation_xml(width, height));
    package.add("ppt/_rels/presentation.xml.rels", PRESENTATION_RELS_XML);
    package.add("ppt/presProps.xml", PRES_PROPS_XML);
    package.add("ppt/viewProps.xml", VIEW_PROPS_XML);
    package.add("ppt/tableStyles.xml", TABLE_STYLES_XML);
    package.add("ppt/theme/theme1.xml", THEME_XML);
    package.add("ppt/slideMasters/slideMaster1.xml", master_xml(width)?);
    package.add(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        master_rels_xml()?,
    );
    for (i, layout) in LAYOUTS.iter().enumerate() {
        let n = i + 1;
        package.add(
            format!("ppt/slideLayouts/slideLayout{n}.xml"),
            layout_xml(layout, width)?,
        );
        package.add(
            format!("ppt/slideLayouts/_rels/slideLayout{n}.xml.rels"),
            LAYOUT_RELS_XML,
        );
    }
    package.add("docProps/core.xml", core_properties_xml("", Utc::now()));
    package.add("docProps/app.xml", app_properties_xml("mdoffice"));
    Ok(package)
}

fn content_types_xml() -> Result<String, FormatError> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#);
    let parts = [
        ("/ppt/presentation.xml", "presentationml.presentation.main+xml"),
        ("/ppt/presProps.xml", "presentationml.presProps+xml"),
        ("/ppt/viewProps.xml", "presentationml.viewProps+xml"),
        ("/ppt/tableStyles.xml", "presentationml.tableStyles+xml"),
        ("/ppt/theme/theme1.xml", "theme+xml"),
        ("/ppt/slideMasters/slideMaster1.xml", "presentationml.slideMaster+xml"),
        ("/docProps/app.xml", "extended-properties+xml"),
    ];
    for (part, kind) in parts {
        write!(
            xml,
            r#"<Override PartName="{part}" ContentType="application/vnd.openxmlformats-officedocument.{kind}"/>"#
        )?;
    }
    for n in 1..=LAYOUTS.len() {
        write!(
            xml,
            r#"<Override PartName="/ppt/slideLayouts/slideLayout{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#
        )?;
    }
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    xml.push_str("</Types>");
    Ok(xml)
}

fn presentation_xml(width: i64, height: i64) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldSz cx="{width}" cy="{height}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
    )
}

/// Geometry of the standard placeholders, scaled to the slide width.
fn placeholder_frame(kind: Option<&str>, width: i64) -> (i64, i64, i64, i64) {
    let margin = width / 20;
    let inner = width - 2 * margin;
    match kind {
        Some("ctrTitle") => (margin + width / 40, 2_130_425, inner - width / 20, 1_470_025),
        Some("subTitle") => (margin * 3, 3_886_200, inner - margin * 4, 1_752_600),
        Some("title") => (margin, 274_638, inner, 1_143_000),
        _ => (margin, 1_600_200, inner, 4_525_963),
    }
}

fn placeholder_sp(
    xml: &mut String,
    id: usize,
    kind: Option<&str>,
    idx: u32,
    width: i64,
    with_frame: bool,
) -> Result<(), FormatError> {
    let name = match kind {
        Some("ctrTitle") | Some("title") => "Title",
        Some("subTitle") => "Subtitle",
        Some("body") => "Text Placeholder",
        _ => "Content Placeholder",
    };
    write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name} {}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph"#,
        id - 1
    )?;
    if let Some(kind) = kind {
        write!(xml, r#" type="{kind}""#)?;
    }
    if idx > 0 {
        write!(xml, r#" idx="{idx}""#)?;
    }
    xml.push_str("/></p:nvPr></p:nvSpPr>");
    if with_frame {
        let (x, y, cx, cy) = placeholder_frame(kind, width);
        write!(
            xml,
            r#"<p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm></p:spPr>"#
        )?;
    } else {
        xml.push_str("<p:spPr/>");
    }
    xml.push_str(r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#);
    Ok(())
}

pub(super) const SP_TREE_HEADER: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

fn master_xml(width: i64) -> Result<String, FormatError> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<p:sldMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{SP_TREE_HEADER}"#
    )?;
    placeholder_sp(&mut xml, 2, Some("title"), 0, width, true)?;
    placeholder_sp(&mut xml, 3, Some("body"), 1, width, true)?;
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#);
    xml.push_str("<p:sldLayoutIdLst>");
    for n in 1..=LAYOUTS.len() {
        write!(
            xml,
            r#"<p:sldLayoutId id="{}" r:id="rId{n}"/>"#,
            2_147_483_648u64 + n as u64
        )?;
    }
    xml.push_str("</p:sldLayoutIdLst>");
    xml.push_str(r#"<p:txStyles><p:titleStyle><a:lvl1pPr algn="l"><a:defRPr sz="4400" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/></a:defRPr></a:lvl1pPr></p:titleStyle><p:bodyStyle>"#);
    for level in 1..=9u32 {
        let margin = 342_900 * level;
        let size = match level {
            1 => 3200,
            2 => 2800,
            3 => 2400,
            _ => 2000,
        };
        write!(
            xml,
            r#"<a:lvl{level}pPr marL="{margin}" indent="-342900" algn="l"><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/><a:defRPr sz="{size}" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl{level}pPr>"#
        )?;
    }
    xml.push_str(r#"</p:bodyStyle><p:otherStyle><a:defPPr><a:defRPr lang="en-US"/></a:defPPr></p:otherStyle></p:txStyles></p:sldMaster>"#);
    Ok(xml)
}

fn master_rels_xml() -> Result<String, FormatError> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    for n in 1..=LAYOUTS.len() {
        write!(
            xml,
            r#"<Relationship Id="rId{n}" Type="{REL_BASE}/slideLayout" Target="../slideLayouts/slideLayout{n}.xml"/>"#
        )?;
    }
    write!(
        xml,
        r#"<Relationship Id="rId{}" Type="{REL_BASE}/theme" Target="../theme/theme1.xml"/></Relationships>"#,
        LAYOUTS.len() + 1
    )?;
    Ok(xml)
}

fn layout_xml(layout: &LayoutSpec, width: i64) -> Result<String, FormatError> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<p:sldLayout xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" type="{}" preserve="1"><p:cSld name="{}"><p:spTree>{SP_TREE_HEADER}"#,
        layout.kind, layout.name
    )?;
    for (i, (kind, idx)) in layout.placeholders.iter().enumerate() {
        let framed = matches!(kind, Some("ctrTitle") | Some("subTitle"));
        placeholder_sp(&mut xml, i + 2, *kind, *idx, width, framed)?;
    }
    xml.push_str(r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#);
    Ok(xml)
}

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

const PRESENTATION_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps" Target="presProps.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps" Target="viewProps.xml"/><Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="theme/theme1.xml"/><Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles" Target="tableStyles.xml"/></Relationships>"#;

const LAYOUT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#;

const PRES_PROPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentationPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#;

const VIEW_PROPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:viewPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:normalViewPr><p:restoredLeft sz="15620"/><p:restoredTop sz="94660"/></p:normalViewPr><p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#;

const TABLE_STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" def="{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}"/>"#;

const THEME_XML: &str = include_str!("resources/theme1.xml");
