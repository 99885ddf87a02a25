//! Slide assembly on top of an existing presentation package.
//!
//! A [`Deck`] opens a package (the built-in template or a user `.pptx`), strips any
//! slides it already contains and reads the master's layouts. Slides are then added by
//! layout position and filled placeholder by placeholder.

use std::fmt::Write as FmtWrite;

use once_cell::sync::Lazy;
use regex::Regex;
use roxmltree::Node;
use tracing::debug;

use super::template::{NS_A, NS_P, NS_R, REL_BASE, SP_TREE_HEADER};
use crate::common::package::Package;
use crate::common::xml::escape_xml;
use crate::error::FormatError;

const SLIDE_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const FIRST_SLIDE_ID: u32 = 256;
/// Date, footer and slide number placeholders are not carried onto new slides.
const SKIPPED_PLACEHOLDERS: [&str; 3] = ["dt", "ftr", "sldNum"];

static SLIDE_ID_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<p:sldIdLst\s*/>|<p:sldIdLst>.*?</p:sldIdLst>").unwrap());

/// One `<Relationship>` entry of a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    fn is(&self, kind: &str) -> bool {
        self.rel_type.rsplit('/').next() == Some(kind)
    }
}

/// A placeholder on a layout, as `<p:ph>` declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// `type` attribute; absent means a generic content placeholder (`obj`).
    pub kind: Option<String>,
    pub idx: u32,
}

impl Placeholder {
    fn display_name(&self) -> &'static str {
        match self.kind.as_deref() {
            Some("title") | Some("ctrTitle") => "Title",
            Some("subTitle") => "Subtitle",
            Some("body") => "Text Placeholder",
            _ => "Content Placeholder",
        }
    }
}

/// A slide layout of the template's first master.
#[derive(Debug, Clone)]
pub struct Layout {
    pub name: String,
    pub part: String,
    /// Placeholders ordered by `idx`.
    pub placeholders: Vec<Placeholder>,
}

/// A paragraph written into a placeholder. Body paragraphs carry an outline level
/// and are left aligned; title paragraphs carry none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideParagraph {
    pub text: String,
    pub level: Option<u32>,
}

impl SlideParagraph {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: None,
        }
    }

    pub fn leveled(text: impl Into<String>, level: u32) -> Self {
        Self {
            text: text.into(),
            level: Some(level),
        }
    }
}

#[derive(Debug)]
struct SlideEntry {
    id: u32,
    rel_id: String,
    part: String,
}

#[derive(Debug)]
pub struct Deck {
    package: Package,
    presentation_part: String,
    presentation_rels: Vec<Relationship>,
    layouts: Vec<Layout>,
    slides: Vec<SlideEntry>,
    next_rel: u32,
}

impl Deck {
    /// Open a package, dropping the slides it already has.
    pub fn open(mut package: Package) -> Result<Self, FormatError> {
        let root_rels = parse_rels(required_str(&package, "_rels/.rels")?)?;
        let presentation_part = root_rels
            .iter()
            .find(|r| r.is("officeDocument"))
            .map(|r| resolve_target("", &r.target))
            .unwrap_or_else(|| "ppt/presentation.xml".to_string());

        let presentation_rels =
            parse_rels(required_str(&package, &rels_path(&presentation_part))?)?;
        let removed = remove_starter_slides(&mut package, &presentation_part, &presentation_rels)?;
        if removed > 0 {
            debug!(count = removed, "removed starter slides from template");
        }
        let presentation_rels: Vec<Relationship> = presentation_rels
            .into_iter()
            .filter(|r| !r.is("slide"))
            .collect();

        let layouts = read_layouts(&package, &presentation_part, &presentation_rels)?;
        debug!(layouts = layouts.len(), "read template layouts");

        let next_rel = presentation_rels
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        Ok(Self {
            package,
            presentation_part,
            presentation_rels,
            layouts,
            slides: Vec::new(),
            next_rel,
        })
    }

    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Add a slide using the layout at `layout`, filling placeholders in order.
    ///
    /// `contents[i]` goes into the layout's i-th placeholder. Placeholders without
    /// content stay empty; content for placeholders the layout lacks is dropped.
    pub fn add_slide(
        &mut self,
        layout: usize,
        contents: &[Vec<SlideParagraph>],
    ) -> Result<usize, FormatError> {
        let layout = self.layouts.get(layout).ok_or_else(|| {
            FormatError::InvalidInput(format!(
                "layout {layout} does not exist (template has {})",
                self.layouts.len()
            ))
        })?;

        let mut number = self.slides.len() + 1;
        while self.package.contains(&format!("ppt/slides/slide{number}.xml")) {
            number += 1;
        }
        let part = format!("ppt/slides/slide{number}.xml");

        let xml = slide_xml(&layout.placeholders, contents)?;
        let layout_target = relative_target(&part, &layout.part);
        let rels = rels_xml(&[Relationship {
            id: "rId1".to_string(),
            rel_type: format!("{REL_BASE}/slideLayout"),
            target: layout_target,
            external: false,
        }])?;

        self.package.add(part.clone(), xml);
        self.package.add(rels_path(&part), rels);

        let rel_id = format!("rId{}", self.next_rel);
        self.next_rel += 1;
        self.presentation_rels.push(Relationship {
            id: rel_id.clone(),
            rel_type: format!("{REL_BASE}/slide"),
            target: relative_target(&self.presentation_part, &part),
            external: false,
        });
        self.slides.push(SlideEntry {
            id: FIRST_SLIDE_ID + self.slides.len() as u32,
            rel_id,
            part,
        });
        Ok(self.slides.len())
    }

    /// Write the slide list, relationships and content types, then zip the package.
    pub fn finish(mut self) -> Result<Vec<u8>, FormatError> {
        let presentation = required_str(&self.package, &self.presentation_part)?.to_string();
        let presentation = insert_slide_list(&presentation, &self.slides)?;
        self.package.add(self.presentation_part.clone(), presentation);

        let rels = rels_xml(&self.presentation_rels)?;
        self.package.add(rels_path(&self.presentation_part), rels);

        let mut types = required_str(&self.package, "[Content_Types].xml")?.to_string();
        let mut overrides = String::new();
        for slide in &self.slides {
            write!(
                overrides,
                r#"<Override PartName="/{}" ContentType="{SLIDE_CONTENT_TYPE}"/>"#,
                slide.part
            )?;
        }
        let end = types.rfind("</Types>").ok_or_else(|| {
            FormatError::ParseError("[Content_Types].xml has no closing tag".to_string())
        })?;
        types.insert_str(end, &overrides);
        self.package.add("[Content_Types].xml", types);

        self.package.finish()
    }
}

fn required_str<'a>(package: &'a Package, name: &str) -> Result<&'a str, FormatError> {
    package
        .get_str(name)?
        .ok_or_else(|| FormatError::ParseError(format!("template is missing {name}")))
}

/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`
pub fn rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolve a relationship target against the part that owns the relationship.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Inverse of [`resolve_target`]: the path from `source_part`'s folder to `target_part`.
fn relative_target(source_part: &str, target_part: &str) -> String {
    let source_dir: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let target: Vec<&str> = target_part.split('/').collect();
    let common = source_dir
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();
    let mut parts: Vec<&str> = vec![".."; source_dir.len() - common];
    parts.extend(&target[common..]);
    parts.join("/")
}

pub fn parse_rels(xml: &str) -> Result<Vec<Relationship>, FormatError> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| FormatError::ParseError(format!("relationships: {e}")))?;
    Ok(doc
        .descendants()
        .filter(|n| n.tag_name().name() == "Relationship")
        .filter_map(|n| {
            Some(Relationship {
                id: n.attribute("Id")?.to_string(),
                rel_type: n.attribute("Type")?.to_string(),
                target: n.attribute("Target")?.to_string(),
                external: n.attribute("TargetMode") == Some("External"),
            })
        })
        .collect())
}

fn rels_xml(rels: &[Relationship]) -> Result<String, FormatError> {
    let mut xml = String::with_capacity(256 + rels.len() * 160);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for rel in rels {
        write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}""#,
            escape_xml(&rel.id),
            escape_xml(&rel.rel_type),
            escape_xml(&rel.target)
        )?;
        if rel.external {
            xml.push_str(r#" TargetMode="External""#);
        }
        xml.push_str("/>");
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

/// Delete every slide the package has, with its notes, and unlist them.
fn remove_starter_slides(
    package: &mut Package,
    presentation_part: &str,
    presentation_rels: &[Relationship],
) -> Result<usize, FormatError> {
    let mut removed_parts = Vec::new();
    for rel in presentation_rels.iter().filter(|r| r.is("slide")) {
        let slide = resolve_target(presentation_part, &rel.target);
        let slide_rels_part = rels_path(&slide);
        if let Some(slide_rels) = package.get_str(&slide_rels_part)? {
            let notes: Vec<String> = parse_rels(slide_rels)?
                .iter()
                .filter(|r| r.is("notesSlide"))
                .map(|r| resolve_target(&slide, &r.target))
                .collect();
            for note in notes {
                package.remove(&rels_path(&note));
                if package.remove(&note).is_some() {
                    removed_parts.push(note);
                }
            }
        }
        package.remove(&slide_rels_part);
        if package.remove(&slide).is_some() {
            removed_parts.push(slide);
        }
    }

    let slide_count = presentation_rels.iter().filter(|r| r.is("slide")).count();
    if slide_count == 0 {
        return Ok(0);
    }

    let presentation = required_str(package, presentation_part)?;
    let presentation = SLIDE_ID_LIST.replace(presentation, "").into_owned();
    package.add(presentation_part.to_string(), presentation);

    let mut types = required_str(package, "[Content_Types].xml")?.to_string();
    for part in &removed_parts {
        let pattern = format!(
            r#"<Override[^>]*PartName="/{}"[^>]*/>"#,
            regex::escape(part)
        );
        let re = Regex::new(&pattern)
            .map_err(|e| FormatError::ParseError(format!("content type pattern: {e}")))?;
        types = re.replace_all(&types, "").into_owned();
    }
    package.add("[Content_Types].xml", types);

    Ok(slide_count)
}

/// Layouts of the first slide master, in the master's `sldLayoutIdLst` order.
fn read_layouts(
    package: &Package,
    presentation_part: &str,
    presentation_rels: &[Relationship],
) -> Result<Vec<Layout>, FormatError> {
    let master_rel = presentation_rels
        .iter()
        .find(|r| r.is("slideMaster"))
        .ok_or_else(|| FormatError::ParseError("template has no slide master".to_string()))?;
    let master_part = resolve_target(presentation_part, &master_rel.target);
    let master_rels = parse_rels(required_str(package, &rels_path(&master_part))?)?;

    let master_xml = required_str(package, &master_part)?;
    let master = roxmltree::Document::parse(master_xml)
        .map_err(|e| FormatError::ParseError(format!("{master_part}: {e}")))?;

    let layout_ids: Vec<&str> = master
        .descendants()
        .filter(|n| n.has_tag_name((NS_P, "sldLayoutId")))
        .filter_map(|n| n.attribute((NS_R, "id")))
        .collect();

    let mut layouts = Vec::with_capacity(layout_ids.len());
    for id in layout_ids {
        let Some(rel) = master_rels.iter().find(|r| r.id == id) else {
            debug!(id, "layout relationship missing from master, skipping");
            continue;
        };
        let part = resolve_target(&master_part, &rel.target);
        let xml = required_str(package, &part)?;
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| FormatError::ParseError(format!("{part}: {e}")))?;
        let name = doc
            .descendants()
            .find(|n| n.has_tag_name((NS_P, "cSld")))
            .and_then(|n| n.attribute("name"))
            .unwrap_or_default()
            .to_string();
        layouts.push(Layout {
            name,
            placeholders: layout_placeholders(doc.root()),
            part,
        });
    }
    Ok(layouts)
}

fn layout_placeholders(root: Node) -> Vec<Placeholder> {
    let mut placeholders: Vec<Placeholder> = root
        .descendants()
        .filter(|n| n.has_tag_name((NS_P, "sp")))
        .filter_map(|sp| sp.descendants().find(|n| n.has_tag_name((NS_P, "ph"))))
        .map(|ph| Placeholder {
            kind: ph.attribute("type").map(str::to_string),
            idx: ph.attribute("idx").and_then(|v| v.parse().ok()).unwrap_or(0),
        })
        .filter(|ph| {
            !ph.kind
                .as_deref()
                .is_some_and(|k| SKIPPED_PLACEHOLDERS.contains(&k))
        })
        .collect();
    placeholders.sort_by_key(|ph| ph.idx);
    placeholders
}

fn slide_xml(
    placeholders: &[Placeholder],
    contents: &[Vec<SlideParagraph>],
) -> Result<String, FormatError> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:spTree>{SP_TREE_HEADER}"#
    )?;
    for (i, ph) in placeholders.iter().enumerate() {
        write!(
            xml,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{} {}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph"#,
            i + 2,
            ph.display_name(),
            i + 1
        )?;
        if let Some(kind) = &ph.kind {
            write!(xml, r#" type="{}""#, escape_xml(kind))?;
        }
        if ph.idx > 0 {
            write!(xml, r#" idx="{}""#, ph.idx)?;
        }
        xml.push_str(r#"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>"#);
        match contents.get(i).filter(|paragraphs| !paragraphs.is_empty()) {
            Some(paragraphs) => {
                for paragraph in paragraphs {
                    write_paragraph(&mut xml, paragraph)?;
                }
            }
            None => xml.push_str(r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#),
        }
        xml.push_str("</p:txBody></p:sp>");
    }
    xml.push_str(r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#);
    Ok(xml)
}

fn write_paragraph(xml: &mut String, paragraph: &SlideParagraph) -> Result<(), FormatError> {
    xml.push_str("<a:p>");
    if let Some(level) = paragraph.level {
        write!(xml, r#"<a:pPr lvl="{level}" algn="l"/>"#)?;
    }
    if paragraph.text.is_empty() {
        xml.push_str(r#"<a:endParaRPr lang="en-US"/>"#);
    } else {
        write!(
            xml,
            r#"<a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r>"#,
            escape_xml(&paragraph.text)
        )?;
    }
    xml.push_str("</a:p>");
    Ok(())
}

fn insert_slide_list(presentation: &str, slides: &[SlideEntry]) -> Result<String, FormatError> {
    let presentation = SLIDE_ID_LIST.replace(presentation, "").into_owned();
    if slides.is_empty() {
        return Ok(presentation);
    }
    let mut list = String::from("<p:sldIdLst>");
    for slide in slides {
        write!(list, r#"<p:sldId id="{}" r:id="{}"/>"#, slide.id, slide.rel_id)?;
    }
    list.push_str("</p:sldIdLst>");

    let at = presentation
        .find("<p:sldSz")
        .or_else(|| presentation.find("<p:notesSz"))
        .ok_or_else(|| {
            FormatError::ParseError("presentation.xml has no slide size element".to_string())
        })?;
    let mut out = presentation;
    out.insert_str(at, &list);
    Ok(out)
}
