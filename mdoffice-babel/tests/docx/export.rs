use mdoffice_babel::common::package::Package;
use mdoffice_babel::formats::docx::render_docx;
use mdoffice_babel::formats::html::parse_html_str;
use mdoffice_babel::formats::markdown::parse_markdown;

use crate::common::{assert_parts_well_formed, count, part};

fn render(md: &str) -> Vec<u8> {
    render_docx(&parse_markdown(md), None).expect("docx renders")
}

#[test]
fn test_package_parts_are_present_and_well_formed() {
    let bytes = render("# Report\n\nBody with [a link](https://example.com).\n\n| a | b |\n|---|---|\n| 1 | 2 |");

    for name in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/document.xml",
        "word/_rels/document.xml.rels",
        "word/styles.xml",
        "word/numbering.xml",
        "docProps/core.xml",
        "docProps/app.xml",
    ] {
        part(&bytes, name);
    }
    assert_parts_well_formed(&bytes);
    assert!(part(&bytes, "docProps/core.xml").contains("<dc:title>Report</dc:title>"));
}

#[test]
fn test_heading_and_quote_styles() {
    let body = part(&render("## Second\n\n> wise words"), "word/document.xml");
    assert!(body.contains(r#"<w:pStyle w:val="Heading2"/>"#));
    assert!(body.contains(r#"<w:pStyle w:val="Quote"/>"#));
}

#[test]
fn test_each_ordered_list_restarts_numbering() {
    let bytes = render("1. first\n2. second\n\nbetween\n\n1. again");
    let body = part(&bytes, "word/document.xml");

    assert_eq!(count(&body, r#"<w:numId w:val="2"/>"#), 2);
    assert_eq!(count(&body, r#"<w:numId w:val="3"/>"#), 1);
    assert_eq!(count(&body, r#"<w:pStyle w:val="ListNumber"/>"#), 3);

    let numbering = part(&bytes, "word/numbering.xml");
    assert!(numbering.contains(r#"w:numId="2""#));
    assert!(numbering.contains(r#"w:numId="3""#));
}

#[test]
fn test_uneven_nested_indent_keeps_one_numbering_instance() {
    let body = part(&render("1. a\n    1. b\n   1. c"), "word/document.xml");

    assert_eq!(count(&body, r#"<w:numId w:val="2"/>"#), 1);
    assert_eq!(count(&body, r#"<w:numId w:val="3"/>"#), 2);
    assert_eq!(count(&body, r#"<w:numId w:val="4"/>"#), 0);
    assert_eq!(count(&body, r#"<w:pStyle w:val="ListNumber2"/>"#), 2);
}

#[test]
fn test_nested_bullets_use_level_styles() {
    let body = part(&render("- top\n   - inner"), "word/document.xml");
    assert!(body.contains(r#"<w:pStyle w:val="ListBullet"/>"#));
    assert!(body.contains(r#"<w:pStyle w:val="ListBullet2"/>"#));
    assert!(body.contains(r#"<w:ilvl w:val="1"/>"#));
}

#[test]
fn test_links_become_external_relationships() {
    let bytes = render("See [docs](https://example.com/a?b=1&c=2) and [more](https://example.com)");
    let rels = part(&bytes, "word/_rels/document.xml.rels");

    assert!(rels.contains(r#"Target="https://example.com/a?b=1&amp;c=2""#));
    assert!(rels.contains(r#"Id="rId4""#));
    assert_eq!(count(&rels, r#"TargetMode="External""#), 2);

    let body = part(&bytes, "word/document.xml");
    assert!(body.contains(r#"<w:hyperlink r:id="rId3">"#));
}

#[test]
fn test_ragged_tables_are_padded() {
    let doc = parse_html_str("<table><tr><th>A</th><th>B</th></tr><tr><td>1</td></tr></table>")
        .expect("html parses");
    let bytes = render_docx(&doc, None).expect("docx renders");
    let body = part(&bytes, "word/document.xml");

    assert!(body.contains(r#"<w:tblStyle w:val="TableGrid"/>"#));
    assert_eq!(count(&body, "<w:gridCol/>"), 2);
    assert_eq!(count(&body, "<w:tc>"), 4);
    assert_eq!(count(&body, "<w:tblHeader/>"), 1);
}

#[test]
fn test_text_is_escaped() {
    let body = part(&render("a < b & c"), "word/document.xml");
    assert!(body.contains("a &lt; b &amp; c"));
}

#[test]
fn test_template_styles_replace_builtin_styles() {
    let mut template = Package::new();
    template.add(
        "word/styles.xml",
        r#"<?xml version="1.0" encoding="UTF-8"?><w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:styleId="HouseStyle"/></w:styles>"#,
    );
    let template = template.finish().expect("template zips");

    let bytes = render_docx(&parse_markdown("# Hi"), Some(template.as_slice())).expect("docx renders");
    assert!(part(&bytes, "word/styles.xml").contains("HouseStyle"));
}

#[test]
fn test_unreadable_template_falls_back() {
    let bytes = render_docx(&parse_markdown("# Hi"), Some(b"not a zip".as_slice())).expect("docx renders");
    assert!(part(&bytes, "word/styles.xml").contains("Heading1"));
}
