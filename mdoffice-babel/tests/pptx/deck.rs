use mdoffice_babel::common::package::Package;
use mdoffice_babel::formats::pptx::template::{AspectRatio, LayoutIndices};
use mdoffice_babel::formats::pptx::{render_pptx, slides_from_json, PptxOptions, SlideRecord};
use mdoffice_babel::FormatError;

use crate::common::{assert_parts_well_formed, count, part};

const DECK_JSON: &str = r#"[
    {"slide_type": "title", "slide_title": "Roadmap", "author": "Platform team"},
    {"slide_type": "section", "slide_title": "Next quarter"},
    {"slide_type": "content", "slide_title": "Goals", "slide_text": [
        {"text": "Ship the importer", "indentation_level": 1},
        {"text": "CSV first", "indentation_level": 2},
        {"text": "Fewer pages", "indentation_level": "1"}
    ]}
]"#;

fn deck_records() -> Vec<SlideRecord> {
    let (records, issues) = slides_from_json(DECK_JSON).expect("slides parse");
    assert!(issues.is_empty());
    records
}

fn options(aspect: AspectRatio) -> PptxOptions {
    PptxOptions {
        aspect,
        ..PptxOptions::default()
    }
}

#[test]
fn test_builtin_deck_is_well_formed() {
    let bytes = render_pptx(&deck_records(), &options(AspectRatio::FourThree)).expect("pptx renders");

    assert_parts_well_formed(&bytes);
    let presentation = part(&bytes, "ppt/presentation.xml");
    assert!(presentation.contains(r#"<p:sldSz cx="9144000" cy="6858000"/>"#));
    assert_eq!(count(&presentation, "<p:sldId "), 3);

    let types = part(&bytes, "[Content_Types].xml");
    assert_eq!(count(&types, "/ppt/slides/slide"), 3);
}

#[test]
fn test_slides_link_to_their_layouts() {
    let bytes = render_pptx(&deck_records(), &PptxOptions::default()).expect("pptx renders");
    let layouts = LayoutIndices::default();

    let expected = [layouts.title, layouts.section, layouts.content];
    for (n, layout) in expected.iter().enumerate() {
        let rels = part(&bytes, &format!("ppt/slides/_rels/slide{}.xml.rels", n + 1));
        assert!(
            rels.contains(&format!("../slideLayouts/slideLayout{}.xml", layout + 1)),
            "slide {} rels: {rels}",
            n + 1
        );
    }
}

#[test]
fn test_content_bullets_keep_their_levels() {
    let bytes = render_pptx(&deck_records(), &PptxOptions::default()).expect("pptx renders");
    let slide = part(&bytes, "ppt/slides/slide3.xml");

    assert!(slide.contains("<a:t>Goals</a:t>"));
    assert_eq!(count(&slide, r#"<a:pPr lvl="0" algn="l"/>"#), 2);
    assert_eq!(count(&slide, r#"<a:pPr lvl="1" algn="l"/>"#), 1);
    let first = slide.find("Ship the importer").expect("first bullet");
    let second = slide.find("CSV first").expect("second bullet");
    assert!(first < second);
}

#[test]
fn test_rendered_deck_works_as_a_template() {
    let first = render_pptx(&deck_records(), &options(AspectRatio::SixteenNine)).expect("pptx renders");

    let records = vec![SlideRecord::Section {
        title: "Only one".to_string(),
    }];
    let reused = PptxOptions {
        aspect: AspectRatio::FourThree,
        template: Some(first),
        ..PptxOptions::default()
    };
    let bytes = render_pptx(&records, &reused).expect("pptx renders");

    assert_parts_well_formed(&bytes);
    let package = Package::from_zip(&bytes).expect("readable package");
    let slides: Vec<&str> = package
        .names()
        .filter(|n| n.starts_with("ppt/slides/slide"))
        .collect();
    assert_eq!(slides, vec!["ppt/slides/slide1.xml"]);

    // The template decides the slide size.
    let presentation = part(&bytes, "ppt/presentation.xml");
    assert!(presentation.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));
    assert_eq!(count(&presentation, "<p:sldId "), 1);
    assert_eq!(count(&part(&bytes, "[Content_Types].xml"), "/ppt/slides/slide"), 1);
    assert!(part(&bytes, "ppt/slides/slide1.xml").contains("<a:t>Only one</a:t>"));
}

#[test]
fn test_broken_template_falls_back_to_builtin() {
    let options = PptxOptions {
        aspect: AspectRatio::SixteenNine,
        template: Some(b"definitely not a zip".to_vec()),
        ..PptxOptions::default()
    };
    let bytes = render_pptx(&deck_records(), &options).expect("pptx renders");
    assert!(part(&bytes, "ppt/presentation.xml").contains(r#"cx="12192000""#));
}

#[test]
fn test_missing_layout_names_the_slide() {
    let options = PptxOptions {
        layouts: LayoutIndices {
            title: 0,
            section: 2,
            content: 42,
        },
        ..PptxOptions::default()
    };
    let err = render_pptx(&deck_records(), &options).unwrap_err();
    match err {
        FormatError::SerializationError(message) => {
            assert!(message.starts_with("Error creating slide 2:"), "{message}")
        }
        other => panic!("unexpected error {other:?}"),
    }
}
