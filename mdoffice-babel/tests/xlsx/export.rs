use mdoffice_babel::formats::markdown::parse_markdown;
use mdoffice_babel::formats::xlsx::{render_xlsx, sheet_name, DEFAULT_SHEET_TITLE};

use crate::common::{assert_parts_well_formed, part};

const BUDGET: &str = "# Costs

| Item | Amount |
|---|---|
| A | 1500 |
| **B** | 42% |

## Summary

| Label | Value |
|---|---|
| Total | =T1.SUM(B[0]:B[1]) |
| Check | B4+B5 |
| Ghost | =T9.B[0] |
";

fn render(md: &str, title: &str) -> Vec<u8> {
    render_xlsx(&parse_markdown(md), title).expect("xlsx renders")
}

#[test]
fn test_workbook_parts_are_well_formed() {
    let bytes = render(BUDGET, "Budget");
    assert_parts_well_formed(&bytes);
    assert!(part(&bytes, "xl/workbook.xml").contains(r#"<sheet name="Budget" sheetId="1" r:id="rId1"/>"#));
}

#[test]
fn test_headings_and_tables_land_on_expected_rows() {
    let sheet = part(&render(BUDGET, "Budget"), "xl/worksheets/sheet1.xml");

    assert!(sheet.contains(r#"<c r="A1""#));
    assert!(sheet.contains("<t>Costs</t>"));
    assert!(sheet.contains("<t>Summary</t>"));
    assert!(sheet.contains(r#"<c r="A8""#));
    assert!(sheet.contains(r#"<c r="A10""#));
    assert!(!sheet.contains(r#"<row r="2">"#));
}

#[test]
fn test_values_are_coerced() {
    let sheet = part(&render(BUDGET, "Budget"), "xl/worksheets/sheet1.xml");

    assert!(sheet.contains("<v>1500</v>"));
    assert!(sheet.contains("<v>0.42</v>"));
    // Emphasis markers are stripped from the stored text.
    assert!(sheet.contains("<t>B</t>"));
    assert!(!sheet.contains("**B**"));
}

#[test]
fn test_symbolic_references_are_translated() {
    let sheet = part(&render(BUDGET, "Budget"), "xl/worksheets/sheet1.xml");

    assert!(sheet.contains("<f>SUM(B4:B5)</f>"));
    assert!(sheet.contains("<f>B4+B5</f>"));
    // Unknown tables resolve against the row the formula sits on.
    assert!(sheet.contains("<f>B13</f>"));
}

#[test]
fn test_local_references_use_the_enclosing_table() {
    let md = "| Item | Price | Qty | Total |\n|---|---|---|---|\n| A | 10 | 2 | =B[0]*C[0] |\n| B | 5 | 4 | =B[1]*C[1] |";
    let sheet = part(&render(md, "Sheet"), "xl/worksheets/sheet1.xml");

    assert!(sheet.contains(r#"<c r="D2""#));
    assert!(sheet.contains("<f>B2*C2</f>"));
    assert!(sheet.contains("<f>B3*C3</f>"));
}

#[test]
fn test_number_formats_are_registered() {
    let styles = part(&render(BUDGET, "Budget"), "xl/styles.xml");

    assert!(styles.contains(r#"numFmtId="3""#));
    assert!(styles.contains(r#"numFmtId="10""#));
    assert!(styles.contains("FF366092"));
}

#[test]
fn test_sheet_names_are_sanitized() {
    assert_eq!(sheet_name("Q1: Budget/2024"), "Q1 Budget2024");
    assert_eq!(sheet_name("[]"), DEFAULT_SHEET_TITLE);
    assert_eq!(sheet_name(&"x".repeat(40)).chars().count(), 31);
}

#[test]
fn test_documents_without_tables_still_render() {
    let bytes = render("Just a paragraph.", "Empty");
    let sheet = part(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("<sheetData></sheetData>"));
}
