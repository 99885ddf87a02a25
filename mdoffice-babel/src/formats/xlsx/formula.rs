//! Formula detection and symbolic reference translation.
//!
//! Authors write position-independent references in table cells:
//!
//! | Form                              | Meaning                                       |
//! |-----------------------------------|-----------------------------------------------|
//! | `B[0]`                            | column B, data row 0 of the current table     |
//! | `B[0]:E[0]`                       | range within the current table                |
//! | `T1.B[2]`                         | column B, data row 2 of table 1               |
//! | `T1.B[0]:T2.B[0]`                 | range across tables                           |
//! | `T1.SUM(B[0]:B[3])`               | function over a range of table 1              |
//!
//! Data row `n` of a table starting at row `R` (its header row) is sheet row `R + 1 + n`.
//! Translated references are plain `B12` addresses, which none of the symbolic patterns
//! match, so the passes below never re-translate each other's output.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::warn;

static SUM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:SUM|sum)\([A-Z]+\d+:[A-Z]+\d+\)$").unwrap());
static AVERAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:AVG|avg|AVERAGE|average)\(([A-Z]+\d+:[A-Z]+\d+)\)$").unwrap()
});
static ARITHMETIC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]+\d+[+\-*/][A-Z]+\d+$").unwrap());
static PERCENTAGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]+\d+/[A-Z]+\d+\*100$").unwrap());

static TABLE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"T(\d+)\.([A-Z]+)\[([+-]?\d+)\]").unwrap());
static TABLE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"T(\d+)\.([A-Z]+)\[([+-]?\d+)\]:T(\d+)\.([A-Z]+)\[([+-]?\d+)\]").unwrap()
});
static TABLE_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"T(\d+)\.(SUM|AVERAGE|MAX|MIN)\(([A-Z]+)\[([+-]?\d+)\]:([A-Z]+)\[([+-]?\d+)\]\)")
        .unwrap()
});
static LOCAL_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z]+)\[([+-]?\d+)\]").unwrap());
static LOCAL_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)\[([+-]?\d+)\]:([A-Z]+)\[([+-]?\d+)\]").unwrap());

/// Start rows of the tables written so far, in the order they were written.
///
/// The row recorded for a table is the row of its header.
#[derive(Debug, Clone, Default)]
pub struct TablePositions {
    entries: Vec<(String, i64)>,
}

impl TablePositions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the next table; returns its identifier (`T1`, `T2`, ...).
    pub fn register(&mut self, start_row: i64) -> String {
        let id = format!("T{}", self.entries.len() + 1);
        self.entries.push((id.clone(), start_row));
        id
    }

    pub fn get(&self, id: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, row)| *row)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Start row of the latest registered table not below `row`.
    pub fn enclosing(&self, row: i64) -> Option<i64> {
        self.entries
            .iter()
            .filter(|(_, start)| *start <= row)
            .map(|(_, start)| *start)
            .last()
    }
}

/// A table-qualified reference whose table was not registered.
///
/// It resolves against the current row instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub table: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub formula: String,
    pub fallbacks: Vec<UnresolvedReference>,
    /// References whose row overflows or lands above row 1. When any are present the
    /// formula is returned untranslated.
    pub out_of_range: Vec<String>,
}

/// Turn recognised shorthand into an explicit `=` formula.
///
/// Returns `None` for anything that is not a formula.
pub fn detect_formula(text: &str) -> Option<String> {
    let value = text.trim();
    if value.starts_with('=') {
        return Some(value.to_string());
    }
    if SUM_PATTERN.is_match(value) {
        return Some(format!("={}", value.to_uppercase()));
    }
    if let Some(caps) = AVERAGE_PATTERN.captures(value) {
        return Some(format!("=AVERAGE({})", &caps[1]));
    }
    if ARITHMETIC_PATTERN.is_match(value) {
        return Some(format!("={value}"));
    }
    if PERCENTAGE_PATTERN.is_match(value) {
        // Stored as a fraction; the cell format shows it as a percentage.
        return Some(format!("={value}/100"));
    }
    None
}

/// Rewrite symbolic references in `formula` into absolute addresses.
///
/// `current_row` is the sheet row the formula is written to. Qualified references to
/// tables missing from `tables` fall back to `current_row + offset` and are reported in
/// [`Translation::fallbacks`]. A reference that resolves outside the sheet leaves the
/// whole formula untranslated and is reported in [`Translation::out_of_range`].
pub fn translate_formula(formula: &str, current_row: i64, tables: &TablePositions) -> Translation {
    if !formula.starts_with('=') {
        return Translation {
            formula: formula.to_string(),
            fallbacks: Vec::new(),
            out_of_range: Vec::new(),
        };
    }

    let mut fallbacks = Vec::new();
    let mut out_of_range = Vec::new();

    let mut resolve = |table: &str, offset: Option<i64>, reference: &str| -> Option<i64> {
        let base = match tables.get(table) {
            Some(start) => start.checked_add(1)?,
            None => {
                fallbacks.push(UnresolvedReference {
                    table: table.to_string(),
                    reference: reference.to_string(),
                });
                current_row
            }
        };
        row_at(base, offset)
    };

    let out = TABLE_REF.replace_all(formula, |caps: &Captures| {
        let table = format!("T{}", &caps[1]);
        match resolve(&table, offset(&caps[3]), &caps[0]) {
            Some(row) => format!("{}{row}", &caps[2]),
            None => keep(&mut out_of_range, &caps[0]),
        }
    });

    let out = TABLE_RANGE.replace_all(&out, |caps: &Captures| {
        let start = resolve(&format!("T{}", &caps[1]), offset(&caps[3]), &caps[0]);
        let end = resolve(&format!("T{}", &caps[4]), offset(&caps[6]), &caps[0]);
        match (start, end) {
            (Some(start), Some(end)) => format!("{}{start}:{}{end}", &caps[2], &caps[5]),
            _ => keep(&mut out_of_range, &caps[0]),
        }
    });

    let out = TABLE_FUNCTION.replace_all(&out, |caps: &Captures| {
        let table = format!("T{}", &caps[1]);
        let start = resolve(&table, offset(&caps[4]), &caps[0]);
        let end = resolve(&table, offset(&caps[6]), &caps[0]);
        match (start, end) {
            (Some(start), Some(end)) => {
                format!("{}({}{start}:{}{end})", &caps[2], &caps[3], &caps[5])
            }
            _ => keep(&mut out_of_range, &caps[0]),
        }
    });

    let local = |o: Option<i64>| -> Option<i64> {
        let base = match tables.enclosing(current_row) {
            Some(start) => start.checked_add(1)?,
            None => current_row,
        };
        row_at(base, o)
    };

    let out = LOCAL_REF.replace_all(&out, |caps: &Captures| match local(offset(&caps[2])) {
        Some(row) => format!("{}{row}", &caps[1]),
        None => keep(&mut out_of_range, &caps[0]),
    });

    let out = LOCAL_RANGE.replace_all(&out, |caps: &Captures| {
        match (local(offset(&caps[2])), local(offset(&caps[4]))) {
            (Some(start), Some(end)) => format!("{}{start}:{}{end}", &caps[1], &caps[3]),
            _ => keep(&mut out_of_range, &caps[0]),
        }
    });

    for fallback in &fallbacks {
        warn!(
            table = %fallback.table,
            reference = %fallback.reference,
            "formula references an unknown table, resolving against the current row"
        );
    }

    if !out_of_range.is_empty() {
        warn!(
            formula,
            references = ?out_of_range,
            "formula references rows outside the sheet, leaving it untranslated"
        );
        return Translation {
            formula: formula.to_string(),
            fallbacks,
            out_of_range,
        };
    }

    Translation {
        formula: out.into_owned(),
        fallbacks,
        out_of_range,
    }
}

/// `None` when the offset does not fit an `i64`.
fn offset(raw: &str) -> Option<i64> {
    raw.trim_start_matches('+').parse().ok()
}

/// Sheet row `base + offset`, if it exists.
fn row_at(base: i64, offset: Option<i64>) -> Option<i64> {
    base.checked_add(offset?).filter(|row| *row >= 1)
}

fn keep(out_of_range: &mut Vec<String>, reference: &str) -> String {
    out_of_range.push(reference.to_string());
    reference.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(starts: &[i64]) -> TablePositions {
        let mut positions = TablePositions::new();
        for start in starts {
            positions.register(*start);
        }
        positions
    }

    #[test]
    fn detects_shorthand_formulas() {
        assert_eq!(detect_formula("=A1+B1").as_deref(), Some("=A1+B1"));
        assert_eq!(detect_formula("sum(A1:A5)").as_deref(), Some("=SUM(A1:A5)"));
        assert_eq!(detect_formula("AVG(B2:B9)").as_deref(), Some("=AVERAGE(B2:B9)"));
        assert_eq!(detect_formula("A1*B1").as_deref(), Some("=A1*B1"));
        assert_eq!(detect_formula("C2/D2*100").as_deref(), Some("=C2/D2*100/100"));
        assert_eq!(detect_formula("Total"), None);
        assert_eq!(detect_formula("42"), None);
    }

    #[test]
    fn explicit_formula_without_symbols_is_unchanged() {
        let t = translate_formula("=A1+B1", 5, &tables(&[1]));
        assert_eq!(t.formula, "=A1+B1");
        assert!(t.fallbacks.is_empty());
    }

    #[test]
    fn cross_table_reference_skips_header() {
        let positions = tables(&[1, 8]);
        let t = translate_formula("=T1.B[0]", 10, &positions);
        assert_eq!(t.formula, "=B2");
    }

    #[test]
    fn table_function_range() {
        let positions = tables(&[3]);
        let t = translate_formula("=T1.SUM(B[0]:B[2])", 12, &positions);
        assert_eq!(t.formula, "=SUM(B4:B6)");
    }

    #[test]
    fn local_references_use_enclosing_table() {
        let positions = tables(&[1, 8]);
        let t = translate_formula("=B[0]*C[1]+SUM(D[0]:D[2])", 11, &positions);
        assert_eq!(t.formula, "=B9*C10+SUM(D9:D11)");
    }

    #[test]
    fn negative_and_signed_offsets() {
        let positions = tables(&[5]);
        assert_eq!(translate_formula("=B[+1]", 7, &positions).formula, "=B7");
        assert_eq!(translate_formula("=B[-1]", 7, &positions).formula, "=B5");
    }

    #[test]
    fn unknown_table_falls_back_to_current_row() {
        let positions = tables(&[1]);
        let t = translate_formula("=T9.C[2]", 4, &positions);
        assert_eq!(t.formula, "=C6");
        assert_eq!(
            t.fallbacks,
            vec![UnresolvedReference {
                table: "T9".into(),
                reference: "T9.C[2]".into()
            }]
        );
    }

    #[test]
    fn no_tables_resolves_locally_against_current_row() {
        let t = translate_formula("=B[1]", 4, &TablePositions::new());
        assert_eq!(t.formula, "=B5");
    }

    #[test]
    fn huge_offsets_leave_the_formula_untranslated() {
        let positions = tables(&[1]);
        let t = translate_formula("=B[9223372036854775807]*C[0]", 3, &positions);
        assert_eq!(t.formula, "=B[9223372036854775807]*C[0]");
        assert_eq!(t.out_of_range, vec!["B[9223372036854775807]".to_string()]);

        let t = translate_formula("=T1.B[99999999999999999999]", 3, &positions);
        assert_eq!(t.formula, "=T1.B[99999999999999999999]");
        assert!(!t.out_of_range.is_empty());
    }

    #[test]
    fn offsets_above_the_first_row_leave_the_formula_untranslated() {
        let positions = tables(&[1]);
        let t = translate_formula("=T1.B[-5]+B[0]", 3, &positions);
        assert_eq!(t.formula, "=T1.B[-5]+B[0]");
        assert!(t.out_of_range.contains(&"T1.B[-5]".to_string()));

        let t = translate_formula("=B[-9223372036854775808]", 3, &TablePositions::new());
        assert_eq!(t.formula, "=B[-9223372036854775808]");
    }

    #[test]
    fn row_one_is_still_in_range() {
        let t = translate_formula("=B[-2]", 3, &TablePositions::new());
        assert_eq!(t.formula, "=B1");
        assert!(t.out_of_range.is_empty());
    }

    #[test]
    fn enclosing_picks_latest_start_not_below_row() {
        let positions = tables(&[1, 8, 20]);
        assert_eq!(positions.enclosing(9), Some(8));
        assert_eq!(positions.enclosing(0), None);
        assert_eq!(positions.get("T3"), Some(20));
    }
}
