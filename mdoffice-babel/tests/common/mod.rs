//! Shared helpers for reading rendered packages back.

use mdoffice_babel::common::package::{read_part, Package};

/// A part of a rendered package as UTF-8 text. Panics when the part is missing.
pub fn part(bytes: &[u8], name: &str) -> String {
    let data = read_part(bytes, name)
        .expect("package should be a readable zip")
        .unwrap_or_else(|| panic!("missing part {name}"));
    String::from_utf8(data).expect("part should be UTF-8")
}

/// Every `.xml` and `.rels` part of a package must be well formed.
pub fn assert_parts_well_formed(bytes: &[u8]) {
    let package = Package::from_zip(bytes).expect("package should be a readable zip");
    for name in package.names() {
        if !(name.ends_with(".xml") || name.ends_with(".rels")) {
            continue;
        }
        let text = package
            .get_str(name)
            .expect("part should be UTF-8")
            .expect("listed part should exist");
        if let Err(e) = roxmltree::Document::parse(text) {
            panic!("{name} is not well formed: {e}");
        }
    }
}

pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
