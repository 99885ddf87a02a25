//! In-memory OOXML package (zip) writer shared by the office renderers.

use std::io::{Cursor, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::xml::escape_xml;
use crate::error::FormatError;

/// Collects named parts and writes them out as a zip archive.
///
/// `[Content_Types].xml` is always written first, as Office expects.
#[derive(Debug, Default)]
pub struct Package {
    parts: Vec<(String, Vec<u8>)>,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a part.
    pub fn add(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        let name = name.into();
        let data = data.into();
        if let Some(slot) = self.parts.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = data;
        } else {
            self.parts.push((name, data));
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    /// A part decoded as UTF-8 text.
    pub fn get_str(&self, name: &str) -> Result<Option<&str>, FormatError> {
        self.get(name)
            .map(|data| {
                std::str::from_utf8(data)
                    .map_err(|e| FormatError::ParseError(format!("{name} is not UTF-8: {e}")))
            })
            .transpose()
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        let index = self.parts.iter().position(|(n, _)| n == name)?;
        Some(self.parts.remove(index).1)
    }

    /// Part names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(n, _)| n.as_str())
    }

    /// Load every part of an existing package.
    pub fn from_zip(bytes: &[u8]) -> Result<Self, FormatError> {
        use std::io::Read;

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| FormatError::ParseError(format!("not a zip package: {e}")))?;
        let mut package = Package::new();
        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            package.add(file.name().to_string(), data);
        }
        Ok(package)
    }

    pub fn finish(mut self) -> Result<Vec<u8>, FormatError> {
        self.parts
            .sort_by_key(|(name, _)| name != "[Content_Types].xml");
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, data) in &self.parts {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(data)?;
        }
        Ok(zip.finish()?.into_inner())
    }
}

/// `docProps/core.xml` stamped with the creation time.
pub fn core_properties_xml(title: &str, created: DateTime<Utc>) -> String {
    let stamp = created.to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:creator>mdoffice</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified></cp:coreProperties>"#,
        escape_xml(title)
    )
}

/// `docProps/app.xml` naming the producing application.
pub fn app_properties_xml(application: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>{}</Application></Properties>"#,
        escape_xml(application)
    )
}

/// Read one part out of an existing package, if present.
pub fn read_part(bytes: &[u8], name: &str) -> Result<Option<Vec<u8>>, FormatError> {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut out = Vec::new();
    file.read_to_end(&mut out)?;
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_come_first() {
        let mut pkg = Package::new();
        pkg.add("word/document.xml", "<doc/>");
        pkg.add("[Content_Types].xml", "<Types/>");
        let bytes = pkg.finish().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        assert_eq!(archive.by_index(0).unwrap().name(), "[Content_Types].xml");
        assert_eq!(
            read_part(&bytes, "word/document.xml").unwrap().as_deref(),
            Some(&b"<doc/>"[..])
        );
        assert!(read_part(&bytes, "missing.xml").unwrap().is_none());
    }

    #[test]
    fn reopened_package_keeps_parts() {
        let mut pkg = Package::new();
        pkg.add("a.xml", "<a/>");
        pkg.add("dir/b.xml", "<b/>");
        let mut reopened = Package::from_zip(&pkg.finish().unwrap()).unwrap();
        assert_eq!(reopened.get_str("dir/b.xml").unwrap(), Some("<b/>"));
        assert_eq!(reopened.remove("a.xml"), Some(b"<a/>".to_vec()));
        assert_eq!(reopened.names().collect::<Vec<_>>(), vec!["dir/b.xml"]);
    }

    #[test]
    fn adding_twice_replaces() {
        let mut pkg = Package::new();
        pkg.add("a.xml", "1");
        pkg.add("a.xml", "2");
        let bytes = pkg.finish().unwrap();
        assert_eq!(read_part(&bytes, "a.xml").unwrap(), Some(b"2".to_vec()));
    }
}
