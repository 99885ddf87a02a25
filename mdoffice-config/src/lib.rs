//! Shared configuration loader for the mdoffice toolchain.
//!
//! `defaults/mdoffice.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MdOfficeConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use mdoffice_babel::formats::eml::Priority;
use mdoffice_babel::formats::pptx::{aspect_or_default, AspectRatio, LayoutIndices};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/mdoffice.default.toml");

/// Top-level configuration consumed by mdoffice applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MdOfficeConfig {
    pub storage: StorageConfig,
    pub convert: ConvertConfig,
    pub inspect: InspectConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub output_dir: PathBuf,
}

/// Format-specific conversion knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub docx: DocxConfig,
    pub xlsx: XlsxConfig,
    pub pptx: PptxConfig,
    pub eml: EmlConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocxConfig {
    #[serde(default)]
    pub template: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XlsxConfig {
    pub sheet_title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PptxConfig {
    pub aspect: String,
    pub layouts: PptxLayoutsConfig,
    #[serde(default)]
    pub templates: PptxTemplatesConfig,
}

impl PptxConfig {
    /// The configured aspect ratio; unknown values fall back to 4:3.
    pub fn aspect_ratio(&self) -> AspectRatio {
        aspect_or_default(&self.aspect)
    }

    /// Template file for an aspect ratio, if one is configured.
    pub fn template_for(&self, aspect: AspectRatio) -> Option<&Path> {
        match aspect {
            AspectRatio::FourThree => self.templates.four_three.as_deref(),
            AspectRatio::SixteenNine => self.templates.sixteen_nine.as_deref(),
        }
    }
}

/// Mirrors [`LayoutIndices`].
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PptxLayoutsConfig {
    pub title: usize,
    pub section: usize,
    pub content: usize,
}

impl From<PptxLayoutsConfig> for LayoutIndices {
    fn from(config: PptxLayoutsConfig) -> Self {
        LayoutIndices {
            title: config.title,
            section: config.section,
            content: config.content,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PptxTemplatesConfig {
    #[serde(default)]
    pub four_three: Option<PathBuf>,
    #[serde(default)]
    pub sixteen_nine: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmlConfig {
    pub language: String,
    pub priority: Priority,
}

/// Controls `inspect` output.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    /// Transform used when none is named on the command line.
    pub transform: String,
    /// Show inline spans under each block in tree output.
    pub spans: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MdOfficeConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MdOfficeConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.storage.output_dir, PathBuf::from("mdoffice-output"));
        assert!(config.convert.docx.template.is_none());
        assert_eq!(config.convert.xlsx.sheet_title, "Data Report");
        assert_eq!(config.convert.pptx.aspect_ratio(), AspectRatio::SixteenNine);
        assert_eq!(config.convert.eml.language, "cs-CZ");
        assert_eq!(config.convert.eml.priority, Priority::Normal);
        assert_eq!(config.inspect.transform, "blocks-treeviz");
        assert!(!config.inspect.spans);
    }

    #[test]
    fn layouts_convert_to_layout_indices() {
        let config = load_defaults().expect("defaults to deserialize");
        let layouts: LayoutIndices = config.convert.pptx.layouts.into();
        assert_eq!(layouts, LayoutIndices::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("convert.pptx.aspect", "4:3")
            .expect("override to apply")
            .set_override("convert.eml.priority", "high")
            .expect("override to apply")
            .set_override("convert.pptx.templates.four_three", "classic.pptx")
            .expect("override to apply")
            .build()
            .expect("config to build");
        let pptx = &config.convert.pptx;
        assert_eq!(pptx.aspect_ratio(), AspectRatio::FourThree);
        assert_eq!(pptx.template_for(AspectRatio::FourThree), Some(Path::new("classic.pptx")));
        assert_eq!(pptx.template_for(AspectRatio::SixteenNine), None);
        assert_eq!(config.convert.eml.priority, Priority::High);
    }

    #[test]
    fn unknown_aspect_falls_back() {
        let config = Loader::new()
            .set_override("convert.pptx.aspect", "5:4")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.convert.pptx.aspect_ratio(), AspectRatio::FourThree);
    }
}
