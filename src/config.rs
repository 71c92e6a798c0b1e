//! Report configuration
//!
//! Input/output paths are explicit per run. Rendering options come from
//! report properties (defaults in report.json, overrides from a config file
//! or CLI flags) via [`PropertyReader`].

use crate::error::Result;
use crate::properties::PropertyReader;
use std::fmt;
use std::path::{Path, PathBuf};

pub const MIN_DPI: u32 = 36;
pub const MAX_DPI: u32 = 600;

/// Which fixed figure layout to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// 1x3 row: position, velocity, phase portrait
    Brief,
    /// 2x2 grid: adds the combined view, end marker, page title and statistics
    #[default]
    Extended,
}

impl Variant {
    /// Parse from a property value
    ///
    /// Validation happens in PropertyReader::get_enum(); anything else maps
    /// to the default.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "brief" => Self::Brief,
            _ => Self::Extended,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Brief => "brief",
            Variant::Extended => "extended",
        }
    }

    /// Figure size in inches (width, height)
    pub fn figure_size(self) -> (f64, f64) {
        match self {
            Variant::Brief => (14.0, 4.0),
            Variant::Extended => (12.0, 10.0),
        }
    }

    /// Subplot grid as (rows, columns)
    pub fn grid(self) -> (usize, usize) {
        match self {
            Variant::Brief => (1, 3),
            Variant::Extended => (2, 2),
        }
    }

    /// Output file used when none is configured
    pub fn default_output(self) -> &'static str {
        match self {
            Variant::Brief => "vanderpol_quick.png",
            Variant::Extended => "vanderpol_plots.png",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PNG encoder effort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngCompression {
    #[default]
    Fast,
    Default,
    Best,
}

impl PngCompression {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "default" => Self::Default,
            "best" => Self::Best,
            _ => Self::Fast,
        }
    }
}

/// Per-run overrides from the command line, applied over the config file
#[derive(Debug, Clone, Default)]
pub struct ReportOverrides {
    pub output_path: Option<PathBuf>,
    pub variant: Option<String>,
    pub dpi: Option<u32>,
    pub title: Option<String>,
    /// Drop the page title regardless of `title` and the config file
    pub no_title: bool,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub variant: Variant,

    /// Pixels per inch of the rendered figure
    pub dpi: u32,

    /// Page title (extended variant only). None = no title
    pub title: Option<String>,

    pub png_compression: PngCompression,
}

impl ReportConfig {
    /// Build a config from report properties
    ///
    /// `output_path` = None picks the variant's default file name.
    pub fn from_properties(
        props: &PropertyReader,
        input_path: impl Into<PathBuf>,
        output_path: Option<PathBuf>,
    ) -> Self {
        let variant = Variant::parse(&props.get_enum("variant"));
        let dpi = props.get_u32_in_range("dpi", MIN_DPI, MAX_DPI);
        let title = props.get_optional_string("figure.title");
        let png_compression = PngCompression::parse(&props.get_enum("png.compression"));

        Self {
            input_path: input_path.into(),
            output_path: output_path.unwrap_or_else(|| PathBuf::from(variant.default_output())),
            variant,
            dpi,
            title,
            png_compression,
        }
    }

    /// Layer report.json defaults, then `config_file`, then `overrides`
    ///
    /// # Errors
    /// `NotFound` or `ConfigError` if the config file cannot be read.
    pub fn resolve(
        input_path: impl Into<PathBuf>,
        config_file: Option<&Path>,
        overrides: &ReportOverrides,
    ) -> Result<Self> {
        let mut props = match config_file {
            Some(path) => PropertyReader::from_json_file(path)?,
            None => PropertyReader::new(),
        };

        if let Some(variant) = &overrides.variant {
            props = props.with_override("variant", variant.as_str());
        }
        if let Some(dpi) = overrides.dpi {
            props = props.with_override("dpi", dpi.to_string());
        }
        if let Some(title) = &overrides.title {
            props = props.with_override("figure.title", title.as_str());
        }

        let mut config = Self::from_properties(&props, input_path, overrides.output_path.clone());
        if overrides.no_title {
            config.title = None;
        }
        Ok(config)
    }

    /// Config with every property at its default
    pub fn new(
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        variant: Variant,
    ) -> Self {
        let props = PropertyReader::new().with_override("variant", variant.as_str());
        Self::from_properties(
            &props,
            input_path.as_ref(),
            Some(output_path.as_ref().to_path_buf()),
        )
    }

    /// Resolve the figure size to pixels (inches x DPI)
    pub fn resolve_dimensions(&self) -> (u32, u32) {
        let (width_in, height_in) = self.variant.figure_size();
        let dpi = self.dpi as f64;
        (
            (width_in * dpi).round() as u32,
            (height_in * dpi).round() as u32,
        )
    }
}
