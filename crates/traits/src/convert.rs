//! HtmlConverter trait for turning rendered HTML into PDF or images.
//!
//! The block engine only ever produces HTML. Converting it to other formats
//! is delegated to an implementation of this trait, typically one that drives
//! an external process.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("No converter defined for file type: {0}")]
    UnsupportedFormat(String),

    #[error("Unknown converter '{0}'")]
    UnknownConverter(String),

    #[error("{command} exited with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Page orientation for paged output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "Portrait",
            Orientation::Landscape => "Landscape",
        }
    }
}

/// Space reserved for a repeated header or footer.
#[derive(Debug, Clone, PartialEq)]
pub enum Spacing {
    /// A bare number, interpreted as millimetres.
    Millimetres(f64),
    /// An HTML length such as `"5cm"`.
    Css(String),
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing::Millimetres(5.0)
    }
}

impl Spacing {
    /// The spacing as a CSS length.
    pub fn to_css(&self) -> String {
        match self {
            Spacing::Millimetres(mm) => format!("{}mm", mm),
            Spacing::Css(css) => css.clone(),
        }
    }
}

impl fmt::Display for Spacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spacing::Millimetres(mm) => write!(f, "{}", mm),
            Spacing::Css(css) => f.write_str(css),
        }
    }
}

/// How a converter wants page headers and footers delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFooterLayout {
    /// Header and footer rendered as standalone documents next to the body.
    Separate,
    /// Header and footer inlined into the body document as a table layout,
    /// sized by their spacing.
    Inline,
}

/// Everything a converter needs for one conversion.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// The main document, rendered for static output.
    pub html: String,
    pub header_html: Option<String>,
    pub header_spacing: Spacing,
    pub footer_html: Option<String>,
    pub footer_spacing: Spacing,
    /// Lower-case target format (`pdf`, `png`, `jpg`, `svg`).
    pub format: String,
    pub output_file: PathBuf,
    pub zoom: f64,
    pub page_size: String,
    pub orientation: Orientation,
    pub auto_shrink: bool,
    /// Extra `--flag value` pairs passed through to the tool.
    pub extra_args: Vec<(String, String)>,
    /// Directory for intermediate HTML files.
    pub work_dir: PathBuf,
    /// Stem used to name intermediate files.
    pub file_stem: String,
    pub remove_temp_files: bool,
}

/// A backend that converts HTML to another format.
pub trait HtmlConverter: Send + Sync {
    /// Human-readable name, as used in user configuration.
    fn name(&self) -> &'static str;

    fn header_footer_layout(&self) -> HeaderFooterLayout {
        HeaderFooterLayout::Separate
    }

    /// Performs the conversion, writing `request.output_file`.
    fn convert(&self, request: &ConversionRequest) -> Result<(), ConvertError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_css() {
        assert_eq!(Spacing::Millimetres(5.0).to_css(), "5mm");
        assert_eq!(Spacing::Css("2cm".into()).to_css(), "2cm");
        assert_eq!(Spacing::Millimetres(7.5).to_string(), "7.5");
    }

    #[test]
    fn test_orientation_names() {
        assert_eq!(Orientation::default().as_str(), "Portrait");
        assert_eq!(Orientation::Landscape.as_str(), "Landscape");
    }
}
