//! Saving rendered blocks to disk, directly as HTML or through a converter.

use crate::config::{UserConfig, expand_home};
use crate::convert::converter_for;
use crate::error::BloqsError;
use bloqs_core::{
    BlockId, BlockOptions, BlockRef, BoxBlock, RenderOptions, render_html, to_static,
};
use bloqs_traits::{ConversionRequest, ConvertError, HeaderFooterLayout, HtmlConverter, Orientation, Spacing};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments for [`Exporter::save`].
#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// Output file. Its extension is the format unless `fmt` is also given.
    pub filename: Option<PathBuf>,
    /// Output format. Alone, the file goes to the temporary HTML directory.
    pub fmt: Option<String>,
    pub pdf_zoom: f64,
    pub pdf_page_size: String,
    pub orientation: Orientation,
    /// Smart shrinking of content to the page (wkhtmltopdf only).
    pub pdf_auto_shrink: bool,
    /// Repeated at the top of every page.
    pub header: Option<BlockRef>,
    pub header_spacing: Spacing,
    /// Repeated at the bottom of every page.
    pub footer: Option<BlockRef>,
    pub footer_spacing: Spacing,
    /// Passed through to the converter as `--key value`.
    pub extra_args: Vec<(String, String)>,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            filename: None,
            fmt: None,
            pdf_zoom: 1.0,
            pdf_page_size: "A4".to_string(),
            orientation: Orientation::Portrait,
            pdf_auto_shrink: true,
            header: None,
            header_spacing: Spacing::default(),
            footer: None,
            footer_spacing: Spacing::default(),
            extra_args: Vec::new(),
        }
    }
}

impl SaveOptions {
    /// Save to `filename`, format taken from its extension.
    pub fn to_file(filename: impl Into<PathBuf>) -> Self {
        Self::default().filename(filename)
    }

    /// Save to a generated file name in the temporary HTML directory.
    pub fn to_format(fmt: impl Into<String>) -> Self {
        Self::default().fmt(fmt)
    }

    pub fn filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn fmt(mut self, fmt: impl Into<String>) -> Self {
        self.fmt = Some(fmt.into());
        self
    }

    pub fn zoom(mut self, zoom: f64) -> Self {
        self.pdf_zoom = zoom;
        self
    }

    pub fn page_size(mut self, size: impl Into<String>) -> Self {
        self.pdf_page_size = size.into();
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn auto_shrink(mut self, auto_shrink: bool) -> Self {
        self.pdf_auto_shrink = auto_shrink;
        self
    }

    pub fn header(mut self, header: BlockRef, spacing: Spacing) -> Self {
        self.header = Some(header);
        self.header_spacing = spacing;
        self
    }

    pub fn footer(mut self, footer: BlockRef, spacing: Spacing) -> Self {
        self.footer = Some(footer);
        self.footer_spacing = spacing;
        self
    }

    pub fn arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_args.push((key.into(), value.into()));
        self
    }
}

/// Where a save writes, and in which format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub path: PathBuf,
    /// Lower-cased.
    pub format: String,
}

impl OutputTarget {
    pub fn is_html(&self) -> bool {
        self.format.contains("htm")
    }
}

/// Works out the output file and format from the save arguments.
pub fn resolve_target(
    block_id: &BlockId,
    filename: Option<&Path>,
    fmt: Option<&str>,
    config: &UserConfig,
) -> Result<OutputTarget, BloqsError> {
    let (path, format) = match (filename, fmt) {
        (None, None) => {
            return Err(BloqsError::Usage(
                "One of `filename` or `fmt` must be provided.".to_string(),
            ));
        }
        (Some(filename), fmt) => {
            let extension = filename
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default();
            match fmt {
                None if extension.is_empty() => {
                    return Err(BloqsError::Usage(
                        "If fmt is not specified, filename must contain extension".to_string(),
                    ));
                }
                None => (filename.to_path_buf(), extension),
                Some(fmt) if fmt != extension => {
                    let mut name = OsString::from(filename.as_os_str());
                    name.push(".");
                    name.push(fmt);
                    (PathBuf::from(name), fmt.to_string())
                }
                Some(fmt) => (filename.to_path_buf(), fmt.to_string()),
            }
        }
        (None, Some(fmt)) => {
            let name = format!("{}.{}", block_id.short(config.id_precision), fmt);
            (config.tmp_html_dir.join(name), fmt.to_string())
        }
    };

    Ok(OutputTarget {
        path,
        format: format.to_lowercase(),
    })
}

/// Saves and publishes blocks according to a [`UserConfig`].
#[derive(Clone)]
pub struct Exporter {
    config: UserConfig,
    converters: HashMap<String, Arc<dyn HtmlConverter>>,
}

impl Exporter {
    pub fn new(config: UserConfig) -> Self {
        Self {
            config,
            converters: HashMap::new(),
        }
    }

    /// An exporter using the configuration in `~/.bloqs.cfg`.
    pub fn from_user_config() -> Result<Self, BloqsError> {
        Ok(Self::new(UserConfig::load()?))
    }

    /// Uses `converter` for `format` instead of the configured one.
    pub fn with_converter(mut self, format: &str, converter: Arc<dyn HtmlConverter>) -> Self {
        self.converters.insert(format.to_lowercase(), converter);
        self
    }

    pub fn config(&self) -> &UserConfig {
        &self.config
    }

    fn converter_for(&self, format: &str) -> Result<Arc<dyn HtmlConverter>, BloqsError> {
        if let Some(converter) = self.converters.get(format) {
            return Ok(converter.clone());
        }
        converter_for(format, &self.config).map_err(|e| match e {
            ConvertError::UnsupportedFormat(_) => BloqsError::Usage(e.to_string()),
            other => other.into(),
        })
    }

    /// Renders `block` and writes it out. Returns the path written.
    ///
    /// HTML is written as is. Any other format is rendered in its static
    /// form and handed to the converter configured for it.
    pub fn save(&self, block: &BlockRef, options: &SaveOptions) -> Result<PathBuf, BloqsError> {
        let target = resolve_target(
            block.settings().id(),
            options.filename.as_deref(),
            options.fmt.as_deref(),
            &self.config,
        )?;

        if target.is_html() {
            let render = RenderOptions {
                pretty: true,
                static_output: false,
                header: options.header.clone(),
                footer: options.footer.clone(),
            };
            std::fs::write(&target.path, render_html(block.as_ref(), &render)?)?;
            log::info!("Saved HTML to {}", target.path.display());
            return Ok(target.path);
        }

        let converter = self.converter_for(&target.format)?;
        let request = self.conversion_request(block, options, &target, converter.header_footer_layout())?;
        converter.convert(&request)?;
        log::info!(
            "Saved {} to {} via {}",
            target.format,
            target.path.display(),
            converter.name()
        );
        Ok(target.path)
    }

    /// Saves under the configured public directory, creating parent
    /// directories as needed.
    pub fn publish(
        &self,
        block: &BlockRef,
        name: impl AsRef<Path>,
        options: &SaveOptions,
    ) -> Result<PathBuf, BloqsError> {
        let full_path = expand_home(&self.config.public_dir.join(name));
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let options = options.clone().filename(full_path);
        self.save(block, &options)
    }

    fn conversion_request(
        &self,
        block: &BlockRef,
        options: &SaveOptions,
        target: &OutputTarget,
        layout: HeaderFooterLayout,
    ) -> Result<ConversionRequest, BloqsError> {
        let body = to_static(block);
        let header = options.header.as_ref().map(to_static);
        let footer = options.footer.as_ref().map(to_static);

        let (html, header_html, footer_html) = match layout {
            HeaderFooterLayout::Separate => (
                render_static(&body, None, None)?,
                header.map(|h| render_static(&h, None, None)).transpose()?,
                footer.map(|f| render_static(&f, None, None)).transpose()?,
            ),
            HeaderFooterLayout::Inline => {
                let header = header
                    .map(|h| sized_to(h, &options.header_spacing))
                    .transpose()?;
                let footer = footer
                    .map(|f| sized_to(f, &options.footer_spacing))
                    .transpose()?;
                (render_static(&body, header, footer)?, None, None)
            }
        };

        Ok(ConversionRequest {
            html,
            header_html,
            header_spacing: options.header_spacing.clone(),
            footer_html,
            footer_spacing: options.footer_spacing.clone(),
            format: target.format.clone(),
            output_file: target.path.clone(),
            zoom: options.pdf_zoom,
            page_size: options.pdf_page_size.clone(),
            orientation: options.orientation,
            auto_shrink: options.pdf_auto_shrink,
            extra_args: options.extra_args.clone(),
            work_dir: self.config.tmp_html_dir.clone(),
            file_stem: block.settings().id().short(self.config.id_precision).to_string(),
            remove_temp_files: self.config.remove_temp_files,
        })
    }
}

fn render_static(
    block: &BlockRef,
    header: Option<BlockRef>,
    footer: Option<BlockRef>,
) -> Result<String, BloqsError> {
    let options = RenderOptions {
        pretty: true,
        static_output: true,
        header,
        footer,
    };
    Ok(render_html(block.as_ref(), &options)?)
}

// An inlined header or footer takes its spacing as a fixed height.
fn sized_to(block: BlockRef, spacing: &Spacing) -> Result<BlockRef, BloqsError> {
    let sized = BoxBlock::new(block, BlockOptions::new().height(spacing.to_css()))?;
    Ok(Arc::new(sized))
}

/// [`Exporter::save`] with the user's configuration.
pub fn save(block: &BlockRef, options: &SaveOptions) -> Result<PathBuf, BloqsError> {
    Exporter::from_user_config()?.save(block, options)
}

/// [`Exporter::publish`] with the user's configuration.
pub fn publish(
    block: &BlockRef,
    name: impl AsRef<Path>,
    options: &SaveOptions,
) -> Result<PathBuf, BloqsError> {
    Exporter::from_user_config()?.publish(block, name, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config_in(dir: &Path) -> UserConfig {
        UserConfig {
            tmp_html_dir: dir.to_path_buf(),
            public_dir: dir.join("public"),
            id_precision: 4,
            ..UserConfig::default()
        }
    }

    #[test]
    fn test_target_requires_filename_or_fmt() {
        let err = resolve_target(&BlockId::new("abcdef"), None, None, &UserConfig::default()).unwrap_err();
        assert!(matches!(err, BloqsError::Usage(_)));
    }

    #[test]
    fn test_target_from_extension() {
        let target = resolve_target(
            &BlockId::new("abcdef"),
            Some(Path::new("out/report.HTML")),
            None,
            &UserConfig::default(),
        )
        .unwrap();
        assert_eq!(target.path, PathBuf::from("out/report.HTML"));
        assert_eq!(target.format, "html");
        assert!(target.is_html());
    }

    #[test]
    fn test_target_without_extension_errors() {
        let err = resolve_target(
            &BlockId::new("abcdef"),
            Some(Path::new("report")),
            None,
            &UserConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "If fmt is not specified, filename must contain extension");
    }

    #[test]
    fn test_target_appends_differing_fmt() {
        let id = BlockId::new("abcdef");
        let config = UserConfig::default();

        let target = resolve_target(&id, Some(Path::new("report.html")), Some("pdf"), &config).unwrap();
        assert_eq!(target.path, PathBuf::from("report.html.pdf"));
        assert_eq!(target.format, "pdf");

        let same = resolve_target(&id, Some(Path::new("report.pdf")), Some("pdf"), &config).unwrap();
        assert_eq!(same.path, PathBuf::from("report.pdf"));
    }

    #[test]
    fn test_target_fmt_only_uses_tmp_dir_and_id_prefix() {
        let config = config_in(Path::new("/scratch"));
        let target = resolve_target(&BlockId::new("abcdef"), None, Some("htm"), &config).unwrap();
        assert_eq!(target.path, PathBuf::from("/scratch/abcd.htm"));
        assert!(target.is_html());
    }

    #[test]
    fn test_unsupported_format_is_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(config_in(dir.path()));
        let block = bloqs_core::block("x").unwrap();

        let err = exporter.save(&block, &SaveOptions::to_format("docx")).unwrap_err();
        assert!(matches!(err, BloqsError::Usage(msg) if msg.contains("docx")));
    }

    #[test]
    fn test_publish_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(config_in(dir.path()));
        let block = bloqs_core::block("published").unwrap();

        let path = exporter
            .publish(&block, "team/weekly/report.html", &SaveOptions::default())
            .unwrap();
        assert_eq!(path, dir.path().join("public/team/weekly/report.html"));
        assert!(std::fs::read_to_string(path).unwrap().contains("published"));
    }
}
