//! Converters from rendered HTML to PDF and images, driving external tools.

mod chrome;
mod wkhtmltox;

pub use chrome::ChromeHeadlessConverter;
pub use wkhtmltox::{WkhtmltoimageConverter, WkhtmltopdfConverter};

use crate::config::UserConfig;
use bloqs_traits::{ConvertError, HtmlConverter};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Arc;

pub const PDF_CONVERTERS: &[&str] = &["wkhtmltopdf", "chrome_headless"];
pub const IMAGE_CONVERTERS: &[&str] = &["wkhtmltoimage"];
pub const IMAGE_FORMATS: &[&str] = &["png", "svg", "jpg"];

/// Picks the converter configured for `format`.
pub fn converter_for(
    format: &str,
    config: &UserConfig,
) -> Result<Arc<dyn HtmlConverter>, ConvertError> {
    let format = format.to_lowercase();
    if format == "pdf" {
        return match config.pdf_converter.as_str() {
            "wkhtmltopdf" => Ok(Arc::new(WkhtmltopdfConverter::default())),
            "chrome_headless" => Ok(Arc::new(ChromeHeadlessConverter::new(
                config.chrome_executable.as_str(),
            ))),
            other => Err(ConvertError::UnknownConverter(other.to_string())),
        };
    }
    if IMAGE_FORMATS.contains(&format.as_str()) {
        return match config.image_converter.as_str() {
            "wkhtmltoimage" => Ok(Arc::new(WkhtmltoimageConverter::default())),
            other => Err(ConvertError::UnknownConverter(other.to_string())),
        };
    }
    Err(ConvertError::UnsupportedFormat(format))
}

/// Runs `cmd` to completion. A non-zero exit is an error carrying stderr.
pub(crate) fn run_command(cmd: &mut Command) -> Result<Output, ConvertError> {
    let command = describe(cmd);
    log::info!("Running external application: {}", command);
    let output = cmd.output()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        return Err(ConvertError::CommandFailed {
            command,
            status: output.status.code().unwrap_or(-1),
            stderr: stderr.into_owned(),
        });
    }
    log::info!("Returned:\n stdout: {}\n stderr: {}", stdout, stderr);
    Ok(output)
}

fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Intermediate HTML files written for one conversion.
#[derive(Debug)]
pub(crate) struct TempFiles {
    dir: PathBuf,
    stem: String,
    paths: Vec<PathBuf>,
}

impl TempFiles {
    pub(crate) fn new(dir: &Path, stem: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            stem: stem.to_string(),
            paths: Vec::new(),
        }
    }

    /// Writes `<stem><suffix>.html` and remembers it for cleanup.
    pub(crate) fn write(&mut self, suffix: &str, html: &str) -> Result<PathBuf, ConvertError> {
        let path = self.dir.join(format!("{}{}.html", self.stem, suffix));
        std::fs::write(&path, html)?;
        self.paths.push(path.clone());
        Ok(path)
    }

    /// Deletes the files if `remove` is set. Failures are logged, not returned.
    pub(crate) fn cleanup(self, remove: bool) {
        if !remove {
            return;
        }
        for path in self.paths {
            if let Err(e) = std::fs::remove_file(&path) {
                log::warn!("Failed to remove a temporary file: {}: {}", path.display(), e);
            }
        }
    }
}

/// Turns `("javascript_delay", "500")` into `--javascript-delay 500`. Keys
/// already written as flags pass through unchanged.
pub(crate) fn flag_name(key: &str) -> String {
    if key.starts_with('-') {
        key.to_string()
    } else {
        format!("--{}", key.replace('_', "-"))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use bloqs_traits::{ConversionRequest, Orientation, Spacing};
    use std::path::Path;
    use std::process::Command;

    pub fn request(dir: &Path, format: &str) -> ConversionRequest {
        ConversionRequest {
            html: "<html><head></head><body>main</body></html>".to_string(),
            header_html: None,
            header_spacing: Spacing::default(),
            footer_html: None,
            footer_spacing: Spacing::default(),
            format: format.to_string(),
            output_file: dir.join(format!("out.{}", format)),
            zoom: 1.0,
            page_size: "A4".to_string(),
            orientation: Orientation::Portrait,
            auto_shrink: true,
            extra_args: Vec::new(),
            work_dir: dir.to_path_buf(),
            file_stem: "abc123".to_string(),
            remove_temp_files: true,
        }
    }

    pub fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}
