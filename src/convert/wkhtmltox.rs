use super::{TempFiles, flag_name, run_command};
use bloqs_traits::{ConversionRequest, ConvertError, HtmlConverter};
use std::path::{Path, PathBuf};
use std::process::Command;

const DEFAULT_JAVASCRIPT_DELAY: &str = "200";
const JAVASCRIPT_DELAY_KEY: &str = "javascript_delay";

/// Flags shared by both wkhtmlto* tools so block scripts get to finish.
fn javascript_args(cmd: &mut Command, request: &ConversionRequest) {
    let delay = request
        .extra_args
        .iter()
        .find(|(k, _)| k == JAVASCRIPT_DELAY_KEY)
        .map(|(_, v)| v.as_str())
        .unwrap_or(DEFAULT_JAVASCRIPT_DELAY);
    cmd.args(["--no-stop-slow-scripts", "--debug-javascript"]);
    cmd.args(["--javascript-delay", delay]);
}

fn passthrough_args(cmd: &mut Command, request: &ConversionRequest) {
    for (key, value) in &request.extra_args {
        if key != JAVASCRIPT_DELAY_KEY {
            cmd.arg(flag_name(key)).arg(value);
        }
    }
}

/// HTML to PDF through `wkhtmltopdf`. Headers and footers are separate
/// documents repeated on every page.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfConverter {
    executable: PathBuf,
}

impl Default for WkhtmltopdfConverter {
    fn default() -> Self {
        Self::with_executable("wkhtmltopdf")
    }
}

impl WkhtmltopdfConverter {
    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    fn command(
        &self,
        request: &ConversionRequest,
        html: &Path,
        header: Option<&Path>,
        footer: Option<&Path>,
    ) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(["--page-size", request.page_size.as_str()]);
        cmd.args(["--orientation", request.orientation.as_str()]);
        cmd.arg("--zoom").arg(request.zoom.to_string());
        cmd.arg(if request.auto_shrink {
            "--enable-smart-shrinking"
        } else {
            "--disable-smart-shrinking"
        });
        javascript_args(&mut cmd, request);
        passthrough_args(&mut cmd, request);

        if let Some(header) = header {
            cmd.arg("--header-html").arg(header);
            cmd.arg("--header-spacing").arg(request.header_spacing.to_string());
        }
        if let Some(footer) = footer {
            cmd.arg("--footer-html").arg(footer);
            cmd.arg("--footer-spacing").arg(request.footer_spacing.to_string());
        }

        cmd.arg(html).arg(&request.output_file);
        cmd
    }
}

impl HtmlConverter for WkhtmltopdfConverter {
    fn name(&self) -> &'static str {
        "wkhtmltopdf"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<(), ConvertError> {
        let mut files = TempFiles::new(&request.work_dir, &request.file_stem);
        let html = files.write("", &request.html)?;
        let header = match &request.header_html {
            Some(content) => Some(files.write("_header", content)?),
            None => None,
        };
        let footer = match &request.footer_html {
            Some(content) => Some(files.write("_footer", content)?),
            None => None,
        };

        let mut cmd = self.command(request, &html, header.as_deref(), footer.as_deref());
        let result = run_command(&mut cmd);
        files.cleanup(request.remove_temp_files);
        result.map(drop)
    }
}

/// HTML to PNG/JPG/SVG through `wkhtmltoimage`, sized to fit the content.
#[derive(Debug, Clone)]
pub struct WkhtmltoimageConverter {
    executable: PathBuf,
}

impl Default for WkhtmltoimageConverter {
    fn default() -> Self {
        Self::with_executable("wkhtmltoimage")
    }
}

impl WkhtmltoimageConverter {
    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    fn command(&self, request: &ConversionRequest, html: &Path) -> Command {
        let format = request
            .output_file
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_else(|| request.format.clone());

        let mut cmd = Command::new(&self.executable);
        cmd.args(["--format", format.as_str()]);
        cmd.arg("--zoom").arg(request.zoom.to_string());
        // Width 0 fits the page to the content without extra margin.
        cmd.args(["--width", "0"]);
        javascript_args(&mut cmd, request);
        passthrough_args(&mut cmd, request);
        cmd.arg(html).arg(&request.output_file);
        cmd
    }
}

impl HtmlConverter for WkhtmltoimageConverter {
    fn name(&self) -> &'static str {
        "wkhtmltoimage"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<(), ConvertError> {
        if request.header_html.is_some() || request.footer_html.is_some() {
            log::debug!("Ignoring header/footer for image output");
        }
        let mut files = TempFiles::new(&request.work_dir, &request.file_stem);
        let html = files.write("", &request.html)?;
        let result = run_command(&mut self.command(request, &html));
        files.cleanup(request.remove_temp_files);
        result.map(drop)
    }
}
