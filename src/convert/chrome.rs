use super::{TempFiles, run_command};
use bloqs_traits::{ConversionRequest, ConvertError, HeaderFooterLayout, HtmlConverter, Orientation};
use std::path::{Path, PathBuf};
use std::process::Command;

/// HTML to PDF by printing from a headless Chrome/Chromium.
///
/// Chrome has no notion of separate header documents, so the header and
/// footer arrive inlined in the body as a table layout whose `thead`/`tfoot`
/// repeat on every printed page. Page size, orientation and zoom are applied
/// through an injected print stylesheet.
#[derive(Debug, Clone)]
pub struct ChromeHeadlessConverter {
    executable: PathBuf,
}

impl ChromeHeadlessConverter {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    fn page_style(request: &ConversionRequest) -> String {
        let orientation = match request.orientation {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        };
        let mut css = format!("@page{{size:{} {}}}", request.page_size, orientation);
        if request.zoom != 1.0 {
            css.push_str(&format!("body{{zoom:{}}}", request.zoom));
        }
        format!("<style type=\"text/css\">{}</style>", css)
    }

    /// The document with the print stylesheet placed at the end of its head.
    fn print_document(request: &ConversionRequest) -> String {
        let style = Self::page_style(request);
        match request.html.find("</head>") {
            Some(pos) => {
                let mut html = request.html.clone();
                html.insert_str(pos, &style);
                html
            }
            None => format!("{}{}", style, request.html),
        }
    }

    fn command(&self, request: &ConversionRequest, html: &Path) -> Command {
        let mut print_to = std::ffi::OsString::from("--print-to-pdf=");
        print_to.push(&request.output_file);
        let mut url = std::ffi::OsString::from("file://");
        url.push(html);

        let mut cmd = Command::new(&self.executable);
        cmd.args(["--headless", "--disable-gpu", "--no-pdf-header-footer"]);
        cmd.arg(print_to).arg(url);
        cmd
    }
}

impl HtmlConverter for ChromeHeadlessConverter {
    fn name(&self) -> &'static str {
        "chrome_headless"
    }

    fn header_footer_layout(&self) -> HeaderFooterLayout {
        HeaderFooterLayout::Inline
    }

    fn convert(&self, request: &ConversionRequest) -> Result<(), ConvertError> {
        if !request.extra_args.is_empty() {
            log::debug!("chrome_headless ignores {} extra argument(s)", request.extra_args.len());
        }
        let mut files = TempFiles::new(&request.work_dir, &request.file_stem);
        let html = files.write("", &Self::print_document(request))?;
        let result = run_command(&mut self.command(request, &html));
        files.cleanup(request.remove_temp_files);
        result.map(drop)
    }
}
