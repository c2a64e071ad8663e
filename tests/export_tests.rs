mod common;

use bloqs::{
    BlockOptions, BloqsError, Exporter, HeaderFooterLayout, SaveOptions, Spacing, UserConfig, block,
    resolve,
};
use common::{RecordingConverter, TestResult};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;

fn config_in(dir: &Path) -> UserConfig {
    UserConfig {
        tmp_html_dir: dir.to_path_buf(),
        public_dir: dir.join("public"),
        ..UserConfig::default()
    }
}

#[test]
fn test_save_html_to_named_file() -> TestResult {
    common::init_logging();
    let dir = tempfile::tempdir()?;
    let exporter = Exporter::new(config_in(dir.path()));
    let report = resolve("Quarterly", BlockOptions::new().title("Q3"))?;

    let path = exporter.save(&report, &SaveOptions::to_file(dir.path().join("q3.html")))?;
    let html = std::fs::read_to_string(&path)?;

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Quarterly"));
    assert!(html.contains("<style type=\"text/css\">"));
    // Interactive output: the body carries no static-output poller script.
    assert!(!html.contains("var loadWaitPoller=runWaitPoller();"));
    let body = &html[html.find("<body>").ok_or("no body")?..];
    assert!(!body.contains("<script"));
    Ok(())
}

#[test]
fn test_save_with_format_only_uses_block_id() -> TestResult {
    let dir = tempfile::tempdir()?;
    let config = UserConfig {
        id_precision: 6,
        ..config_in(dir.path())
    };
    let exporter = Exporter::new(config);
    let report = block("x")?;

    let path = exporter.save(&report, &SaveOptions::to_format("html"))?;
    let expected = format!("{}.html", report.settings().id().short(6));
    assert_eq!(path, dir.path().join(expected));
    assert!(path.exists());
    Ok(())
}

#[test]
fn test_missing_target_fails_before_writing() -> TestResult {
    let dir = tempfile::tempdir()?;
    let exporter = Exporter::new(config_in(dir.path()));
    let err = exporter.save(&block("x")?, &SaveOptions::default()).unwrap_err();

    assert!(matches!(err, BloqsError::Usage(_)));
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_pdf_with_separate_header_and_footer() -> TestResult {
    let dir = tempfile::tempdir()?;
    let converter = Arc::new(RecordingConverter::new(HeaderFooterLayout::Separate));
    let exporter = Exporter::new(config_in(dir.path())).with_converter("pdf", converter.clone());

    let options = SaveOptions::to_file(dir.path().join("report.pdf"))
        .header(block("Header text")?, Spacing::Millimetres(10.0))
        .footer(block("Footer text")?, Spacing::default())
        .zoom(0.9)
        .arg("dpi", "300");
    let path = exporter.save(&block("Body text")?, &options)?;

    assert_eq!(std::fs::read(&path)?, b"converted");
    let request = converter.last_request();
    assert_eq!(request.format, "pdf");
    assert_eq!(request.zoom, 0.9);
    assert_eq!(request.header_spacing, Spacing::Millimetres(10.0));
    assert_eq!(request.extra_args, vec![("dpi".to_string(), "300".to_string())]);

    assert!(request.html.contains("Body text"));
    assert!(!request.html.contains("Header text"));
    assert!(request.html.contains("var loadWaitPoller=runWaitPoller();"));
    assert!(request.header_html.as_deref().is_some_and(|h| h.contains("Header text")));
    assert!(request.footer_html.as_deref().is_some_and(|f| f.contains("Footer text")));
    Ok(())
}

#[test]
fn test_pdf_with_inline_header_is_sized_by_spacing() -> TestResult {
    let dir = tempfile::tempdir()?;
    let converter = Arc::new(RecordingConverter::new(HeaderFooterLayout::Inline));
    let exporter = Exporter::new(config_in(dir.path())).with_converter("pdf", converter.clone());

    let options = SaveOptions::to_format("pdf")
        .header(block("Header text")?, Spacing::Millimetres(12.0))
        .footer(block("Footer text")?, Spacing::Css("2cm".to_string()));
    exporter.save(&block("Body text")?, &options)?;

    let request = converter.last_request();
    assert!(request.header_html.is_none());
    assert!(request.footer_html.is_none());
    assert!(request.html.contains("<thead>"));
    assert!(request.html.contains("height:12mm"));
    assert!(request.html.contains("height:2cm"));
    assert!(request.html.contains("Header text"));
    assert!(request.html.contains("Body text"));
    Ok(())
}

#[test]
fn test_config_file_drives_converter_choice() -> TestResult {
    let config = UserConfig::from_yaml_str("pdf_converter: chrome_headless\nremove_temp_files: false\n")?;
    assert_eq!(config.pdf_converter, "chrome_headless");
    assert!(!config.remove_temp_files);

    let picked = bloqs::convert::converter_for("pdf", &config)?;
    assert_eq!(picked.name(), "chrome_headless");
    Ok(())
}
