//! Syntax-highlighted source code with a copy-to-clipboard button.
//!
//! Highlighting produces class-tagged spans; the colours come from a theme
//! stylesheet registered as a resource, so any number of code blocks share
//! one copy of it.

use crate::block::{Block, RenderContext};
use crate::error::BlockError;
use crate::resources::{Css, JScript, ResourceRef};
use crate::settings::{BlockOptions, BlockSettings};
use bloqs_idf::Element;
use bloqs_style::Cfg;
use once_cell::sync::Lazy;
use std::sync::Arc;
use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Class of the element holding the highlighted source.
pub const CODE_CLASS: &str = "bloqs_code";
const LINENO_CLASS: &str = "bloqs_linenos";
const THEME: &str = "InspiredGitHub";

const CLIPBOARD_SVG: &str = include_str!("../assets/clipboard.svg");
const BUTTON_STYLE: &str =
    "position:absolute; top:0.2rem; right:0.2rem; background: none; border: none;";

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

static HIGHLIGHT_CSS: Lazy<ResourceRef> = Lazy::new(|| {
    let themes = ThemeSet::load_defaults();
    let mut css = match themes.themes.get(THEME) {
        Some(theme) => css_for_theme_with_class_style(theme, class_style()).unwrap_or_else(|e| {
            log::warn!("Failed to build highlight stylesheet: {}", e);
            String::new()
        }),
        None => {
            log::warn!("Highlight theme {} is not bundled", THEME);
            String::new()
        }
    };
    css.push_str(&format!(
        ".{} {{ color: #999; padding-right: 1em; user-select: none; }}\n",
        LINENO_CLASS
    ));
    Arc::new(Css::inline(css, "code_highlight_style"))
});

static COPY_SCRIPT: Lazy<ResourceRef> = Lazy::new(|| {
    Arc::new(JScript::inline(
        include_str!("../assets/copy-to-clipboard.js"),
        "copy_script",
    ))
});

// Prefixed so highlight classes cannot clash with user styles.
fn class_style() -> ClassStyle {
    ClassStyle::SpacedPrefixed { prefix: "bloqs_" }
}

/// A block of source code, highlighted for `language`.
#[derive(Debug, Clone)]
pub struct Code {
    settings: BlockSettings,
    code: String,
    syntax: String,
    line_numbers: bool,
    filename: Option<String>,
}

impl Code {
    /// `language` is a syntax name or file extension, e.g. `"python"` or `"rs"`.
    /// Leading and trailing whitespace of `code` is dropped.
    pub fn new(
        code: impl Into<String>,
        language: &str,
        options: BlockOptions,
    ) -> Result<Self, BlockError> {
        let syntax = SYNTAXES.find_syntax_by_token(language).ok_or_else(|| {
            BlockError::InvalidContent(format!("Unknown code language: {}", language))
        })?;
        Ok(Self {
            settings: options.into(),
            code: code.into().trim().to_string(),
            syntax: syntax.name.clone(),
            line_numbers: false,
            filename: None,
        })
    }

    /// Prefixes every line with its number.
    pub fn line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = enabled;
        self
    }

    /// Shows `filename` above the code.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Name of the syntax the code is highlighted with.
    pub fn syntax_name(&self) -> &str {
        &self.syntax
    }

    fn highlight(&self) -> Result<String, BlockError> {
        let syntax = SYNTAXES
            .find_syntax_by_name(&self.syntax)
            .unwrap_or_else(|| SYNTAXES.find_syntax_plain_text());
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAXES, class_style());
        let source = format!("{}\n", self.code);
        for line in LinesWithEndings::from(&source) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        let html = generator.finalize();
        Ok(if self.line_numbers {
            number_lines(&html, self.code.lines().count())
        } else {
            html
        })
    }
}

// The segment after the last newline only closes open spans.
fn number_lines(html: &str, count: usize) -> String {
    let width = count.to_string().len();
    html.split('\n')
        .enumerate()
        .map(|(i, segment)| {
            if i < count {
                format!(
                    "<span class=\"{}\">{:>width$}</span>{}",
                    LINENO_CLASS,
                    i + 1,
                    segment,
                    width = width
                )
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl Block for Code {
    fn settings(&self) -> &BlockSettings {
        &self.settings
    }

    fn resource_deps(&self) -> Vec<ResourceRef> {
        vec![HIGHLIGHT_CSS.clone(), COPY_SCRIPT.clone()]
    }

    fn write_contents(
        &self,
        container: &mut Element,
        _cfg: &Cfg,
        _ctx: &mut RenderContext,
    ) -> Result<(), BlockError> {
        let highlighted = self.highlight()?;

        let wrapper = container.append("div");
        wrapper.set_attr("style", "position: relative; overflow-x: scroll;");

        let button = wrapper.append("button");
        let quoted = serde_json::Value::from(self.code.as_str()).to_string();
        button.set_attr("onclick", format!("writeClipboardText({})", quoted));
        button.set_attr("style", BUTTON_STYLE);
        button.append_raw(CLIPBOARD_SVG.trim_end());

        let source = wrapper.append("div");
        source.set_classes(&[CODE_CLASS]);
        if let Some(filename) = &self.filename {
            let label = source.append("span");
            label.set_classes(&["filename"]);
            label.append_text(filename);
        }
        source.append("pre").append("code").append_raw(highlighted);
        Ok(())
    }
}
