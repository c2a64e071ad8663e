//! Blocks with text-only content.

use crate::block::{Block, RenderContext};
use crate::error::BlockError;
use crate::settings::{BlockOptions, BlockSettings};
use bloqs_idf::Element;
use bloqs_style::Cfg;

/// Writes its content verbatim: plain text or arbitrary HTML.
#[derive(Debug, Clone)]
pub struct Raw {
    settings: BlockSettings,
    contents: String,
}

impl Raw {
    /// Creates a raw block, removing common leading indentation.
    pub fn new(contents: impl Into<String>, options: BlockOptions) -> Self {
        Self {
            settings: options.into(),
            contents: dedent(&contents.into()),
        }
    }

    /// Creates a raw block that keeps its content exactly as given.
    pub fn verbatim(contents: impl Into<String>, options: BlockOptions) -> Self {
        Self {
            settings: options.into(),
            contents: contents.into(),
        }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

impl Block for Raw {
    fn settings(&self) -> &BlockSettings {
        &self.settings
    }

    fn write_contents(
        &self,
        container: &mut Element,
        _cfg: &Cfg,
        _ctx: &mut RenderContext,
    ) -> Result<(), BlockError> {
        container.append_raw(self.contents.as_str());
        Ok(())
    }
}

macro_rules! raw_variant {
    ($(#[$doc:meta])* $name:ident, $tag:literal, $process:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name(Raw);

        impl $name {
            pub fn new(contents: impl Into<String>, options: BlockOptions) -> Self {
                let raw = Raw::new(contents, options);
                let process: fn(&str) -> String = $process;
                let contents = process(&raw.contents);
                Self(Raw { contents, ..raw })
            }

            pub fn contents(&self) -> &str {
                self.0.contents()
            }
        }

        impl Block for $name {
            fn settings(&self) -> &BlockSettings {
                self.0.settings()
            }

            fn container_tag(&self) -> Option<&'static str> {
                Some($tag)
            }

            fn write_contents(
                &self,
                container: &mut Element,
                cfg: &Cfg,
                ctx: &mut RenderContext,
            ) -> Result<(), BlockError> {
                self.0.write_contents(container, cfg, ctx)
            }
        }
    };
}

raw_variant!(
    /// Fixed-width text with whitespace preserved.
    Pre,
    "pre",
    |s| s.to_string()
);

raw_variant!(
    /// A piece of inline text.
    Span,
    "span",
    |s| s.to_string()
);

raw_variant!(
    /// CommonMark rendered to HTML.
    Markdown,
    "div",
    markdown_to_html
);

fn markdown_to_html(source: &str) -> String {
    let parser = pulldown_cmark::Parser::new(source);
    let mut html = String::with_capacity(source.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

/// Removes the longest common leading whitespace from every non-blank line.
/// Lines holding only whitespace are emptied.
pub fn dedent(text: &str) -> String {
    let margin = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
            &line[..indent]
        })
        .reduce(common_prefix)
        .unwrap_or("");

    text.split('\n')
        .map(|line| {
            if line.trim_matches([' ', '\t']).is_empty() {
                ""
            } else {
                line.strip_prefix(margin).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}
