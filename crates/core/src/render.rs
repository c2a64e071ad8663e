//! Top-level rendering of a block tree into an HTML document.

use crate::block::{Block, BlockRef, RenderContext};
use crate::error::BlockError;
use crate::resources::SCRIPT_BLOCK_CORE;
use bloqs_idf::{Document, Element, render_node};
use bloqs_style::Cfg;
use bloqs_types::{IdGenerator, id_generator};

/// Options for [`render_html`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Indent the output.
    pub pretty: bool,
    /// Render the static variant of blocks that support one.
    pub static_output: bool,
    /// Written above the body, as the head of a table layout.
    pub header: Option<BlockRef>,
    /// Written below the body, as the foot of a table layout.
    pub footer: Option<BlockRef>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            static_output: false,
            header: None,
            footer: None,
        }
    }
}

impl RenderOptions {
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }

    pub fn static_output(mut self, static_output: bool) -> Self {
        self.static_output = static_output;
        self
    }

    pub fn header(mut self, header: BlockRef) -> Self {
        self.header = Some(header);
        self
    }

    pub fn footer(mut self, footer: BlockRef) -> Self {
        self.footer = Some(footer);
        self
    }
}

/// Builds the complete output document for `block`.
pub fn render_document(block: &dyn Block, options: &RenderOptions) -> Result<Document, BlockError> {
    render_document_with(block, options, id_generator())
}

/// Like [`render_document`] with an explicit id generator.
pub fn render_document_with(
    block: &dyn Block,
    options: &RenderOptions,
    ids: IdGenerator,
) -> Result<Document, BlockError> {
    let mut ctx = RenderContext::new(ids, options.static_output);
    let mut head = Element::new("head");
    head.append("meta").set_attr("charset", "utf-8");
    let mut body = Element::new("body");
    let root_cfg = Cfg::new();

    if options.header.is_some() || options.footer.is_some() {
        let table = body.append("table");
        if let Some(header) = &options.header {
            let cell = table.append("thead").append("tr").append("th");
            header.write_block(cell, &root_cfg, &mut ctx)?;
        }
        if let Some(footer) = &options.footer {
            let tfoot = table.append("tfoot");
            tfoot.set_attr("id", "footer");
            let cell = tfoot.append("tr").append("td");
            footer.write_block(cell, &root_cfg, &mut ctx)?;
        }
        let cell = table.append("tbody").append("tr").append("td");
        block.write_block(cell, &root_cfg, &mut ctx)?;
    } else {
        block.write_block(&mut body, &root_cfg, &mut ctx)?;
    }

    SCRIPT_BLOCK_CORE.write(&mut head);

    if options.static_output {
        let script = body.append("script");
        script.set_attr("type", "text/javascript");
        script.append_raw("var loadWaitPoller=runWaitPoller();");
    }

    if let Some(resources) = ctx.resources() {
        log::debug!("Writing {} resource(s) into document head", resources.len());
        resources.write_all(&mut head);
    }

    let mut root = Element::new("html");
    root.append_element(head);
    root.append_element(body);
    Ok(Document {
        doctype: Some("html".to_string()),
        root,
    })
}

/// Renders `block` as a complete HTML document.
pub fn render_html(block: &dyn Block, options: &RenderOptions) -> Result<String, BlockError> {
    Ok(render_document(block, options)?.render(options.pretty))
}

/// Renders just the block's own markup, without a document shell or resources.
pub fn render_fragment(block: &dyn Block) -> Result<String, BlockError> {
    let mut container = Element::new("div");
    let mut ctx = RenderContext::untracked(id_generator());
    block.write_block(&mut container, &Cfg::new(), &mut ctx)?;
    Ok(container
        .children()
        .iter()
        .map(|child| render_node(child, false))
        .collect())
}
