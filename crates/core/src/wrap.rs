//! Blocks that wrap a single piece of content in their own container.

use crate::block::{AsBlockRef, Block, BlockRef, RenderContext, Visitor};
use crate::dispatch::{BlockRegistry, Content, default_registry, resolve_with};
use crate::error::BlockError;
use crate::settings::{BlockOptions, BlockSettings};
use bloqs_idf::Element;
use bloqs_style::Cfg;
use std::sync::Arc;

/// Wraps any content in a `div` that can carry its own styling.
#[derive(Debug, Clone)]
pub struct BoxBlock {
    settings: BlockSettings,
    contents: BlockRef,
    tag: &'static str,
}

impl BoxBlock {
    pub fn new(contents: impl Into<Content>, options: BlockOptions) -> Result<Self, BlockError> {
        Self::new_with(&default_registry(), contents, options)
    }

    pub fn new_with(
        registry: &BlockRegistry,
        contents: impl Into<Content>,
        options: BlockOptions,
    ) -> Result<Self, BlockError> {
        Self::with_tag(registry, contents, options, "div")
    }

    /// Wraps the content in a `<p>` paragraph instead of a `div`.
    pub fn paragraph(contents: impl Into<Content>, options: BlockOptions) -> Result<Self, BlockError> {
        Self::with_tag(&default_registry(), contents, options, "p")
    }

    fn with_tag(
        registry: &BlockRegistry,
        contents: impl Into<Content>,
        options: BlockOptions,
        tag: &'static str,
    ) -> Result<Self, BlockError> {
        Ok(Self {
            settings: options.into(),
            contents: resolve_with(registry, contents, BlockOptions::default())?,
            tag,
        })
    }

    pub fn contents(&self) -> &BlockRef {
        &self.contents
    }
}

impl Block for BoxBlock {
    fn settings(&self) -> &BlockSettings {
        &self.settings
    }

    fn container_tag(&self) -> Option<&'static str> {
        Some(self.tag)
    }

    fn write_contents(
        &self,
        container: &mut Element,
        cfg: &Cfg,
        ctx: &mut RenderContext,
    ) -> Result<(), BlockError> {
        self.contents.write_block(container, cfg, ctx)
    }

    fn visit(self: Arc<Self>, visitor: &mut Visitor<'_>) -> Option<BlockRef> {
        let contents = self.contents.clone().visit(visitor)?;
        if Arc::ptr_eq(&contents, &self.contents) {
            return Some(self.into_block_ref());
        }
        let mut copy = (*self).clone();
        copy.contents = contents;
        Some(Arc::new(copy))
    }
}
