//! A block that can be collapsed and expanded in the browser.

use crate::block::{AsBlockRef, Block, BlockRef, RenderContext, Visitor, visit_children};
use crate::dispatch::{BlockRegistry, Content, default_registry};
use crate::error::BlockError;
use crate::layout::{blockify_with, composite_visit};
use crate::resources::{Css, ResourceRef};
use crate::settings::{BlockOptions, BlockSettings};
use bloqs_idf::Element;
use bloqs_style::Cfg;
use once_cell::sync::Lazy;
use std::sync::Arc;

static COLLAPSIBLE_CSS: Lazy<ResourceRef> = Lazy::new(|| {
    Arc::new(Css::inline(
        include_str!("../assets/collapsible.css"),
        "collapsible_block_style",
    ))
});

/// A `<details>` element whose title is the clickable `<summary>`.
/// Children are stacked vertically, like a [`VStack`](crate::layout::VStack).
#[derive(Debug, Clone)]
pub struct Collapsible {
    settings: BlockSettings,
    children: Vec<BlockRef>,
    cascade_cfg: bool,
}

impl Collapsible {
    pub fn new<I>(contents: I, options: BlockOptions) -> Result<Self, BlockError>
    where
        I: IntoIterator,
        I::Item: Into<Content>,
    {
        Self::new_with(&default_registry(), contents, options)
    }

    pub fn new_with<I>(
        registry: &BlockRegistry,
        contents: I,
        options: BlockOptions,
    ) -> Result<Self, BlockError>
    where
        I: IntoIterator,
        I::Item: Into<Content>,
    {
        Ok(Self {
            settings: options.into(),
            children: blockify_with(registry, contents)?,
            cascade_cfg: true,
        })
    }

    pub fn cascade_cfg(mut self, cascade: bool) -> Self {
        self.cascade_cfg = cascade;
        self
    }

    pub fn children(&self) -> &[BlockRef] {
        &self.children
    }
}

impl Block for Collapsible {
    fn settings(&self) -> &BlockSettings {
        &self.settings
    }

    fn container_tag(&self) -> Option<&'static str> {
        Some("details")
    }

    fn resource_deps(&self) -> Vec<ResourceRef> {
        vec![COLLAPSIBLE_CSS.clone()]
    }

    fn write_title(&self, container: &mut Element) {
        let summary = container.append("summary");
        summary.set_classes(self.settings.classes());
        let heading = summary.append(format!("h{}", self.settings.title_level()));
        if let Some(title) = self.settings.title() {
            heading.append_text(title);
        }
    }

    fn write_contents(
        &self,
        container: &mut Element,
        cfg: &Cfg,
        ctx: &mut RenderContext,
    ) -> Result<(), BlockError> {
        let empty = Cfg::new();
        let cfg = if self.cascade_cfg { cfg } else { &empty };
        for child in &self.children {
            let cell = container.append("div");
            child.write_block(cell, cfg, ctx)?;
        }
        Ok(())
    }

    composite_visit!();
}
