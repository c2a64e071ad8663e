//! The block protocol.
//!
//! A [`Block`] is one node of the document tree. Rendering is a single
//! top-down walk: each block resolves its config against its parent's, opens
//! its container element, writes its anchor and title, and hands the resolved
//! config to [`Block::write_contents`]. Composite blocks recurse into their
//! children from there.
//!
//! Trees are immutable once built. Transformations such as [`to_static`] go
//! through [`Block::visit`], which rebuilds only the nodes whose children
//! actually changed and returns the original `Arc` otherwise.

use crate::error::BlockError;
use crate::resources::{DependencyTracker, ResourceRef};
use crate::settings::BlockSettings;
use bloqs_idf::Element;
use bloqs_style::Cfg;
use bloqs_types::IdGenerator;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a block in a tree.
pub type BlockRef = Arc<dyn Block>;

/// Visitor applied by [`Block::visit`]. Returning `None` drops the block
/// from its parent composite.
pub type Visitor<'a> = dyn FnMut(BlockRef) -> Option<BlockRef> + 'a;

/// State threaded through one render walk.
#[derive(Debug)]
pub struct RenderContext {
    ids: IdGenerator,
    resources: Option<DependencyTracker>,
    static_output: bool,
}

impl RenderContext {
    /// A context that tracks resources, seeded with the base stylesheet.
    pub fn new(ids: IdGenerator, static_output: bool) -> Self {
        Self {
            ids,
            resources: Some(DependencyTracker::with_default_css()),
            static_output,
        }
    }

    /// A context that ignores resource declarations (fragment rendering).
    pub fn untracked(ids: IdGenerator) -> Self {
        Self {
            ids,
            resources: None,
            static_output: false,
        }
    }

    /// Next unique DOM id for this render.
    pub fn next_id(&mut self) -> String {
        self.ids.next_id()
    }

    /// True when the output is headed for a static format (PDF, image).
    pub fn is_static(&self) -> bool {
        self.static_output
    }

    pub fn register(&mut self, resource: ResourceRef) {
        if let Some(tracker) = self.resources.as_mut() {
            tracker.add(resource);
        }
    }

    pub fn resources(&self) -> Option<&DependencyTracker> {
        self.resources.as_ref()
    }

    pub fn into_resources(self) -> Option<DependencyTracker> {
        self.resources
    }
}

/// Conversion of a shared concrete block into a [`BlockRef`].
///
/// Implemented for every `Block`; lets default trait methods taking
/// `self: Arc<Self>` hand themselves out as trait objects.
pub trait AsBlockRef {
    fn into_block_ref(self: Arc<Self>) -> BlockRef;
}

impl<T: Block + 'static> AsBlockRef for T {
    fn into_block_ref(self: Arc<Self>) -> BlockRef {
        self
    }
}

/// One node of the document tree.
pub trait Block: AsBlockRef + Send + Sync + fmt::Debug {
    fn settings(&self) -> &BlockSettings;

    /// Tag of the element wrapping this block's output. `None` writes straight
    /// into the parent.
    fn container_tag(&self) -> Option<&'static str> {
        Some("div")
    }

    /// Scripts and styles this block type needs in the document head.
    fn resource_deps(&self) -> Vec<ResourceRef> {
        Vec::new()
    }

    /// Writes the block-specific output into `container` using the fully
    /// resolved `cfg`.
    fn write_contents(
        &self,
        _container: &mut Element,
        _cfg: &Cfg,
        _ctx: &mut RenderContext,
    ) -> Result<(), BlockError> {
        Err(BlockError::NotImplemented("write_contents"))
    }

    /// Writes this block into `parent`, inheriting `parent_cfg`.
    fn write_block(
        &self,
        parent: &mut Element,
        parent_cfg: &Cfg,
        ctx: &mut RenderContext,
    ) -> Result<(), BlockError> {
        for resource in self.resource_deps() {
            ctx.register(resource);
        }

        let actual_cfg = self.settings().combine_parent_cfg(parent_cfg);

        let container = match self.container_tag() {
            Some(tag) => {
                let container = parent.append(tag);
                self.write_container_attrs(container, &actual_cfg);
                container
            }
            None => parent,
        };

        self.write_anchor(container);
        self.write_title(container);
        self.write_contents(container, &actual_cfg, ctx)
    }

    /// Sets `style` (omitted when empty) and `class` on the container.
    fn write_container_attrs(&self, container: &mut Element, actual_cfg: &Cfg) {
        let styles = self.settings().styles_string(actual_cfg);
        if !styles.is_empty() {
            container.set_attr("style", styles);
        }
        container.set_classes(self.settings().classes());
    }

    fn write_anchor(&self, container: &mut Element) {
        if let Some(anchor) = self.settings().anchor() {
            container.append("a").set_attr("name", anchor.as_str());
        }
    }

    fn write_title(&self, container: &mut Element) {
        let settings = self.settings();
        if let Some(title) = settings.title().filter(|t| !t.is_empty()) {
            let heading = container.append(format!("h{}", settings.title_level()));
            let wrap = if settings.title_wrap() { "normal" } else { "nowrap" };
            heading.set_attr("style", format!("white-space: {}", wrap));
            heading.append_text(title);
        }
    }

    /// The non-interactive equivalent of this block. Identity by default.
    fn static_node(self: Arc<Self>) -> BlockRef {
        self.into_block_ref()
    }

    /// Applies `visitor` to this block. Composites override this to visit
    /// their children instead and rebuild themselves only on change.
    fn visit(self: Arc<Self>, visitor: &mut Visitor<'_>) -> Option<BlockRef> {
        visitor(self.into_block_ref())
    }
}

/// Replaces every block in the tree with its static equivalent.
pub fn to_static(block: &BlockRef) -> BlockRef {
    block
        .clone()
        .visit(&mut |b: BlockRef| Some(b.static_node()))
        .unwrap_or_else(|| block.clone())
}

/// Visits `children` in order. Returns the new child list if any child was
/// replaced or dropped, `None` if all came back unchanged.
pub fn visit_children(children: &[BlockRef], visitor: &mut Visitor<'_>) -> Option<Vec<BlockRef>> {
    let mut visited = Vec::with_capacity(children.len());
    let mut transformed = false;

    for child in children {
        match child.clone().visit(visitor) {
            Some(result) => {
                if !Arc::ptr_eq(&result, child) {
                    transformed = true;
                }
                visited.push(result);
            }
            None => transformed = true,
        }
    }

    transformed.then_some(visited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BlockOptions;
    use bloqs_types::IdStrategy;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct Unfinished {
        settings: BlockSettings,
    }

    impl Block for Unfinished {
        fn settings(&self) -> &BlockSettings {
            &self.settings
        }
    }

    #[derive(Debug)]
    struct Echo {
        settings: BlockSettings,
    }

    impl Block for Echo {
        fn settings(&self) -> &BlockSettings {
            &self.settings
        }

        fn write_contents(
            &self,
            container: &mut Element,
            cfg: &Cfg,
            _ctx: &mut RenderContext,
        ) -> Result<(), BlockError> {
            container.append_text(cfg.to_css_string());
            Ok(())
        }
    }

    fn ctx() -> RenderContext {
        RenderContext::new(IdStrategy::Sequential.generator(), false)
    }

    #[test]
    fn test_write_contents_not_implemented() {
        let block = Unfinished {
            settings: BlockSettings::default(),
        };
        let mut parent = Element::new("body");

        let result = block.write_block(&mut parent, &Cfg::new(), &mut ctx());
        assert!(matches!(result, Err(BlockError::NotImplemented("write_contents"))));
    }

    #[test]
    fn test_write_block_structure() {
        let block = Echo {
            settings: BlockOptions::new()
                .title("Totals")
                .title_level(2)
                .anchor("totals")
                .style("color", "red")
                .into(),
        };
        let mut parent = Element::new("body");
        block
            .write_block(&mut parent, &Cfg::from([("text_align", "right")]), &mut ctx())
            .unwrap();

        let container = parent.child_elements().next().unwrap();
        assert_eq!(container.tag(), "div");
        assert_eq!(container.attr("class"), Some("bloqs"));
        assert_eq!(container.attr("style"), Some("color:red;text-align:right"));

        let children: Vec<_> = container.child_elements().collect();
        assert_eq!(children[0].tag(), "a");
        assert_eq!(children[0].attr("name"), Some("totals"));
        assert_eq!(children[1].tag(), "h2");
        assert_eq!(children[1].attr("style"), Some("white-space: nowrap"));
        assert_eq!(children[1].text_content(), "Totals");
        assert!(container.text_content().ends_with("color:red;text-align:right"));
    }

    #[test]
    fn test_empty_title_not_written() {
        let block = Echo {
            settings: BlockOptions::new().title("").title_wrap(true).into(),
        };
        let mut parent = Element::new("body");
        block.write_block(&mut parent, &Cfg::new(), &mut ctx()).unwrap();

        let container = parent.child_elements().next().unwrap();
        assert!(container.find("h3").is_none());
        assert_eq!(container.attr("style"), None);
    }

    #[test]
    fn test_static_node_default_is_identity() {
        let block: BlockRef = Arc::new(Echo {
            settings: BlockSettings::default(),
        });
        let converted = to_static(&block);
        assert!(Arc::ptr_eq(&block, &converted));
    }

    #[test]
    fn test_visit_children_unchanged_returns_none() {
        let children: Vec<BlockRef> = vec![
            Arc::new(Echo { settings: BlockSettings::default() }),
            Arc::new(Echo { settings: BlockSettings::default() }),
        ];
        assert!(visit_children(&children, &mut |b| Some(b)).is_none());
    }

    #[test]
    fn test_visit_children_drop_counts_as_change() {
        let keep: BlockRef = Arc::new(Echo { settings: BlockSettings::default() });
        let drop: BlockRef = Arc::new(Unfinished { settings: BlockSettings::default() });
        let drop_id = drop.settings().id().clone();

        let visited = visit_children(&[keep.clone(), drop], &mut |b| {
            (b.settings().id() != &drop_id).then_some(b)
        })
        .unwrap();

        assert_eq!(visited.len(), 1);
        assert!(Arc::ptr_eq(&visited[0], &keep));
    }

    #[test]
    fn test_untracked_context_ignores_resources() {
        let mut ctx = RenderContext::untracked(IdStrategy::Sequential.generator());
        ctx.register(crate::resources::DEFAULT_CSS_MAIN.clone());
        assert!(ctx.resources().is_none());
        assert_eq!(ctx.next_id(), "bloqs_id_0");
    }
}
