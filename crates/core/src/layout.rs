//! Composite layout blocks.
//!
//! Each layout resolves its raw children through the dispatcher once, at
//! construction, and owns the resulting blocks. At write time a layout
//! either cascades its resolved config into its children or, with
//! `cascade_cfg` off, hands them an empty one.

use crate::block::{AsBlockRef, Block, BlockRef, RenderContext, Visitor, visit_children};
use crate::dispatch::{BlockRegistry, Content, default_registry, resolve_with};
use crate::error::BlockError;
use crate::settings::{BlockOptions, BlockSettings};
use bloqs_idf::Element;
use bloqs_style::Cfg;
use std::sync::Arc;

pub const GRID_ROW_CLASS: &str = "bloqs-grid-row";
pub const GRID_CELL_CLASS: &str = "bloqs-grid-cell";

/// Resolves every item with default options through the process-wide registry.
pub fn blockify<I>(contents: I) -> Result<Vec<BlockRef>, BlockError>
where
    I: IntoIterator,
    I::Item: Into<Content>,
{
    blockify_with(&default_registry(), contents)
}

/// Resolves every item with default options through `registry`.
pub fn blockify_with<I>(
    registry: &BlockRegistry,
    contents: I,
) -> Result<Vec<BlockRef>, BlockError>
where
    I: IntoIterator,
    I::Item: Into<Content>,
{
    contents
        .into_iter()
        .map(|item| resolve_with(registry, item, BlockOptions::default()))
        .collect()
}

fn child_cfg<'a>(cascade: bool, actual_cfg: &'a Cfg, empty: &'a Cfg) -> &'a Cfg {
    if cascade { actual_cfg } else { empty }
}

macro_rules! composite_visit {
    () => {
        fn visit(self: Arc<Self>, visitor: &mut Visitor<'_>) -> Option<BlockRef> {
            match visit_children(&self.children, visitor) {
                Some(children) => {
                    let mut copy = (*self).clone();
                    copy.children = children;
                    Some(Arc::new(copy))
                }
                None => Some(self.into_block_ref()),
            }
        }
    };
}
pub(crate) use composite_visit;

/// Lays its children out one after another in the same container.
#[derive(Debug, Clone)]
pub struct Flow {
    settings: BlockSettings,
    children: Vec<BlockRef>,
    cascade_cfg: bool,
}

impl Flow {
    pub fn new<I>(contents: I, options: BlockOptions) -> Result<Self, BlockError>
    where
        I: IntoIterator,
        I::Item: Into<Content>,
    {
        Ok(Self::from_blocks(blockify(contents)?, options))
    }

    /// Like `new`, resolving the contents through `registry`.
    pub fn new_with<I>(
        registry: &BlockRegistry,
        contents: I,
        options: BlockOptions,
    ) -> Result<Self, BlockError>
    where
        I: IntoIterator,
        I::Item: Into<Content>,
    {
        Ok(Self::from_blocks(blockify_with(registry, contents)?, options))
    }

    pub fn from_blocks(children: Vec<BlockRef>, options: BlockOptions) -> Self {
        Self {
            settings: options.into(),
            children,
            cascade_cfg: true,
        }
    }

    /// Toggles passing this block's resolved config on to the children.
    pub fn cascade_cfg(mut self, cascade: bool) -> Self {
        self.cascade_cfg = cascade;
        self
    }

    pub fn children(&self) -> &[BlockRef] {
        &self.children
    }
}

impl Block for Flow {
    fn settings(&self) -> &BlockSettings {
        &self.settings
    }

    fn write_contents(
        &self,
        container: &mut Element,
        cfg: &Cfg,
        ctx: &mut RenderContext,
    ) -> Result<(), BlockError> {
        let empty = Cfg::new();
        let cfg = child_cfg(self.cascade_cfg, cfg, &empty);
        for child in &self.children {
            child.write_block(container, cfg, ctx)?;
        }
        Ok(())
    }

    composite_visit!();
}

/// Stacks its children vertically, one per row.
#[derive(Debug, Clone)]
pub struct VStack {
    settings: BlockSettings,
    children: Vec<BlockRef>,
    cascade_cfg: bool,
}

impl VStack {
    pub fn new<I>(contents: I, options: BlockOptions) -> Result<Self, BlockError>
    where
        I: IntoIterator,
        I::Item: Into<Content>,
    {
        Ok(Self::from_blocks(blockify(contents)?, options))
    }

    /// Like `new`, resolving the contents through `registry`.
    pub fn new_with<I>(
        registry: &BlockRegistry,
        contents: I,
        options: BlockOptions,
    ) -> Result<Self, BlockError>
    where
        I: IntoIterator,
        I::Item: Into<Content>,
    {
        Ok(Self::from_blocks(blockify_with(registry, contents)?, options))
    }

    pub fn from_blocks(children: Vec<BlockRef>, options: BlockOptions) -> Self {
        Self {
            settings: options.into(),
            children,
            cascade_cfg: true,
        }
    }

    pub fn cascade_cfg(mut self, cascade: bool) -> Self {
        self.cascade_cfg = cascade;
        self
    }

    pub fn children(&self) -> &[BlockRef] {
        &self.children
    }
}

impl Block for VStack {
    fn settings(&self) -> &BlockSettings {
        &self.settings
    }

    fn write_contents(
        &self,
        container: &mut Element,
        cfg: &Cfg,
        ctx: &mut RenderContext,
    ) -> Result<(), BlockError> {
        let empty = Cfg::new();
        let cfg = child_cfg(self.cascade_cfg, cfg, &empty);
        for child in &self.children {
            let cell = container.append("div");
            child.write_block(cell, cfg, ctx)?;
        }
        Ok(())
    }

    composite_visit!();
}

/// Lays its children out in rows of `cols` floating cells.
#[derive(Debug, Clone)]
pub struct Grid {
    settings: BlockSettings,
    children: Vec<BlockRef>,
    cols: usize,
    cascade_cfg: bool,
}

impl Grid {
    /// A single-column grid.
    pub fn new<I>(contents: I, options: BlockOptions) -> Result<Self, BlockError>
    where
        I: IntoIterator,
        I::Item: Into<Content>,
    {
        Ok(Self::from_blocks(blockify(contents)?, options))
    }

    /// Like `new`, resolving the contents through `registry`.
    pub fn new_with<I>(
        registry: &BlockRegistry,
        contents: I,
        options: BlockOptions,
    ) -> Result<Self, BlockError>
    where
        I: IntoIterator,
        I::Item: Into<Content>,
    {
        Ok(Self::from_blocks(blockify_with(registry, contents)?, options))
    }

    /// A grid with one row holding every child side by side.
    pub fn hstack<I>(contents: I, options: BlockOptions) -> Result<Self, BlockError>
    where
        I: IntoIterator,
        I::Item: Into<Content>,
    {
        let grid = Self::new(contents, options)?;
        let cols = grid.children.len();
        Ok(grid.cols(cols))
    }

    pub fn from_blocks(children: Vec<BlockRef>, options: BlockOptions) -> Self {
        Self {
            settings: options.into(),
            children,
            cols: 1,
            cascade_cfg: true,
        }
    }

    /// Sets the column count. Zero is treated as one.
    pub fn cols(mut self, cols: usize) -> Self {
        self.cols = cols.max(1);
        self
    }

    pub fn cascade_cfg(mut self, cascade: bool) -> Self {
        self.cascade_cfg = cascade;
        self
    }

    pub fn children(&self) -> &[BlockRef] {
        &self.children
    }

    pub fn col_count(&self) -> usize {
        self.cols
    }

    /// Number of rows needed for the current children.
    pub fn row_count(&self) -> usize {
        self.children.len().div_ceil(self.cols)
    }

    /// Width of one cell, in percent of the grid width.
    pub fn cell_width(&self) -> f64 {
        100.0 / self.cols.min(self.children.len()).max(1) as f64
    }
}

impl Block for Grid {
    fn settings(&self) -> &BlockSettings {
        &self.settings
    }

    fn write_contents(
        &self,
        container: &mut Element,
        cfg: &Cfg,
        ctx: &mut RenderContext,
    ) -> Result<(), BlockError> {
        if self.children.is_empty() {
            return Ok(());
        }

        let empty = Cfg::new();
        let cfg = child_cfg(self.cascade_cfg, cfg, &empty);
        let cell_style = format!("width:{:.6}%;float:left;", self.cell_width());

        for (row_i, row) in self.children.chunks(self.cols).enumerate() {
            let row_el = container.append("div");
            row_el.set_attr("class", GRID_ROW_CLASS);
            if row_i > 0 {
                row_el.set_attr("style", "clear:both");
            }

            for child in row {
                let cell_el = row_el.append("div");
                cell_el.set_attr("style", cell_style.as_str());
                cell_el.set_attr("class", GRID_CELL_CLASS);
                child.write_block(cell_el, cfg, ctx)?;
            }
        }

        // Clear the floats.
        container.append("div").set_attr("style", "clear:both");
        Ok(())
    }

    composite_visit!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Raw;
    use bloqs_types::IdStrategy;
    use pretty_assertions::assert_eq;

    fn write(block: &dyn Block, parent_cfg: &Cfg) -> Element {
        let mut body = Element::new("body");
        let mut ctx = RenderContext::untracked(IdStrategy::Sequential.generator());
        block.write_block(&mut body, parent_cfg, &mut ctx).unwrap();
        body
    }

    fn container(body: &Element) -> &Element {
        body.child_elements().next().unwrap()
    }

    fn rows(grid_el: &Element) -> Vec<&Element> {
        grid_el
            .child_elements()
            .filter(|el| el.has_class(GRID_ROW_CLASS))
            .collect()
    }

    #[test]
    fn test_grid_row_arithmetic() {
        let grid = Grid::new((0..7).map(|i| format!("c{i}")), BlockOptions::new())
            .unwrap()
            .cols(3);
        assert_eq!(grid.row_count(), 3);

        let body = write(&grid, &Cfg::new());
        let rows = rows(container(&body));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].child_elements().count(), 3);
        assert_eq!(rows[2].child_elements().count(), 1);
        assert_eq!(rows[0].attr("style"), None);
        assert_eq!(rows[1].attr("style"), Some("clear:both"));

        let cell = rows[0].child_elements().next().unwrap();
        assert_eq!(cell.attr("style"), Some("width:33.333333%;float:left;"));
        assert!(cell.has_class(GRID_CELL_CLASS));
    }

    #[test]
    fn test_grid_trailing_clear() {
        let grid = Grid::new(["a", "b"], BlockOptions::new()).unwrap();
        let body = write(&grid, &Cfg::new());
        let last = container(&body).child_elements().last().unwrap();
        assert_eq!(last.attr("style"), Some("clear:both"));
        assert!(!last.has_class(GRID_ROW_CLASS));
    }

    #[test]
    fn test_empty_grid_emits_nothing() {
        let grid = Grid::new(Vec::<&str>::new(), BlockOptions::new()).unwrap().cols(3);
        assert_eq!(grid.row_count(), 0);

        let body = write(&grid, &Cfg::new());
        assert_eq!(container(&body).child_elements().count(), 0);
    }

    #[test]
    fn test_cell_width_uses_fewer_children_than_cols() {
        let grid = Grid::new(["a", "b"], BlockOptions::new()).unwrap().cols(4);
        assert_eq!(grid.cell_width(), 50.0);
    }

    #[test]
    fn test_hstack_puts_everything_in_one_row() {
        let stack = Grid::hstack(["a", "b", "c", "d"], BlockOptions::new()).unwrap();
        assert_eq!(stack.col_count(), 4);
        assert_eq!(stack.row_count(), 1);
        assert_eq!(stack.cell_width(), 25.0);
    }

    #[test]
    fn test_flow_writes_children_into_same_container() {
        let flow = Flow::new(["a", "b"], BlockOptions::new()).unwrap();
        let body = write(&flow, &Cfg::new());
        let children: Vec<_> = container(&body).child_elements().collect();
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.has_class("bloqs")));
    }

    #[test]
    fn test_vstack_wraps_each_child() {
        let stack = VStack::new(["a", "b", "c"], BlockOptions::new()).unwrap();
        let body = write(&stack, &Cfg::new());
        let rows: Vec<_> = container(&body).child_elements().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.attr("class").is_none()));
        assert_eq!(rows[1].text_content(), "b");
    }

    #[test]
    fn test_cascade_toggle() {
        let ancestor_cfg = Cfg::from([("color", "red")]);

        let cascading = VStack::new(["x"], BlockOptions::new()).unwrap();
        let body = write(&cascading, &ancestor_cfg);
        let child = container(&body).find_by_class("bloqs")[0];
        assert_eq!(child.attr("style"), Some("color:red"));

        let isolated = VStack::new(["x"], BlockOptions::new()).unwrap().cascade_cfg(false);
        let body = write(&isolated, &ancestor_cfg);
        let stack_el = container(&body);
        assert_eq!(stack_el.attr("style"), Some("color:red"));
        let child = stack_el.find_by_class("bloqs")[0];
        assert_eq!(child.attr("style"), None);
    }

    #[test]
    fn test_composite_visit_shares_structure() {
        let grid: BlockRef = Arc::new(Grid::new(["a", "b"], BlockOptions::new()).unwrap());
        let same = grid.clone().visit(&mut |b| Some(b)).unwrap();
        assert!(Arc::ptr_eq(&grid, &same));
    }

    #[test]
    fn test_composite_visit_drops_and_replaces() {
        let first = Arc::new(Raw::new("keep", BlockOptions::new())) as BlockRef;
        let second = Arc::new(Raw::new("drop", BlockOptions::new())) as BlockRef;
        let drop_id = second.settings().id().clone();
        let flow: BlockRef = Arc::new(Flow::from_blocks(vec![first.clone(), second], BlockOptions::new()));

        let visited = flow
            .clone()
            .visit(&mut |b| (b.settings().id() != &drop_id).then_some(b))
            .unwrap();
        assert!(!Arc::ptr_eq(&flow, &visited));
        assert_eq!(visited.settings().id(), flow.settings().id());

        let body = write(visited.as_ref(), &Cfg::new());
        assert_eq!(body.text_content(), "keep");
    }

    #[test]
    fn test_nested_sequences_become_grids() {
        let outer = Grid::new(vec![Content::from(vec!["a", "b"]), Content::from("c")], BlockOptions::new())
            .unwrap();
        let body = write(&outer, &Cfg::new());
        // Outer grid: two rows; the first holds an inner grid with its own rows.
        assert_eq!(container(&body).find_by_class(GRID_ROW_CLASS).len(), 4);
    }
}
