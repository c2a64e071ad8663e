//! # bloqs-core
//!
//! Composable HTML document blocks.
//!
//! A document is a tree of [`Block`]s. Leaves hold content (text, markdown,
//! tables, images); composites ([`Flow`], [`VStack`], [`Grid`], [`BoxBlock`])
//! arrange their children. Styling is expressed as [`Cfg`] maps that cascade
//! from parent to child during rendering, and every block type can declare
//! the scripts and stylesheets it needs in the document head.
//!
//! Plain values become blocks through the dispatch registry:
//!
//! ```ignore
//! use bloqs_core::{block, render_html, Grid, BlockOptions, RenderOptions};
//!
//! let grid = Grid::new(vec!["Hello", "World"], BlockOptions::new())?.cols(2);
//! let html = render_html(&grid, &RenderOptions::default())?;
//! ```
//!
//! This crate performs no filesystem access. File-backed assets go through
//! [`AssetProvider`]; writing and converting output lives in the `bloqs`
//! crate.

pub use bloqs_idf as idf;
pub use bloqs_style as style;
pub use bloqs_traits as traits;
pub use bloqs_types as types;

pub mod block;
pub mod code;
pub mod collapsible;
pub mod dispatch;
pub mod error;
pub mod image;
pub mod layout;
pub mod render;
pub mod resources;
pub mod rule;
pub mod settings;
pub mod table;
pub mod text;
pub mod wrap;

pub use block::{AsBlockRef, Block, BlockRef, RenderContext, Visitor, to_static, visit_children};
pub use code::Code;
pub use collapsible::Collapsible;
pub use dispatch::{
    BlockConstructor, BlockRegistry, Content, ContentKind, ContentMatcher, CustomContent,
    NestedBlock, add_block_types, block, configure_default_registry, default_registry, resolve,
    resolve_with,
};
pub use error::BlockError;
pub use image::{ImageBlock, ImageData};
pub use layout::{Flow, Grid, VStack, blockify, blockify_with};
pub use render::{
    RenderOptions, render_document, render_document_with, render_fragment, render_html,
};
pub use resources::{Css, DependencyTracker, JScript, Resource, ResourceRef};
pub use rule::HRule;
pub use settings::{BlockOptions, BlockSettings};
pub use table::{TableBlock, TableData};
pub use text::{Markdown, Pre, Raw, Span};
pub use wrap::BoxBlock;

pub use bloqs_style::{Cfg, CfgError, CfgValue};
pub use bloqs_traits::{AssetError, AssetProvider};
pub use bloqs_types::{BlockId, IdGenerator, IdStrategy};
