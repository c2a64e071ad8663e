//! Resolution of arbitrary content into blocks.
//!
//! [`resolve`] is the single entry point for building a block tree from
//! heterogeneous input. It consults a [`BlockRegistry`] first, in
//! registration order, and falls back to built-in rules for text, existing
//! blocks and null content.
//!
//! The process-wide default registry is meant to be configured at startup.
//! Registering types while a render is in flight on another thread is not
//! supported.

use crate::block::{AsBlockRef, Block, BlockRef, RenderContext, Visitor};
use crate::error::BlockError;
use crate::image::{ImageBlock, ImageData};
use crate::layout::Grid;
use crate::settings::{BlockOptions, BlockSettings};
use crate::table::{TableBlock, TableData};
use crate::text::Raw;
use bloqs_idf::Element;
use bloqs_style::Cfg;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A value of a user-defined type, carried through dispatch type-erased.
#[derive(Clone)]
pub struct CustomContent {
    value: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl CustomContent {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for CustomContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomContent")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Anything that can be turned into a block.
#[derive(Debug, Clone)]
pub enum Content {
    Text(String),
    Block(BlockRef),
    Table(TableData),
    Image(ImageData),
    Sequence(Vec<Content>),
    Null,
    Custom(CustomContent),
}

/// The category of a [`Content`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Text,
    Block,
    Table,
    Image,
    Sequence,
    Null,
    Custom,
}

impl Content {
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Content::Custom(CustomContent::new(value))
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Content::Text(_) => ContentKind::Text,
            Content::Block(_) => ContentKind::Block,
            Content::Table(_) => ContentKind::Table,
            Content::Image(_) => ContentKind::Image,
            Content::Sequence(_) => ContentKind::Sequence,
            Content::Null => ContentKind::Null,
            Content::Custom(_) => ContentKind::Custom,
        }
    }

    /// Name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Content::Text(_) => "text",
            Content::Block(_) => "block",
            Content::Table(_) => "table",
            Content::Image(_) => "image",
            Content::Sequence(_) => "sequence",
            Content::Null => "null",
            Content::Custom(custom) => custom.type_name(),
        }
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<BlockRef> for Content {
    fn from(block: BlockRef) -> Self {
        Content::Block(block)
    }
}

impl<T: Block + 'static> From<T> for Content {
    fn from(block: T) -> Self {
        Content::Block(Arc::new(block))
    }
}

impl From<TableData> for Content {
    fn from(table: TableData) -> Self {
        Content::Table(table)
    }
}

impl From<ImageData> for Content {
    fn from(image: ImageData) -> Self {
        Content::Image(image)
    }
}

impl<T: Into<Content>> From<Vec<T>> for Content {
    fn from(items: Vec<T>) -> Self {
        Content::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Content>> From<Option<T>> for Content {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Content::Null)
    }
}

/// What a registry entry matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentMatcher {
    Kind(ContentKind),
    /// A concrete custom content type.
    Type(TypeId),
}

impl ContentMatcher {
    pub fn of<T: Any>() -> Self {
        ContentMatcher::Type(TypeId::of::<T>())
    }

    pub fn matches(&self, content: &Content) -> bool {
        match (self, content) {
            (ContentMatcher::Kind(kind), content) => content.kind() == *kind,
            (ContentMatcher::Type(id), Content::Custom(custom)) => custom.type_id() == *id,
            (ContentMatcher::Type(_), _) => false,
        }
    }
}

impl From<ContentKind> for ContentMatcher {
    fn from(kind: ContentKind) -> Self {
        ContentMatcher::Kind(kind)
    }
}

/// Builds a block from matched content and the caller's options.
///
/// The registry argument is the one the content is being resolved with;
/// constructors of composite blocks resolve nested content through it.
pub type BlockConstructor =
    Arc<dyn Fn(&BlockRegistry, Content, BlockOptions) -> Result<BlockRef, BlockError> + Send + Sync>;

/// Ordered mapping from content matchers to block constructors.
#[derive(Clone, Default)]
pub struct BlockRegistry {
    entries: IndexMap<ContentMatcher, BlockConstructor>,
}

impl fmt::Debug for BlockRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

impl BlockRegistry {
    /// An empty registry: only the built-in fallbacks apply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequences to grids, tables to table blocks, images to image blocks.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ContentKind::Sequence, |registry, content, options| {
            Ok(Arc::new(Grid::new_with(registry, sequence_items(content)?, options)?) as BlockRef)
        });
        registry.register(ContentKind::Table, |_, content, options| match content {
            Content::Table(table) => Ok(Arc::new(TableBlock::new(table, options)) as BlockRef),
            other => Err(mismatch("table", &other)),
        });
        registry.register(ContentKind::Image, |_, content, options| match content {
            Content::Image(image) => Ok(Arc::new(ImageBlock::new(image, options)?) as BlockRef),
            other => Err(mismatch("image", &other)),
        });
        registry
    }

    /// Maps `matcher` to `constructor`. An existing entry for the same matcher
    /// is replaced in place and keeps its position.
    pub fn register<F>(&mut self, matcher: impl Into<ContentMatcher>, constructor: F)
    where
        F: Fn(&BlockRegistry, Content, BlockOptions) -> Result<BlockRef, BlockError>
            + Send
            + Sync
            + 'static,
    {
        let matcher = matcher.into();
        log::debug!("Registering block constructor for {:?}", matcher);
        self.entries.insert(matcher, Arc::new(constructor));
    }

    /// Registers a constructor for the custom content type `T`.
    pub fn register_type<T, F>(&mut self, constructor: F)
    where
        T: Any + Send + Sync,
        F: Fn(&T, BlockOptions) -> Result<BlockRef, BlockError> + Send + Sync + 'static,
    {
        self.register(ContentMatcher::of::<T>(), move |_, content, options| match &content {
            Content::Custom(custom) => match custom.downcast_ref::<T>() {
                Some(value) => constructor(value, options),
                None => Err(mismatch(std::any::type_name::<T>(), &content)),
            },
            other => Err(mismatch(std::any::type_name::<T>(), other)),
        });
    }

    /// First constructor whose matcher accepts `content`.
    pub fn lookup(&self, content: &Content) -> Option<BlockConstructor> {
        self.entries
            .iter()
            .find(|(matcher, _)| matcher.matches(content))
            .map(|(_, constructor)| constructor.clone())
    }

    pub fn matchers(&self) -> impl Iterator<Item = &ContentMatcher> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn mismatch(expected: &str, content: &Content) -> BlockError {
    BlockError::InvalidContent(format!(
        "expected {} content but got {}",
        expected,
        content.type_name()
    ))
}

fn sequence_items(content: Content) -> Result<Vec<Content>, BlockError> {
    match content {
        Content::Sequence(items) => Ok(items),
        other => Err(mismatch("sequence", &other)),
    }
}

static DEFAULT_REGISTRY: Lazy<RwLock<BlockRegistry>> =
    Lazy::new(|| RwLock::new(BlockRegistry::with_defaults()));

fn registry_read() -> RwLockReadGuard<'static, BlockRegistry> {
    DEFAULT_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn registry_write() -> RwLockWriteGuard<'static, BlockRegistry> {
    DEFAULT_REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Registers `constructor` for every matcher in the process-wide registry.
pub fn add_block_types<I, M, F>(matchers: I, constructor: F)
where
    I: IntoIterator<Item = M>,
    M: Into<ContentMatcher>,
    F: Fn(&BlockRegistry, Content, BlockOptions) -> Result<BlockRef, BlockError>
        + Send
        + Sync
        + 'static,
{
    let constructor: BlockConstructor = Arc::new(constructor);
    let mut registry = registry_write();
    for matcher in matchers {
        let constructor = constructor.clone();
        registry.register(matcher, move |resolving, content, options| {
            constructor(resolving, content, options)
        });
    }
}

/// Mutates the process-wide registry.
pub fn configure_default_registry(configure: impl FnOnce(&mut BlockRegistry)) {
    configure(&mut registry_write());
}

/// A snapshot of the process-wide registry.
pub fn default_registry() -> BlockRegistry {
    registry_read().clone()
}

/// Resolves `content` into a block using the process-wide registry.
///
/// The whole tree is resolved against one snapshot, so the lock is not held
/// while constructors run.
pub fn resolve(content: impl Into<Content>, options: BlockOptions) -> Result<BlockRef, BlockError> {
    resolve_with(&default_registry(), content, options)
}

/// Resolves `content` into a block using an explicit registry. Nested
/// content (sequence items, wrapped content) goes through the same registry.
pub fn resolve_with(
    registry: &BlockRegistry,
    content: impl Into<Content>,
    options: BlockOptions,
) -> Result<BlockRef, BlockError> {
    let content = content.into();
    match registry.lookup(&content) {
        Some(constructor) => {
            log::debug!("Resolving {} content through registry", content.type_name());
            constructor(registry, content, options)
        }
        None => fallback(content, options),
    }
}

/// Resolves `content` with default options.
pub fn block(content: impl Into<Content>) -> Result<BlockRef, BlockError> {
    resolve(content, BlockOptions::default())
}

fn fallback(content: Content, options: BlockOptions) -> Result<BlockRef, BlockError> {
    match content {
        Content::Text(text) => Ok(Arc::new(Raw::new(text, options))),
        Content::Null => Ok(Arc::new(Raw::new("", options))),
        Content::Block(block) if !options.has_title() => Ok(block),
        Content::Block(block) => Ok(Arc::new(NestedBlock::new(block, options))),
        other => Err(BlockError::UnrecognizedContent(other.type_name().to_string())),
    }
}

/// Adds a title (and styling) to an existing block without an extra container.
#[derive(Debug, Clone)]
pub struct NestedBlock {
    settings: BlockSettings,
    inner: BlockRef,
}

impl NestedBlock {
    pub fn new(inner: BlockRef, options: BlockOptions) -> Self {
        Self {
            settings: options.into(),
            inner,
        }
    }

    pub fn inner(&self) -> &BlockRef {
        &self.inner
    }
}

impl Block for NestedBlock {
    fn settings(&self) -> &BlockSettings {
        &self.settings
    }

    fn container_tag(&self) -> Option<&'static str> {
        None
    }

    fn write_contents(
        &self,
        container: &mut Element,
        cfg: &Cfg,
        ctx: &mut RenderContext,
    ) -> Result<(), BlockError> {
        self.inner.write_block(container, cfg, ctx)
    }

    fn visit(self: Arc<Self>, visitor: &mut Visitor<'_>) -> Option<BlockRef> {
        let inner = self.inner.clone().visit(visitor)?;
        if Arc::ptr_eq(&inner, &self.inner) {
            return Some(self.into_block_ref());
        }
        Some(Arc::new(NestedBlock {
            settings: self.settings.clone(),
            inner,
        }))
    }
}
