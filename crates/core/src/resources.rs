//! Script and stylesheet dependencies.
//!
//! Blocks declare the resources they need; a [`DependencyTracker`] collects
//! them during one render walk, dropping duplicates by name, and the renderer
//! writes each one into the document head exactly once.

use bloqs_idf::Element;
use bloqs_traits::{AssetError, AssetProvider};
use bloqs_types::ResourceName;
use indexmap::IndexMap;
use indexmap::map::{Entry, Values};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

/// A named script or style that is written into the document head.
pub trait Resource: Send + Sync + fmt::Debug {
    /// Deduplication key. Two resources with the same name are the same resource.
    fn name(&self) -> &ResourceName;

    /// Emits the resource into `head`.
    fn write(&self, head: &mut Element);
}

pub type ResourceRef = Arc<dyn Resource>;

// Name of a file-backed resource: the file name without its extension.
fn stem_name(file_name: &str) -> ResourceName {
    let file_part_start = file_name.rfind('/').map(|i| i + 1).unwrap_or(0);
    match file_name[file_part_start..].rfind('.') {
        Some(dot) if dot > 0 => ResourceName::from(&file_name[..file_part_start + dot]),
        _ => ResourceName::from(file_name),
    }
}

/// An inline stylesheet.
#[derive(Debug, Clone)]
pub struct Css {
    name: ResourceName,
    content: String,
}

impl Css {
    pub fn inline(content: impl Into<String>, name: impl Into<ResourceName>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Loads `file_name` (`.css` appended when missing) through `provider`.
    pub fn from_asset(provider: &dyn AssetProvider, file_name: &str) -> Result<Self, AssetError> {
        Ok(Self {
            name: stem_name(file_name),
            content: provider.load_text(file_name, "css")?,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Resource for Css {
    fn name(&self) -> &ResourceName {
        &self.name
    }

    fn write(&self, head: &mut Element) {
        let style = head.append("style");
        style.set_attr("type", "text/css");
        style.append_raw(self.content.as_str());
    }
}

/// An inline script, guarded so that including it twice is harmless.
#[derive(Debug, Clone)]
pub struct JScript {
    name: ResourceName,
    content: String,
}

impl JScript {
    pub fn inline(content: impl Into<String>, name: impl Into<ResourceName>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Loads `file_name` (`.js` appended when missing) through `provider`.
    pub fn from_asset(provider: &dyn AssetProvider, file_name: &str) -> Result<Self, AssetError> {
        Ok(Self {
            name: stem_name(file_name),
            content: provider.load_text(file_name, "js")?,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    fn sentinel_var(&self) -> String {
        format!("_bloqs_load_sentinel_{}", self.name.as_str().replace('-', "_"))
    }

    /// The script body wrapped in its load sentinel.
    pub fn guarded_source(&self) -> String {
        let sentinel = self.sentinel_var();
        format!(
            "if(typeof({0}) == 'undefined'){{{1}{0} = true;}}",
            sentinel, self.content
        )
    }
}

impl Resource for JScript {
    fn name(&self) -> &ResourceName {
        &self.name
    }

    fn write(&self, head: &mut Element) {
        let script = head.append("script");
        script.set_attr("type", "text/javascript");
        script.append_raw(self.guarded_source());
    }
}

/// Stylesheet every document includes.
pub static DEFAULT_CSS_MAIN: Lazy<ResourceRef> = Lazy::new(|| {
    Arc::new(Css::inline(
        include_str!("../assets/main.css"),
        "bloqs_default_main",
    ))
});

/// Script helpers (wait handles, print poller) written into every document.
pub static SCRIPT_BLOCK_CORE: Lazy<ResourceRef> =
    Lazy::new(|| Arc::new(JScript::inline(include_str!("../assets/block-core.js"), "block-core")));

/// An insertion-ordered set of resources, deduplicated by name.
#[derive(Debug, Clone, Default)]
pub struct DependencyTracker {
    resources: IndexMap<ResourceName, ResourceRef>,
}

impl DependencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker pre-seeded with the base stylesheet.
    pub fn with_default_css() -> Self {
        let mut tracker = Self::new();
        tracker.add(DEFAULT_CSS_MAIN.clone());
        tracker
    }

    /// Adds `resource` unless one with the same name is already tracked.
    /// Returns true if it was added.
    pub fn add(&mut self, resource: ResourceRef) -> bool {
        match self.resources.entry(resource.name().clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(resource);
                true
            }
        }
    }

    pub fn extend<I: IntoIterator<Item = ResourceRef>>(&mut self, resources: I) {
        for resource in resources {
            self.add(resource);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(&ResourceName::from(name))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resources in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceRef> {
        self.resources.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.resources.keys().map(ResourceName::as_str).collect()
    }

    /// Writes every resource into `head`, in order.
    pub fn write_all(&self, head: &mut Element) {
        for resource in self.resources.values() {
            resource.write(head);
        }
    }
}

impl<'a> IntoIterator for &'a DependencyTracker {
    type Item = &'a ResourceRef;
    type IntoIter = Values<'a, ResourceName, ResourceRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.values()
    }
}
