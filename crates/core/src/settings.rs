//! Construction-time block settings.
//!
//! Every block is built from a [`BlockOptions`] value (the builder callers
//! fill in) and keeps the resulting [`BlockSettings`] for its whole life.
//! Styling passed at construction is captured into the *cascading* config;
//! the anchor stays outside of it so it is never inherited.

use bloqs_style::{Cfg, CfgError, CfgValue, parse_css_declarations};
use bloqs_types::{AnchorId, BlockId};

/// Class attached to every block container.
pub const BASE_CLASS: &str = "bloqs";

/// Default heading level for block titles.
pub const DEFAULT_TITLE_LEVEL: u8 = 3;

/// Builder for the settings shared by all block types.
#[derive(Debug, Clone)]
pub struct BlockOptions {
    pub(crate) title: Option<String>,
    pub(crate) title_level: u8,
    pub(crate) title_wrap: bool,
    pub(crate) width: Option<String>,
    pub(crate) height: Option<String>,
    pub(crate) inherit_cfg: bool,
    pub(crate) styling: Cfg,
    pub(crate) styles: Cfg,
    pub(crate) classes: Vec<String>,
    pub(crate) anchor: Option<AnchorId>,
}

impl Default for BlockOptions {
    fn default() -> Self {
        Self {
            title: None,
            title_level: DEFAULT_TITLE_LEVEL,
            title_wrap: false,
            width: None,
            height: None,
            inherit_cfg: true,
            styling: Cfg::new(),
            styles: Cfg::new(),
            classes: Vec::new(),
            anchor: None,
        }
    }
}

impl BlockOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Heading level of the title, 1 being the biggest.
    pub fn title_level(mut self, level: u8) -> Self {
        self.title_level = level;
        self
    }

    pub fn title_wrap(mut self, wrap: bool) -> Self {
        self.title_wrap = wrap;
        self
    }

    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn height(mut self, height: impl Into<String>) -> Self {
        self.height = Some(height.into());
        self
    }

    /// When false, the block ignores its ancestors' resolved config.
    pub fn inherit_cfg(mut self, inherit: bool) -> Self {
        self.inherit_cfg = inherit;
        self
    }

    /// Adds a single styling entry, e.g. `style("text_align", "right")`.
    pub fn style(mut self, key: impl Into<String>, value: impl Into<CfgValue>) -> Self {
        self.styling.insert(key, value);
        self
    }

    /// Grouped styling. Wins over entries added with [`BlockOptions::style`].
    pub fn styles(mut self, styles: Cfg) -> Self {
        self.styles = self.styles.override_with(&styles);
        self
    }

    /// Grouped styling from an inline CSS declaration list such as
    /// `"text-align: right; color: red"`.
    pub fn css(self, declarations: &str) -> Result<Self, CfgError> {
        Ok(self.styles(parse_css_declarations(declarations)?))
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.extend(classes.into_iter().map(Into::into));
        self
    }

    pub fn anchor(mut self, anchor: impl Into<AnchorId>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn has_title(&self) -> bool {
        self.title.is_some()
    }
}

/// The settings a block captured at construction.
#[derive(Debug, Clone)]
pub struct BlockSettings {
    title: Option<String>,
    title_level: u8,
    title_wrap: bool,
    width: Option<String>,
    height: Option<String>,
    inherit_cfg: bool,
    cascading_cfg: Cfg,
    default_cfg: Cfg,
    classes: Vec<String>,
    anchor: Option<AnchorId>,
    id: BlockId,
}

impl BlockSettings {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn title_level(&self) -> u8 {
        self.title_level
    }

    pub fn title_wrap(&self) -> bool {
        self.title_wrap
    }

    pub fn width(&self) -> Option<&str> {
        self.width.as_deref()
    }

    pub fn height(&self) -> Option<&str> {
        self.height.as_deref()
    }

    pub fn inherit_cfg(&self) -> bool {
        self.inherit_cfg
    }

    pub fn cascading_cfg(&self) -> &Cfg {
        &self.cascading_cfg
    }

    pub fn default_cfg(&self) -> &Cfg {
        &self.default_cfg
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn anchor(&self) -> Option<&AnchorId> {
        self.anchor.as_ref()
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    /// Makes `defaults` part of the lowest-precedence fallback config.
    pub fn provide_default_cfg(&mut self, defaults: &Cfg) {
        self.default_cfg = self.default_cfg.inherit(defaults);
    }

    /// Resolves the config this block renders with.
    ///
    /// The cascading config inherits from `parent_cfg` only when inheritance
    /// is on; the defaults always fill any remaining gaps.
    pub fn combine_parent_cfg(&self, parent_cfg: &Cfg) -> Cfg {
        let actual = if self.inherit_cfg {
            self.cascading_cfg.inherit(parent_cfg)
        } else {
            self.cascading_cfg.clone()
        };
        actual.inherit(&self.default_cfg)
    }

    /// CSS for the container: the resolved config overridden by explicit sizing.
    pub fn styles_string(&self, actual_cfg: &Cfg) -> String {
        let mut sizing = Cfg::new();
        if let Some(width) = &self.width {
            sizing.insert("width", width.as_str());
        }
        if let Some(height) = &self.height {
            sizing.insert("height", height.as_str());
        }
        actual_cfg.override_with(&sizing).to_css_string()
    }
}

impl From<BlockOptions> for BlockSettings {
    fn from(options: BlockOptions) -> Self {
        let mut classes = Vec::with_capacity(options.classes.len() + 1);
        classes.push(BASE_CLASS.to_string());
        classes.extend(options.classes);

        Self {
            title: options.title,
            title_level: options.title_level,
            title_wrap: options.title_wrap,
            width: options.width,
            height: options.height,
            inherit_cfg: options.inherit_cfg,
            cascading_cfg: options.styling.override_with(&options.styles),
            default_cfg: Cfg::new(),
            classes,
            anchor: options.anchor,
            id: BlockId::generate(),
        }
    }
}

impl Default for BlockSettings {
    fn default() -> Self {
        BlockOptions::default().into()
    }
}
