//! Horizontal divider.

use crate::block::{Block, RenderContext};
use crate::error::BlockError;
use crate::settings::{BlockOptions, BlockSettings};
use bloqs_idf::Element;
use bloqs_style::Cfg;

/// Draws a horizontal divider line.
///
/// Writes a bare `<hr>` into its parent: no container, title or styling.
#[derive(Debug, Clone, Default)]
pub struct HRule {
    settings: BlockSettings,
}

impl HRule {
    pub fn new() -> Self {
        Self::with_options(BlockOptions::default())
    }

    pub fn with_options(options: BlockOptions) -> Self {
        Self {
            settings: options.into(),
        }
    }
}

impl Block for HRule {
    fn settings(&self) -> &BlockSettings {
        &self.settings
    }

    fn write_block(
        &self,
        parent: &mut Element,
        _parent_cfg: &Cfg,
        _ctx: &mut RenderContext,
    ) -> Result<(), BlockError> {
        parent.append("hr");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloqs_types::IdStrategy;

    #[test]
    fn test_hrule_writes_bare_hr() {
        let rule = HRule::with_options(BlockOptions::new().title("ignored").style("color", "red"));
        let mut body = Element::new("body");
        let mut ctx = RenderContext::untracked(IdStrategy::Sequential.generator());
        rule.write_block(&mut body, &Cfg::from([("color", "blue")]), &mut ctx)
            .unwrap();

        let children: Vec<_> = body.child_elements().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].tag(), "hr");
        assert_eq!(children[0].attrs().count(), 0);
    }
}
