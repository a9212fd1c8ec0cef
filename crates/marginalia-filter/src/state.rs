//! Per-pass annotation state.
//!
//! All stacks start empty (the color stack holds the base color) at the start
//! of a document pass and are dropped with it.

use crate::tag::{BlockCategory, Category, InlineCategory};

/// Color active outside every annotation.
pub const BASE_COLOR: &str = "black";

/// Identifier of a suppression region, unique within a pass.
pub type RegionId = u64;

/// Nesting state of one document pass.
#[derive(Debug)]
pub struct PassContext {
    /// Inside a block comment (non-draft: its content is being dropped).
    block_comment: bool,
    /// Open block annotations, innermost last.
    block_tags: Vec<BlockCategory>,
    /// Open inline annotations, innermost last.
    inline_tags: Vec<InlineCategory>,
    /// Colors to restore, innermost last. Seeded with [`BASE_COLOR`].
    colors: Vec<&'static str>,
    /// Inline stack depth at which a non-draft hidden region was opened.
    hidden_from: Option<usize>,
    /// Active suppression region.
    region: Option<RegionId>,
    /// Last region identifier handed out.
    last_region: RegionId,
}

impl Default for PassContext {
    fn default() -> Self {
        Self {
            block_comment: false,
            block_tags: Vec::new(),
            inline_tags: Vec::new(),
            colors: vec![BASE_COLOR],
            hidden_from: None,
            region: None,
            last_region: 0,
        }
    }
}

impl PassContext {
    pub fn in_block_comment(&self) -> bool {
        self.block_comment
    }

    pub fn set_block_comment(&mut self, active: bool) {
        self.block_comment = active;
    }

    pub fn push_block(&mut self, category: BlockCategory) {
        self.block_tags.push(category);
    }

    /// Forget the innermost open block tag of `category`, if any.
    ///
    /// Block closes are not required to nest, so the entry need not be last.
    pub fn remove_block(&mut self, category: BlockCategory) -> bool {
        match self.block_tags.iter().rposition(|&open| open == category) {
            Some(index) => {
                self.block_tags.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn innermost_inline(&self) -> Option<InlineCategory> {
        self.inline_tags.last().copied()
    }

    pub fn inline_depth(&self) -> usize {
        self.inline_tags.len()
    }

    pub fn push_inline(&mut self, category: InlineCategory) {
        self.inline_tags.push(category);
    }

    pub fn pop_inline(&mut self) -> Option<InlineCategory> {
        self.inline_tags.pop()
    }

    /// Whether a highlight is open at any depth.
    pub fn highlight_active(&self) -> bool {
        self.inline_tags.contains(&InlineCategory::Highlight)
    }

    /// Color that is active now.
    pub fn current_color(&self) -> &'static str {
        self.colors.last().copied().unwrap_or(BASE_COLOR)
    }

    /// Push the color of an opening annotation.
    ///
    /// Highlight keeps the current color, since its typeset form wraps text
    /// instead of switching color. Categories without a color push nothing.
    pub fn push_color_for<C: Category>(&mut self, category: C) {
        if category.keeps_color() {
            self.colors.push(self.current_color());
        } else if let Some(color) = category.color() {
            self.colors.push(color);
        }
    }

    /// Pop the color of a closing annotation and return the color now active.
    pub fn pop_color_for<C: Category>(&mut self, category: C) -> &'static str {
        if (category.keeps_color() || category.color().is_some()) && self.colors.len() > 1 {
            self.colors.pop();
        }
        self.current_color()
    }

    pub fn color_depth(&self) -> usize {
        self.colors.len()
    }

    pub fn hidden_from(&self) -> Option<usize> {
        self.hidden_from
    }

    pub fn set_hidden_from(&mut self, depth: Option<usize>) {
        self.hidden_from = depth;
    }

    /// Start a new suppression region.
    pub fn begin_region(&mut self) {
        self.last_region += 1;
        self.region = Some(self.last_region);
    }

    pub fn end_region(&mut self) {
        self.region = None;
    }

    pub fn region(&self) -> Option<RegionId> {
        self.region
    }

    /// Open block tags, outermost first.
    pub fn open_blocks(&self) -> &[BlockCategory] {
        &self.block_tags
    }

    /// Open inline tags, outermost first.
    pub fn open_inlines(&self) -> &[InlineCategory] {
        &self.inline_tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_color_stack_restores_previous() {
        let mut context = PassContext::default();

        context.push_color_for(InlineCategory::Comment);
        context.push_color_for(InlineCategory::FixMe);
        assert_eq!(context.current_color(), "cyan");

        assert_eq!(context.pop_color_for(InlineCategory::FixMe), "red");
        assert_eq!(context.pop_color_for(InlineCategory::Comment), BASE_COLOR);
        assert_eq!(context.color_depth(), 1);
    }

    #[test]
    fn test_highlight_copies_current_color() {
        let mut context = PassContext::default();
        context.push_color_for(InlineCategory::Margin);

        context.push_color_for(InlineCategory::Highlight);

        assert_eq!(context.current_color(), "red");
        assert_eq!(context.color_depth(), 3);
    }

    #[test]
    fn test_colorless_block_pushes_nothing() {
        let mut context = PassContext::default();

        context.push_color_for(BlockCategory::Center);

        assert_eq!(context.color_depth(), 1);
        assert_eq!(context.pop_color_for(BlockCategory::Center), BASE_COLOR);
    }

    #[test]
    fn test_base_color_never_popped() {
        let mut context = PassContext::default();

        assert_eq!(context.pop_color_for(InlineCategory::Comment), BASE_COLOR);
        assert_eq!(context.color_depth(), 1);
    }

    #[test]
    fn test_remove_block_takes_innermost_match() {
        let mut context = PassContext::default();
        context.push_block(BlockCategory::Box);
        context.push_block(BlockCategory::Center);
        context.push_block(BlockCategory::Box);

        assert!(context.remove_block(BlockCategory::Center));
        assert!(!context.remove_block(BlockCategory::Speaker));

        assert_eq!(context.open_blocks(), [BlockCategory::Box, BlockCategory::Box]);
    }

    #[test]
    fn test_regions_get_fresh_ids() {
        let mut context = PassContext::default();

        context.begin_region();
        let first = context.region();
        context.end_region();
        context.begin_region();

        assert!(first.is_some());
        assert_ne!(context.region(), first);
    }
}
