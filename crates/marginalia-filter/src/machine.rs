//! Annotation state machine.
//!
//! The machine consumes annotation markers in document order and decides for
//! each one whether it produces output. It has two layers:
//!
//! - **Block layer**: open block annotations and the block-comment flag. In
//!   print mode a block comment hides everything up to its close. Block tags
//!   may overlap, so a block close is not matched against the opens.
//! - **Inline layer**: open inline annotations and the color stack. In print
//!   mode comments and margin notes hide their text; highlights and fix-me
//!   notes only lose their markers.
//!
//! The layers are tied together by one rule: every inline annotation must be
//! closed before a block annotation closes.
//!
//! Nesting errors are detected before any state changes, so a failed call
//! leaves the machine as it was.

use marginalia_ast::{Block, Inline, Rewrite};

use crate::backend::{MarkerContext, RenderBackend};
use crate::error::FilterError;
use crate::state::{PassContext, RegionId};
use crate::tag::{
    BlockCategory, BlockTag, InlineDirective, InlineInstruction, InlineTag, Marker,
};

/// Nesting state machine for one document pass.
#[derive(Debug, Default)]
pub struct AnnotationMachine {
    draft: bool,
    context: PassContext,
}

impl AnnotationMachine {
    /// Create a machine for a draft or print pass.
    #[must_use]
    pub fn new(draft: bool) -> Self {
        Self {
            draft,
            context: PassContext::default(),
        }
    }

    pub fn context(&self) -> &PassContext {
        &self.context
    }

    /// Whether a print-mode block comment is hiding everything.
    pub fn hiding_blocks(&self) -> bool {
        !self.draft && self.context.in_block_comment()
    }

    /// Active suppression region, if output is being hidden.
    pub fn region(&self) -> Option<RegionId> {
        self.context.region()
    }

    /// Process a block annotation marker.
    pub fn block_tag<B: RenderBackend>(
        &mut self,
        tag: BlockTag,
    ) -> Result<Rewrite<Block>, FilterError> {
        if self.hiding_blocks() {
            if tag.is(BlockCategory::Comment, Marker::Close) {
                self.context.remove_block(BlockCategory::Comment);
                self.context.set_block_comment(false);
                if self.context.hidden_from().is_none() {
                    self.context.end_region();
                }
            }
            return Ok(Rewrite::Suppressed);
        }

        match tag.marker {
            Marker::Open => self.open_block::<B>(tag),
            Marker::Close => self.close_block::<B>(tag),
        }
    }

    fn open_block<B: RenderBackend>(
        &mut self,
        tag: BlockTag,
    ) -> Result<Rewrite<Block>, FilterError> {
        if tag.category == BlockCategory::Comment {
            if self.context.in_block_comment() {
                return Err(FilterError::NestedBlockComment {
                    found: tag.to_string(),
                });
            }
            self.context.set_block_comment(true);
            self.context.push_block(tag.category);
            if !self.draft {
                if self.context.region().is_none() {
                    self.context.begin_region();
                }
                return Ok(Rewrite::Suppressed);
            }
        } else {
            self.context.push_block(tag.category);
        }

        self.context.push_color_for(tag.category);
        Ok(block_output::<B>(tag, self.context.current_color()))
    }

    fn close_block<B: RenderBackend>(
        &mut self,
        tag: BlockTag,
    ) -> Result<Rewrite<Block>, FilterError> {
        if let Some(open) = self.context.innermost_inline() {
            return Err(FilterError::UnclosedInline {
                open: InlineTag::open(open).to_string(),
                found: tag.to_string(),
            });
        }

        // Block tags delimit runs of blocks and may overlap; closes are not
        // matched against the opens.
        if !self.context.remove_block(tag.category) {
            tracing::debug!(tag = %tag, "Block annotation closed without being opened");
        }
        if tag.category == BlockCategory::Comment {
            self.context.set_block_comment(false);
            if !self.draft {
                return Ok(Rewrite::Suppressed);
            }
        }
        let restore_color = self.context.pop_color_for(tag.category);
        Ok(block_output::<B>(tag, restore_color))
    }

    /// Process a recognized raw inline.
    pub fn inline_instruction<B: RenderBackend>(
        &mut self,
        instruction: &InlineInstruction,
    ) -> Result<Rewrite<Inline>, FilterError> {
        match instruction {
            InlineInstruction::Annotation(tag) => self.inline_tag::<B>(*tag),
            InlineInstruction::Directive(directive) => Ok(self.directive::<B>(directive)),
        }
    }

    fn inline_tag<B: RenderBackend>(
        &mut self,
        tag: InlineTag,
    ) -> Result<Rewrite<Inline>, FilterError> {
        let highlight_before = self.context.highlight_active();

        let restore_color = match tag.marker {
            Marker::Open => {
                let depth = self.context.inline_depth();
                self.context.push_inline(tag.category);
                self.context.push_color_for(tag.category);
                if !self.draft
                    && tag.category.hides_content()
                    && self.context.hidden_from().is_none()
                {
                    self.context.set_hidden_from(Some(depth));
                    self.context.begin_region();
                }
                self.context.current_color()
            }
            Marker::Close => {
                match self.context.innermost_inline() {
                    None => {
                        return Err(FilterError::UnmatchedClose {
                            found: tag.to_string(),
                        });
                    }
                    Some(open) if open != tag.category => {
                        return Err(FilterError::NestingMismatch {
                            open: InlineTag::open(open).to_string(),
                            found: tag.to_string(),
                        });
                    }
                    Some(_) => {}
                }
                self.context.pop_inline();
                let restore_color = self.context.pop_color_for(tag.category);
                if self.context.hidden_from() == Some(self.context.inline_depth()) {
                    self.context.set_hidden_from(None);
                    self.context.end_region();
                }
                restore_color
            }
        };

        // Print mode drops every inline marker; hidden regions drop their text too.
        if !self.draft {
            return Ok(Rewrite::Suppressed);
        }

        let context = MarkerContext {
            highlight_before,
            highlight_after: self.context.highlight_active(),
            restore_color,
        };
        let mut out = String::new();
        B::inline_marker(tag, &context, &mut out);
        Ok(raw_inline::<B>(out))
    }

    fn directive<B: RenderBackend>(&self, directive: &InlineDirective) -> Rewrite<Inline> {
        if self.context.hidden_from().is_some() {
            return Rewrite::Suppressed;
        }
        let mut out = String::new();
        B::directive(directive, &mut out);
        raw_inline::<B>(out)
    }

    /// Report annotations left open at the end of the document.
    pub fn finish(&self) {
        for &category in self.context.open_blocks() {
            tracing::warn!(tag = %BlockTag::open(category), "Block annotation is never closed");
        }
        for &category in self.context.open_inlines() {
            tracing::warn!(tag = %InlineTag::open(category), "Inline annotation is never closed");
        }
    }
}

fn raw_fragment<B: RenderBackend>(text: String) -> Option<Inline> {
    match B::RAW_FORMAT {
        Some(format) if !text.is_empty() => Some(Inline::raw(format, text)),
        _ => None,
    }
}

fn raw_inline<B: RenderBackend>(text: String) -> Rewrite<Inline> {
    raw_fragment::<B>(text).map_or(Rewrite::Suppressed, Rewrite::with)
}

fn block_output<B: RenderBackend>(tag: BlockTag, restore_color: &str) -> Rewrite<Block> {
    let mut out = String::new();
    B::block_marker(tag, restore_color, &mut out);
    raw_fragment::<B>(out).map_or(Rewrite::Suppressed, |fragment| {
        Rewrite::with(B::block(fragment))
    })
}
