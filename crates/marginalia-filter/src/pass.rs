//! Document walk driving the annotation machine.

use std::marker::PhantomData;

use marginalia_ast::{Block, Inline, Rewrite, Visitor};

use crate::backend::RenderBackend;
use crate::error::FilterError;
use crate::figure::{FigureContext, is_figure};
use crate::machine::AnnotationMachine;
use crate::state::RegionId;
use crate::tag::{BlockTag, InlineInstruction};

/// Raw format whose content is scanned for tags.
const TAG_FORMAT: &str = "html";

/// Text of the first inline in a paragraph that asks for no indentation.
const NO_INDENT_SENTINEL: &str = "<";

/// One filtering pass over a document for backend `B`.
pub struct Pass<'a, B> {
    machine: AnnotationMachine,
    figures: Option<FigureContext<'a>>,
    /// Suppression region active when each open ancestor was entered.
    entered: Vec<Option<RegionId>>,
    backend: PhantomData<B>,
}

impl<'a, B: RenderBackend> Pass<'a, B> {
    pub fn new(machine: AnnotationMachine, figures: Option<FigureContext<'a>>) -> Self {
        Self {
            machine,
            figures,
            entered: Vec::new(),
            backend: PhantomData,
        }
    }

    /// Report state left over at the end of the document.
    pub fn finish(&self) {
        self.machine.finish();
    }

    /// Whether the node being visited lies entirely inside the active region.
    fn leave(&mut self) -> bool {
        let entered = self.entered.pop().flatten();
        entered.is_some() && entered == self.machine.region()
    }

    fn no_indent(content: &[Inline]) -> Option<Block> {
        match content {
            [Inline::Str(text), Inline::Space | Inline::SoftBreak, rest @ ..]
                if text == NO_INDENT_SENTINEL =>
            {
                Some(Block::Para(B::no_indent(rest.to_vec())))
            }
            _ => None,
        }
    }
}

impl<B: RenderBackend> Visitor for Pass<'_, B> {
    type Error = FilterError;

    fn enter_block(&mut self, _block: &Block) {
        self.entered.push(self.machine.region());
    }

    fn enter_inline(&mut self, _inline: &Inline) {
        self.entered.push(self.machine.region());
    }

    fn visit_block(&mut self, block: &Block) -> Result<Rewrite<Block>, FilterError> {
        let hidden = self.leave();

        if let Block::RawBlock(format, text) = block
            && format.is(TAG_FORMAT)
            && let Some(tag) = BlockTag::parse(text)
        {
            return self.machine.block_tag::<B>(tag);
        }

        if hidden {
            return Ok(Rewrite::Suppressed);
        }

        match block {
            Block::Para(content) => {
                Ok(Self::no_indent(content).map_or(Rewrite::Unchanged, Rewrite::with))
            }
            Block::CodeBlock(attr, code) if is_figure(attr, code) => match &self.figures {
                Some(figures) => Ok(Rewrite::with(figures.replace(attr, code)?)),
                None => {
                    tracing::debug!(
                        id = %attr.identifier,
                        "No figure renderer configured, keeping code block"
                    );
                    Ok(Rewrite::Unchanged)
                }
            },
            _ => Ok(Rewrite::Unchanged),
        }
    }

    fn visit_inline(&mut self, inline: &Inline) -> Result<Rewrite<Inline>, FilterError> {
        let hidden = self.leave();

        if self.machine.hiding_blocks() {
            return Ok(Rewrite::Suppressed);
        }

        if let Inline::RawInline(format, text) = inline
            && format.is(TAG_FORMAT)
            && let Some(instruction) = InlineInstruction::parse(text)
        {
            return self.machine.inline_instruction::<B>(&instruction);
        }

        if hidden {
            return Ok(Rewrite::Suppressed);
        }
        Ok(Rewrite::Unchanged)
    }
}
