//! Bottom-up document traversal.
//!
//! The walker visits nodes in document order, children before their parent,
//! and splices each visit result back into the parent's node list. A parent is
//! therefore visited with the already-rewritten children.

use crate::document::Document;
use crate::node::{Block, Caption, Inline, Row};

/// Outcome of visiting one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Rewrite<T> {
    /// Keep the node as it is.
    Unchanged,
    /// Remove the node from the output.
    Suppressed,
    /// Replace the node with zero or more nodes.
    Replace(Vec<T>),
}

impl<T> Rewrite<T> {
    /// Replace the node with a single node.
    #[must_use]
    pub fn with(node: T) -> Self {
        Self::Replace(vec![node])
    }
}

/// Callbacks invoked by [`walk`].
///
/// `enter_*` is called before a node's children are walked, `visit_*` after.
/// For leaf nodes the two calls are back to back.
pub trait Visitor {
    /// Error that aborts the walk.
    type Error;

    /// Called before the children of `block` are walked.
    fn enter_block(&mut self, _block: &Block) {}

    /// Called before the children of `inline` are walked.
    fn enter_inline(&mut self, _inline: &Inline) {}

    /// Decide what to do with a block whose children have been walked.
    fn visit_block(&mut self, block: &Block) -> Result<Rewrite<Block>, Self::Error>;

    /// Decide what to do with an inline whose children have been walked.
    fn visit_inline(&mut self, inline: &Inline) -> Result<Rewrite<Inline>, Self::Error>;
}

/// Walk every block of `doc`. Metadata is not visited.
pub fn walk<V: Visitor + ?Sized>(doc: &mut Document, visitor: &mut V) -> Result<(), V::Error> {
    walk_blocks(&mut doc.blocks, visitor)
}

/// Walk a block list in place.
pub fn walk_blocks<V: Visitor + ?Sized>(
    blocks: &mut Vec<Block>,
    visitor: &mut V,
) -> Result<(), V::Error> {
    let original = std::mem::take(blocks);
    let mut rewritten = Vec::with_capacity(original.len());

    for mut block in original {
        visitor.enter_block(&block);
        walk_block_children(&mut block, visitor)?;
        match visitor.visit_block(&block)? {
            Rewrite::Unchanged => rewritten.push(block),
            Rewrite::Suppressed => {}
            Rewrite::Replace(nodes) => rewritten.extend(nodes),
        }
    }

    *blocks = rewritten;
    Ok(())
}

/// Walk an inline list in place.
pub fn walk_inlines<V: Visitor + ?Sized>(
    inlines: &mut Vec<Inline>,
    visitor: &mut V,
) -> Result<(), V::Error> {
    let original = std::mem::take(inlines);
    let mut rewritten = Vec::with_capacity(original.len());

    for mut inline in original {
        visitor.enter_inline(&inline);
        walk_inline_children(&mut inline, visitor)?;
        match visitor.visit_inline(&inline)? {
            Rewrite::Unchanged => rewritten.push(inline),
            Rewrite::Suppressed => {}
            Rewrite::Replace(nodes) => rewritten.extend(nodes),
        }
    }

    *inlines = rewritten;
    Ok(())
}

fn walk_block_children<V: Visitor + ?Sized>(
    block: &mut Block,
    visitor: &mut V,
) -> Result<(), V::Error> {
    match block {
        Block::Plain(inlines) | Block::Para(inlines) | Block::Header(_, _, inlines) => {
            walk_inlines(inlines, visitor)
        }
        Block::LineBlock(lines) => {
            for line in lines {
                walk_inlines(line, visitor)?;
            }
            Ok(())
        }
        Block::BlockQuote(blocks) | Block::Div(_, blocks) => walk_blocks(blocks, visitor),
        Block::OrderedList(_, items) | Block::BulletList(items) => {
            for item in items {
                walk_blocks(item, visitor)?;
            }
            Ok(())
        }
        Block::DefinitionList(entries) => {
            for (term, definitions) in entries {
                walk_inlines(term, visitor)?;
                for definition in definitions {
                    walk_blocks(definition, visitor)?;
                }
            }
            Ok(())
        }
        Block::Table(_, caption, _, head, bodies, foot) => {
            walk_caption(caption, visitor)?;
            walk_rows(&mut head.1, visitor)?;
            for body in bodies {
                walk_rows(&mut body.2, visitor)?;
                walk_rows(&mut body.3, visitor)?;
            }
            walk_rows(&mut foot.1, visitor)
        }
        Block::Figure(_, caption, blocks) => {
            walk_caption(caption, visitor)?;
            walk_blocks(blocks, visitor)
        }
        Block::CodeBlock(..) | Block::RawBlock(..) | Block::HorizontalRule => Ok(()),
    }
}

fn walk_inline_children<V: Visitor + ?Sized>(
    inline: &mut Inline,
    visitor: &mut V,
) -> Result<(), V::Error> {
    match inline {
        Inline::Emph(content)
        | Inline::Underline(content)
        | Inline::Strong(content)
        | Inline::Strikeout(content)
        | Inline::Superscript(content)
        | Inline::Subscript(content)
        | Inline::SmallCaps(content)
        | Inline::Quoted(_, content)
        | Inline::Cite(_, content)
        | Inline::Link(_, content, _)
        | Inline::Image(_, content, _)
        | Inline::Span(_, content) => walk_inlines(content, visitor),
        Inline::Note(blocks) => walk_blocks(blocks, visitor),
        Inline::Str(_)
        | Inline::Code(..)
        | Inline::Space
        | Inline::SoftBreak
        | Inline::LineBreak
        | Inline::Math(..)
        | Inline::RawInline(..) => Ok(()),
    }
}

fn walk_caption<V: Visitor + ?Sized>(
    caption: &mut Caption,
    visitor: &mut V,
) -> Result<(), V::Error> {
    if let Some(short) = &mut caption.0 {
        walk_inlines(short, visitor)?;
    }
    walk_blocks(&mut caption.1, visitor)
}

fn walk_rows<V: Visitor + ?Sized>(rows: &mut [Row], visitor: &mut V) -> Result<(), V::Error> {
    for (_, cells) in rows {
        for cell in cells {
            walk_blocks(&mut cell.4, visitor)?;
        }
    }
    Ok(())
}
