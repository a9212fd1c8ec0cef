//! Typed pandoc JSON AST for marginalia.
//!
//! Pandoc hands JSON filters a serialized document tree. This crate models that
//! tree with serde types and walks it in document order so a filter can rewrite
//! individual nodes:
//!
//! - [`Document`], [`Block`], [`Inline`], [`MetaValue`]: the pandoc API 1.23 node types
//! - [`walk`]: bottom-up traversal with splice-in replacements ([`Rewrite`])
//! - [`stringify`]: plain text of inline content
//!
//! # Example
//!
//! ```
//! use marginalia_ast::{Block, Document, Inline, Rewrite, Visitor, walk};
//!
//! struct DropCode;
//!
//! impl Visitor for DropCode {
//!     type Error = std::convert::Infallible;
//!
//!     fn visit_block(&mut self, block: &Block) -> Result<Rewrite<Block>, Self::Error> {
//!         Ok(match block {
//!             Block::CodeBlock(..) => Rewrite::Suppressed,
//!             _ => Rewrite::Unchanged,
//!         })
//!     }
//!
//!     fn visit_inline(&mut self, _inline: &Inline) -> Result<Rewrite<Inline>, Self::Error> {
//!         Ok(Rewrite::Unchanged)
//!     }
//! }
//!
//! let json = r#"{"pandoc-api-version":[1,23,1],"meta":{},
//!     "blocks":[{"t":"CodeBlock","c":[["",[],[]],"x = 1"]}]}"#;
//! let mut doc = Document::from_json(json).unwrap();
//! walk(&mut doc, &mut DropCode).unwrap();
//! assert!(doc.blocks.is_empty());
//! ```

mod document;
mod node;
mod text;
mod walk;

pub use document::{Document, Meta, MetaValue};
pub use node::{
    Attr, Block, Caption, Cell, ColSpec, Format, Inline, ListAttributes, Row, TableBody,
    TableFoot, TableHead, Target,
};
pub use text::stringify;
pub use walk::{Rewrite, Visitor, walk, walk_blocks, walk_inlines};

/// Error reading or writing a pandoc JSON document.
#[derive(Debug, thiserror::Error)]
pub enum AstError {
    /// Malformed JSON or a node shape that does not match the pandoc schema.
    #[error("invalid pandoc JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The document was produced by a pandoc whose API this crate does not model.
    #[error("unsupported pandoc API version {found} (need 1.23 or newer)")]
    ApiVersion {
        /// Version found in the document, dotted.
        found: String,
    },
}
