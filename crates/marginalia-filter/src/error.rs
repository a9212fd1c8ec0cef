//! Filter error types.

use marginalia_figures::FigureError;

use crate::caption::CaptionError;

/// Error that aborts a document pass.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// An inline close tag does not match the innermost open inline tag.
    #[error("closing tag {found} does not match opening tag {open}")]
    NestingMismatch { open: String, found: String },
    /// An inline close tag with no open inline tag.
    #[error("closing tag {found} has no matching opening tag")]
    UnmatchedClose { found: String },
    /// A block close while inline annotations are still open.
    #[error("inline tag {open} must be closed before block tag {found}")]
    UnclosedInline { open: String, found: String },
    /// A block comment opened inside another block comment.
    #[error("block comment {found} opened inside another block comment")]
    NestedBlockComment { found: String },
    /// Figure generation failed.
    #[error("figure generation failed: {0}")]
    Figure(#[from] FigureError),
    /// Caption conversion failed.
    #[error(transparent)]
    Caption(#[from] CaptionError),
}
