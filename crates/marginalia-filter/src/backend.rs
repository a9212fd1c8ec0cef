//! Render backend trait for format-specific output.
//!
//! The annotation machine decides *whether* a marker produces output; the
//! backend decides *what* it produces. Each backend carries the full fragment
//! table for its format as exhaustive matches, so every tag has a defined
//! rendering in every format.

use marginalia_ast::{Block, Inline};
use marginalia_figures::FigureFormat;

use crate::tag::{BlockTag, InlineDirective, InlineTag};

/// Nesting context an inline marker is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerContext<'a> {
    /// A highlight was open before this marker.
    pub highlight_before: bool,
    /// A highlight is still open after this marker.
    pub highlight_after: bool,
    /// Color on top of the color stack after this marker.
    pub restore_color: &'a str,
}

/// Backend trait for format-specific rendering operations.
///
/// Implementations provide:
/// - Fragment tables for block and inline annotation markers
/// - Cross-reference directives
/// - The no-indent paragraph form
pub trait RenderBackend {
    /// Raw format of emitted fragments, `None` when the writer gets no markup.
    const RAW_FORMAT: Option<&'static str>;

    /// File type of generated figures.
    const FIGURE_FORMAT: FigureFormat;

    /// Fragment for a block annotation marker.
    fn block_fragment(tag: BlockTag) -> &'static str;

    /// Fragment for an inline annotation marker.
    fn inline_fragment(tag: InlineTag) -> &'static str;

    /// Render a block marker.
    ///
    /// Default emits the table fragment.
    fn block_marker(tag: BlockTag, _restore_color: &str, out: &mut String) {
        out.push_str(Self::block_fragment(tag));
    }

    /// Render an inline marker.
    ///
    /// Default emits the table fragment. Formats whose markers interact with
    /// the surrounding state (color switches) override this.
    fn inline_marker(tag: InlineTag, _context: &MarkerContext<'_>, out: &mut String) {
        out.push_str(Self::inline_fragment(tag));
    }

    /// Render a directive. Writing nothing drops it.
    fn directive(directive: &InlineDirective, out: &mut String);

    /// Block carrying rendered block-marker text.
    fn block(fragment: Inline) -> Block {
        Block::Plain(vec![fragment])
    }

    /// Content of a paragraph whose leading `< ` sentinel was removed.
    fn no_indent(content: Vec<Inline>) -> Vec<Inline> {
        content
    }
}

/// Escape text for use inside an HTML attribute.
pub(crate) fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
