//! Backend for writers without raw markup support.

use marginalia_figures::FigureFormat;

use crate::backend::RenderBackend;
use crate::tag::{BlockTag, InlineDirective, InlineTag};

/// Backend for docx, odt and other writers: every marker renders to nothing.
pub struct PlainBackend;

impl RenderBackend for PlainBackend {
    const RAW_FORMAT: Option<&'static str> = None;
    const FIGURE_FORMAT: FigureFormat = FigureFormat::Png;

    fn block_fragment(_tag: BlockTag) -> &'static str {
        ""
    }

    fn inline_fragment(_tag: InlineTag) -> &'static str {
        ""
    }

    fn directive(_directive: &InlineDirective, _out: &mut String) {}
}
