//! LaTeX/beamer backend.
//!
//! The typeset highlight macro `\hl{...}` cannot contain a color switch, so
//! any marker inside an open highlight closes the highlight first and reopens
//! it afterwards. This interruption lives here and nowhere else.

use std::fmt::Write as _;

use marginalia_ast::{Block, Inline};
use marginalia_figures::FigureFormat;

use crate::backend::{MarkerContext, RenderBackend};
use crate::tag::{BlockCategory, BlockTag, Category, InlineCategory, InlineDirective, InlineTag, Marker};

const HIGHLIGHT_OPEN: &str = "\\hl{";
const HIGHLIGHT_CLOSE: &str = "}";

/// LaTeX backend.
pub struct TypesetBackend;

impl TypesetBackend {
    fn switch_color(color: &str, out: &mut String) {
        let _ = write!(out, "\\color{{{color}}}{{}}");
    }
}

impl RenderBackend for TypesetBackend {
    const RAW_FORMAT: Option<&'static str> = Some("latex");
    const FIGURE_FORMAT: FigureFormat = FigureFormat::Pdf;

    fn block_fragment(tag: BlockTag) -> &'static str {
        match (tag.category, tag.marker) {
            (BlockCategory::Comment | BlockCategory::Speaker, Marker::Open) => "\\color{red}{}",
            (BlockCategory::Comment | BlockCategory::Speaker, Marker::Close) => "",
            (BlockCategory::Box, Marker::Open) => {
                "\\medskip\\noindent\\fbox{\\begin{minipage}[t]{0.98\\columnwidth}"
            }
            (BlockCategory::Box, Marker::Close) => "\\end{minipage}}\\medskip{}",
            (BlockCategory::Center, Marker::Open) => "\\begin{center}",
            (BlockCategory::Center, Marker::Close) => "\\end{center}",
        }
    }

    fn inline_fragment(tag: InlineTag) -> &'static str {
        match (tag.category, tag.marker) {
            (InlineCategory::Comment, Marker::Open) => "\\color{red}{}",
            (InlineCategory::Highlight, Marker::Open) => HIGHLIGHT_OPEN,
            (InlineCategory::Highlight, Marker::Close) => HIGHLIGHT_CLOSE,
            (InlineCategory::Margin, Marker::Open) => "\\marginpar{\\footnotesize{\\color{red}{}",
            (InlineCategory::Margin, Marker::Close) => "}}",
            (InlineCategory::FixMe, Marker::Open) => {
                "\\marginpar{\\footnotesize{\\color{cyan}{}Fix this!}}\\color{cyan}{}"
            }
            (InlineCategory::Comment | InlineCategory::FixMe, Marker::Close) => "",
        }
    }

    fn block_marker(tag: BlockTag, restore_color: &str, out: &mut String) {
        out.push_str(Self::block_fragment(tag));
        if tag.marker == Marker::Close && tag.category.color().is_some() {
            Self::switch_color(restore_color, out);
        }
    }

    fn inline_marker(tag: InlineTag, context: &MarkerContext<'_>, out: &mut String) {
        if context.highlight_before && !tag.is(InlineCategory::Highlight, Marker::Close) {
            out.push_str(HIGHLIGHT_CLOSE);
        }
        out.push_str(Self::inline_fragment(tag));
        if tag.marker == Marker::Close {
            Self::switch_color(context.restore_color, out);
        }
        if context.highlight_after && !tag.is(InlineCategory::Highlight, Marker::Open) {
            out.push_str(HIGHLIGHT_OPEN);
        }
    }

    fn directive(directive: &InlineDirective, out: &mut String) {
        let _ = match directive {
            InlineDirective::IndexMark(text) => write!(out, "\\index{{{text}}}"),
            InlineDirective::Label(label) => write!(out, "\\label{{{label}}}"),
            InlineDirective::Reference(label) => write!(out, "\\cref{{{label}}}"),
            InlineDirective::PageReference(label) => write!(out, "\\cpageref{{{label}}}"),
        };
    }

    fn block(fragment: Inline) -> Block {
        Block::Para(vec![fragment])
    }

    fn no_indent(content: Vec<Inline>) -> Vec<Inline> {
        let mut result = Vec::with_capacity(content.len() + 1);
        result.push(Inline::raw("latex", "\\noindent{}"));
        result.extend(content);
        result
    }
}
