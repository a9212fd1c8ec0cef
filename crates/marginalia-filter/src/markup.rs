//! HTML and reveal.js backends.
//!
//! Containers nest on their own, so markup markers need no knowledge of the
//! surrounding annotations.

use std::fmt::Write as _;

use marginalia_ast::Inline;
use marginalia_figures::FigureFormat;

use crate::backend::{RenderBackend, escape_attr};
use crate::tag::{BlockCategory, BlockTag, InlineCategory, InlineDirective, InlineTag, Marker};

/// HTML backend.
pub struct MarkupBackend;

/// reveal.js backend: HTML with speaker notes as presenter asides.
pub struct SlideBackend;

impl RenderBackend for MarkupBackend {
    const RAW_FORMAT: Option<&'static str> = Some("html");
    const FIGURE_FORMAT: FigureFormat = FigureFormat::Png;

    fn block_fragment(tag: BlockTag) -> &'static str {
        match (tag.category, tag.marker) {
            (BlockCategory::Comment | BlockCategory::Speaker, Marker::Open) => {
                r#"<div style="color: red;">"#
            }
            (BlockCategory::Box, Marker::Open) => {
                r#"<div style="border:1px solid black; padding:1.5ex;">"#
            }
            (BlockCategory::Center, Marker::Open) => r#"<div style="text-align:center;">"#,
            (_, Marker::Close) => "</div>",
        }
    }

    fn inline_fragment(tag: InlineTag) -> &'static str {
        match (tag.category, tag.marker) {
            (InlineCategory::Comment, Marker::Open) => r#"<span style="color: red;">"#,
            (InlineCategory::Highlight, Marker::Open) => "<mark>",
            (InlineCategory::Highlight, Marker::Close) => "</mark>",
            (InlineCategory::Margin, Marker::Open) => {
                r#"<span style="color: red; max-width:20%; border: 1px solid black; padding: 1ex; margin: 1ex; float:right; font-size: small;">"#
            }
            (InlineCategory::FixMe, Marker::Open) => concat!(
                r#"<span style="color: cyan; max-width:20%; border: 1px solid black; padding: 1ex; margin: 1ex; float:right; font-size: small;">"#,
                "Fix this!</span>",
                r#"<span style="color: cyan;">"#
            ),
            (InlineCategory::Comment | InlineCategory::Margin | InlineCategory::FixMe, Marker::Close) => {
                "</span>"
            }
        }
    }

    fn directive(directive: &InlineDirective, out: &mut String) {
        let _ = match directive {
            InlineDirective::IndexMark(_) => Ok(()),
            InlineDirective::Label(label) => {
                write!(out, r#"<a name="{}"></a>"#, escape_attr(label))
            }
            InlineDirective::Reference(label) | InlineDirective::PageReference(label) => {
                write!(out, r##"<a href="#{}">here</a>"##, escape_attr(label))
            }
        };
    }

    fn no_indent(content: Vec<Inline>) -> Vec<Inline> {
        let mut result = Vec::with_capacity(content.len() + 2);
        result.push(Inline::raw("html", r#"<div class="noindent">"#));
        result.extend(content);
        result.push(Inline::raw("html", "</div>"));
        result
    }
}

impl RenderBackend for SlideBackend {
    const RAW_FORMAT: Option<&'static str> = Some("html");
    const FIGURE_FORMAT: FigureFormat = FigureFormat::Png;

    fn block_fragment(tag: BlockTag) -> &'static str {
        match (tag.category, tag.marker) {
            (BlockCategory::Speaker, Marker::Open) => r#"<aside class="notes">"#,
            (BlockCategory::Speaker, Marker::Close) => "</aside>",
            _ => MarkupBackend::block_fragment(tag),
        }
    }

    fn inline_fragment(tag: InlineTag) -> &'static str {
        MarkupBackend::inline_fragment(tag)
    }

    fn directive(_directive: &InlineDirective, _out: &mut String) {}

    fn no_indent(content: Vec<Inline>) -> Vec<Inline> {
        MarkupBackend::no_indent(content)
    }
}
