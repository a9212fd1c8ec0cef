//! Diagram code blocks.
//!
//! A code block is a figure when it has the `tikz` class or contains a
//! `tikzpicture` environment:
//!
//! ````markdown
//! ~~~ {.tikz #fig:flow caption="My *great* caption" tikzlibrary="arrows"}
//! \begin{tikzpicture}
//! \draw[->] (0,0) -- (1,1);
//! \end{tikzpicture}
//! ~~~
//! ````

use marginalia_ast::{Attr, Block, Inline};
use marginalia_figures::{FigureFormat, FigureRequest, FigureResolver};

use crate::caption::CaptionFormatter;
use crate::error::FilterError;

const FIGURE_CLASS: &str = "tikz";
const ENVIRONMENT_MARKER: &str = "\\begin{tikzpicture}";
const CAPTION_ATTR: &str = "caption";
const LIBRARY_ATTR: &str = "tikzlibrary";

/// Whether a code block holds diagram code.
#[must_use]
pub fn is_figure(attr: &Attr, code: &str) -> bool {
    attr.has_class(FIGURE_CLASS) || code.contains(ENVIRONMENT_MARKER)
}

/// Everything needed to turn a figure code block into an image.
pub struct FigureContext<'a> {
    pub resolver: &'a dyn FigureResolver,
    pub captions: &'a dyn CaptionFormatter,
    pub font: &'a str,
    pub format: FigureFormat,
}

impl FigureContext<'_> {
    /// Render the code block and build the paragraph that replaces it.
    ///
    /// The image keeps the code block's identifier, classes and attributes;
    /// its title is the raw caption text.
    pub fn replace(&self, attr: &Attr, code: &str) -> Result<Block, FilterError> {
        let caption = attr.get(CAPTION_ATTR).unwrap_or_default();
        let request = FigureRequest {
            code,
            font: self.font,
            libraries: attr.get(LIBRARY_ATTR).unwrap_or_default(),
            format: self.format,
        };

        let path = self.resolver.resolve(&request)?;
        let content = if caption.trim().is_empty() {
            Vec::new()
        } else {
            self.captions.to_inlines(caption)?
        };

        Ok(Block::Para(vec![Inline::Image(
            attr.clone(),
            content,
            (path.to_string_lossy().into_owned(), caption.to_owned()),
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::{CaptionError, PlainCaptions};
    use marginalia_figures::FigureError;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Resolver that records requests and returns a fixed directory.
    #[derive(Default)]
    struct FakeResolver {
        requests: RefCell<Vec<(String, String, String, FigureFormat)>>,
    }

    impl FigureResolver for FakeResolver {
        fn resolve(&self, request: &FigureRequest<'_>) -> Result<PathBuf, FigureError> {
            self.requests.borrow_mut().push((
                request.code.to_owned(),
                request.font.to_owned(),
                request.libraries.to_owned(),
                request.format,
            ));
            Ok(PathBuf::from(format!("figures/fig.{}", request.format.extension())))
        }
    }

    struct FailingCaptions;

    impl CaptionFormatter for FailingCaptions {
        fn to_inlines(&self, markdown: &str) -> Result<Vec<Inline>, CaptionError> {
            Err(CaptionError {
                caption: markdown.to_owned(),
                message: "converter missing".to_owned(),
            })
        }
    }

    fn attr(classes: &[&str], attributes: &[(&str, &str)]) -> Attr {
        Attr {
            identifier: "fig:a".to_owned(),
            classes: classes.iter().map(|c| (*c).to_owned()).collect(),
            attributes: attributes
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }

    #[test]
    fn test_is_figure() {
        assert!(is_figure(&attr(&["tikz"], &[]), "\\draw;"));
        assert!(is_figure(&attr(&[], &[]), "\\begin{tikzpicture}\\end{tikzpicture}"));
        assert!(!is_figure(&attr(&["python"], &[]), "print()"));
    }

    #[test]
    fn test_replace_builds_image_paragraph() {
        let resolver = FakeResolver::default();
        let context = FigureContext {
            resolver: &resolver,
            captions: &PlainCaptions,
            font: "libertine",
            format: FigureFormat::Pdf,
        };
        let attr = attr(&["tikz"], &[("caption", "Flow chart"), ("tikzlibrary", "arrows")]);

        let block = context.replace(&attr, "\\draw;").unwrap();

        assert_eq!(
            block,
            Block::Para(vec![Inline::Image(
                attr.clone(),
                vec![
                    Inline::Str("Flow".to_owned()),
                    Inline::Space,
                    Inline::Str("chart".to_owned())
                ],
                ("figures/fig.pdf".to_owned(), "Flow chart".to_owned()),
            )])
        );
        assert_eq!(
            resolver.requests.borrow()[0],
            (
                "\\draw;".to_owned(),
                "libertine".to_owned(),
                "arrows".to_owned(),
                FigureFormat::Pdf
            )
        );
    }

    #[test]
    fn test_missing_caption_skips_formatter() {
        let resolver = FakeResolver::default();
        let context = FigureContext {
            resolver: &resolver,
            captions: &FailingCaptions,
            font: "garamondx",
            format: FigureFormat::Png,
        };

        let block = context.replace(&attr(&["tikz"], &[]), "x").unwrap();

        let Block::Para(content) = block else {
            panic!("expected paragraph");
        };
        assert!(matches!(&content[0], Inline::Image(_, caption, _) if caption.is_empty()));
    }

    #[test]
    fn test_caption_failure_is_error() {
        let resolver = FakeResolver::default();
        let context = FigureContext {
            resolver: &resolver,
            captions: &FailingCaptions,
            font: "garamondx",
            format: FigureFormat::Png,
        };

        let err = context
            .replace(&attr(&["tikz"], &[("caption", "Hi")]), "x")
            .unwrap_err();

        assert!(matches!(err, FilterError::Caption(_)));
    }
}
