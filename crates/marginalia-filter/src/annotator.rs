//! Document-level entry point.

use marginalia_ast::{Document, walk};
use marginalia_figures::{DEFAULT_FONT, FigureResolver};

use crate::backend::RenderBackend;
use crate::caption::{CaptionFormatter, PlainCaptions};
use crate::error::FilterError;
use crate::figure::FigureContext;
use crate::format::OutputFormat;
use crate::machine::AnnotationMachine;
use crate::markup::{MarkupBackend, SlideBackend};
use crate::meta::DocumentMeta;
use crate::pass::Pass;
use crate::plain::PlainBackend;
use crate::typeset::TypesetBackend;

/// Rewrites annotation tags in pandoc documents.
///
/// # Configuration
///
/// Create the annotator, then configure using builder methods:
/// - [`default_font`](Self::default_font): font for figures when the document names none
/// - [`figures`](Self::figures): renderer for `tikz` code blocks (left unchanged without one)
/// - [`captions`](Self::captions): converter for figure captions (default: plain words)
///
/// # Example
///
/// ```ignore
/// use marginalia_filter::{Annotator, OutputFormat};
///
/// let annotator = Annotator::new().figures(&cache);
/// annotator.run(&mut document, OutputFormat::from_writer("latex"))?;
/// ```
pub struct Annotator<'a> {
    default_font: String,
    figures: Option<&'a dyn FigureResolver>,
    captions: &'a dyn CaptionFormatter,
}

impl Default for Annotator<'_> {
    fn default() -> Self {
        Self {
            default_font: DEFAULT_FONT.to_owned(),
            figures: None,
            captions: &PlainCaptions,
        }
    }
}

impl<'a> Annotator<'a> {
    /// Create an annotator with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font used for figures when the document has no `fontfamily`.
    #[must_use]
    pub fn default_font(mut self, font: impl Into<String>) -> Self {
        self.default_font = font.into();
        self
    }

    /// Set the renderer for figure code blocks.
    #[must_use]
    pub fn figures(mut self, figures: &'a dyn FigureResolver) -> Self {
        self.figures = Some(figures);
        self
    }

    /// Set the figure caption converter.
    #[must_use]
    pub fn captions(mut self, captions: &'a dyn CaptionFormatter) -> Self {
        self.captions = captions;
        self
    }

    /// Rewrite `doc` in place for the given output format.
    ///
    /// On error the document is left partially rewritten and must be discarded.
    pub fn run(&self, doc: &mut Document, format: OutputFormat) -> Result<(), FilterError> {
        let meta = DocumentMeta::from_meta(&doc.meta);
        tracing::debug!(?format, draft = meta.draft, "Filtering document");

        match format {
            OutputFormat::SourceMarkup => Ok(()),
            OutputFormat::Typeset => self.run_with::<TypesetBackend>(doc, &meta),
            OutputFormat::Markup => self.run_with::<MarkupBackend>(doc, &meta),
            OutputFormat::MarkupSlide => self.run_with::<SlideBackend>(doc, &meta),
            OutputFormat::Other => self.run_with::<PlainBackend>(doc, &meta),
        }
    }

    fn run_with<B: RenderBackend>(
        &self,
        doc: &mut Document,
        meta: &DocumentMeta,
    ) -> Result<(), FilterError> {
        let font = meta.font_family.as_deref().unwrap_or(&self.default_font);
        let figures = self.figures.map(|resolver| FigureContext {
            resolver,
            captions: self.captions,
            font,
            format: B::FIGURE_FORMAT,
        });

        let mut pass = Pass::<B>::new(AnnotationMachine::new(meta.draft), figures);
        walk(doc, &mut pass)?;
        pass.finish();
        Ok(())
    }
}
