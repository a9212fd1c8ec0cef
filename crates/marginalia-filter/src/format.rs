//! Output format families.

/// Family of the pandoc writer the document is being filtered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// LaTeX and beamer.
    Typeset,
    /// HTML.
    Markup,
    /// reveal.js slides.
    MarkupSlide,
    /// Markdown output; the document's own markup is kept as written.
    SourceMarkup,
    /// Any other writer (docx, odt, ...): markers render to nothing.
    Other,
}

impl OutputFormat {
    /// Classify a pandoc writer name such as `html5` or `markdown+smart`.
    #[must_use]
    pub fn from_writer(name: &str) -> Self {
        let base = name
            .split(['+', '-'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match base.as_str() {
            "latex" | "beamer" => Self::Typeset,
            "html" | "html4" | "html5" => Self::Markup,
            "revealjs" => Self::MarkupSlide,
            "gfm" => Self::SourceMarkup,
            other if other.starts_with("markdown") || other.starts_with("commonmark") => {
                Self::SourceMarkup
            }
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_writer() {
        assert_eq!(OutputFormat::from_writer("latex"), OutputFormat::Typeset);
        assert_eq!(OutputFormat::from_writer("beamer"), OutputFormat::Typeset);
        assert_eq!(OutputFormat::from_writer("html"), OutputFormat::Markup);
        assert_eq!(OutputFormat::from_writer("HTML5"), OutputFormat::Markup);
        assert_eq!(OutputFormat::from_writer("revealjs"), OutputFormat::MarkupSlide);
        assert_eq!(OutputFormat::from_writer("docx"), OutputFormat::Other);
        assert_eq!(OutputFormat::from_writer(""), OutputFormat::Other);
    }

    #[test]
    fn test_markdown_variants_are_source_markup() {
        for name in [
            "markdown",
            "markdown_strict",
            "markdown+smart",
            "commonmark_x",
            "gfm-raw_html",
        ] {
            assert_eq!(OutputFormat::from_writer(name), OutputFormat::SourceMarkup, "{name}");
        }
    }
}
