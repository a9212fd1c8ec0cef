//! Output file types for rendered figures.

/// Image file type produced for a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FigureFormat {
    /// Vector PDF, embedded directly by LaTeX.
    Pdf,
    /// Raster PNG, for every other writer.
    #[default]
    Png,
}

impl FigureFormat {
    /// File extension without the leading dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
        }
    }
}
