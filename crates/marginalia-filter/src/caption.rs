//! Figure caption conversion.

use marginalia_ast::Inline;

/// Error converting a caption.
#[derive(Debug, thiserror::Error)]
#[error("failed to convert caption {caption:?}: {message}")]
pub struct CaptionError {
    pub caption: String,
    pub message: String,
}

/// Turns caption markdown into inline content.
pub trait CaptionFormatter {
    /// Convert `markdown` to inlines.
    fn to_inlines(&self, markdown: &str) -> Result<Vec<Inline>, CaptionError>;
}

/// Caption formatter that keeps the text as plain words.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCaptions;

impl CaptionFormatter for PlainCaptions {
    fn to_inlines(&self, markdown: &str) -> Result<Vec<Inline>, CaptionError> {
        let mut inlines = Vec::new();
        for word in markdown.split_whitespace() {
            if !inlines.is_empty() {
                inlines.push(Inline::Space);
            }
            inlines.push(Inline::Str(word.to_owned()));
        }
        Ok(inlines)
    }
}
