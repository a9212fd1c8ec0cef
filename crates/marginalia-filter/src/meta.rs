//! Document metadata read before a pass.

use marginalia_ast::{Meta, MetaValue};

/// Metadata field selecting draft mode.
const DRAFT_FIELD: &str = "draft";

/// Metadata field naming the document font package.
const FONT_FIELD: &str = "fontfamily";

/// Document-level settings that hold for a whole pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMeta {
    /// Show comments and margin notes in the output.
    pub draft: bool,
    /// Font package named by the document, if any.
    pub font_family: Option<String>,
}

impl DocumentMeta {
    /// Read settings from document metadata. Missing fields take defaults.
    #[must_use]
    pub fn from_meta(meta: &Meta) -> Self {
        Self {
            draft: meta.get(DRAFT_FIELD).is_some_and(is_truthy),
            font_family: meta
                .get(FONT_FIELD)
                .and_then(MetaValue::as_text)
                .map(|font| font.trim().to_owned())
                .filter(|font| !font.is_empty()),
        }
    }
}

fn is_truthy(value: &MetaValue) -> bool {
    match value {
        MetaValue::MetaBool(flag) => *flag,
        other => other.as_text().is_some_and(|text| {
            matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "on" | "1" | "draft"
            )
        }),
    }
}
