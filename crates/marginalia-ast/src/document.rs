//! Top-level document and metadata.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::AstError;
use crate::node::{Block, Inline};
use crate::text::stringify;

/// Lowest pandoc API version whose node shapes this crate models (`Figure`, new tables).
const MIN_API_VERSION: [u32; 2] = [1, 23];

/// Document metadata, keyed by field name.
pub type Meta = BTreeMap<String, MetaValue>;

/// A pandoc document as exchanged with JSON filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Pandoc API version that produced the document (e.g. `[1, 23, 1]`).
    #[serde(rename = "pandoc-api-version")]
    pub api_version: Vec<u32>,
    /// Document metadata (YAML front matter and `-M` values).
    pub meta: Meta,
    /// Top-level blocks in document order.
    pub blocks: Vec<Block>,
}

impl Document {
    /// Parse a document from a JSON string.
    pub fn from_json(input: &str) -> Result<Self, AstError> {
        let doc: Self = serde_json::from_str(input)?;
        doc.check_api_version()?;
        Ok(doc)
    }

    /// Parse a document from a reader (typically stdin).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AstError> {
        let doc: Self = serde_json::from_reader(reader)?;
        doc.check_api_version()?;
        Ok(doc)
    }

    /// Serialize the document to a JSON string.
    pub fn to_json(&self) -> Result<String, AstError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize the document to a writer (typically stdout).
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), AstError> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Look up a top-level metadata field.
    #[must_use]
    pub fn meta_value(&self, key: &str) -> Option<&MetaValue> {
        self.meta.get(key)
    }

    fn check_api_version(&self) -> Result<(), AstError> {
        let major_minor = [
            self.api_version.first().copied().unwrap_or(0),
            self.api_version.get(1).copied().unwrap_or(0),
        ];
        if major_minor < MIN_API_VERSION {
            let found = self
                .api_version
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(".");
            return Err(AstError::ApiVersion { found });
        }
        Ok(())
    }
}

/// A metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum MetaValue {
    MetaMap(BTreeMap<String, MetaValue>),
    MetaList(Vec<MetaValue>),
    MetaBool(bool),
    MetaString(String),
    MetaInlines(Vec<Inline>),
    MetaBlocks(Vec<Block>),
}

impl MetaValue {
    /// Plain-text rendering of scalar metadata.
    ///
    /// Returns `None` for maps, lists and booleans.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::MetaString(s) => Some(s.clone()),
            Self::MetaInlines(inlines) => Some(stringify(inlines)),
            Self::MetaBlocks(blocks) => Some(
                blocks
                    .iter()
                    .filter_map(|block| match block {
                        Block::Plain(inlines) | Block::Para(inlines) => Some(stringify(inlines)),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Self::MetaMap(_) | Self::MetaList(_) | Self::MetaBool(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Attr, Format};
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "pandoc-api-version": [1, 23, 1],
        "meta": {
            "draft": {"t": "MetaBool", "c": true},
            "fontfamily": {"t": "MetaInlines", "c": [{"t": "Str", "c": "libertine"}]}
        },
        "blocks": [
            {"t": "RawBlock", "c": ["html", "<!comment>"]},
            {"t": "Para", "c": [
                {"t": "Str", "c": "Hello"},
                {"t": "Space"},
                {"t": "RawInline", "c": ["html", "<highlight>"]},
                {"t": "Emph", "c": [{"t": "Str", "c": "world"}]},
                {"t": "RawInline", "c": ["html", "</highlight>"]}
            ]},
            {"t": "HorizontalRule"},
            {"t": "CodeBlock", "c": [["fig:a", ["tikz"], [["caption", "A *b*"]]], "\\draw (0,0);"]},
            {"t": "RawBlock", "c": ["html", "</!comment>"]}
        ]
    }"#;

    #[test]
    fn test_parse_sample_document() {
        let doc = Document::from_json(SAMPLE).unwrap();

        assert_eq!(doc.api_version, vec![1, 23, 1]);
        assert_eq!(doc.blocks.len(), 5);
        assert_eq!(
            doc.blocks[0],
            Block::RawBlock(Format("html".to_owned()), "<!comment>".to_owned())
        );
        assert_eq!(
            doc.blocks[3],
            Block::CodeBlock(
                Attr {
                    identifier: "fig:a".to_owned(),
                    classes: vec!["tikz".to_owned()],
                    attributes: vec![("caption".to_owned(), "A *b*".to_owned())],
                },
                "\\draw (0,0);".to_owned()
            )
        );
        assert_eq!(doc.meta_value("draft"), Some(&MetaValue::MetaBool(true)));
    }

    #[test]
    fn test_serialize_preserves_structure() {
        let doc = Document::from_json(SAMPLE).unwrap();
        let json = doc.to_json().unwrap();

        let reparsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let original: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_from_reader_matches_from_json() {
        let from_reader = Document::from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(from_reader, Document::from_json(SAMPLE).unwrap());
    }

    #[test]
    fn test_old_api_version_rejected() {
        let json = r#"{"pandoc-api-version":[1,20],"meta":{},"blocks":[]}"#;

        let err = Document::from_json(json).unwrap_err();

        assert!(matches!(err, AstError::ApiVersion { .. }));
        assert!(err.to_string().contains("1.20"));
    }

    #[test]
    fn test_unknown_block_is_error() {
        let json = r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[{"t":"Bogus"}]}"#;

        assert!(matches!(
            Document::from_json(json),
            Err(AstError::Json(_))
        ));
    }

    #[test]
    fn test_meta_as_text() {
        let inlines = MetaValue::MetaInlines(vec![
            Inline::Str("Times".to_owned()),
            Inline::Space,
            Inline::Str("New".to_owned()),
        ]);
        assert_eq!(inlines.as_text().as_deref(), Some("Times New"));
        assert_eq!(
            MetaValue::MetaString("x".to_owned()).as_text().as_deref(),
            Some("x")
        );
        assert_eq!(MetaValue::MetaBool(true).as_text(), None);
    }
}
