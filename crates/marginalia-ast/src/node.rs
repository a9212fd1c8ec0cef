//! Block and inline node types.
//!
//! Shapes follow pandoc API 1.23. Values a filter never needs to look inside
//! (list number styles, table alignments, citation records, quote and math
//! types) are kept as raw JSON so they round-trip untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw content format tag (e.g. `html`, `latex`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Format(pub String);

impl Format {
    /// Create a format tag.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Case-insensitive comparison against a format name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// Identifier, classes and key-value attributes of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AttrRepr", into = "AttrRepr")]
pub struct Attr {
    pub identifier: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
}

impl Attr {
    /// Whether the node carries the given class.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Value of the first attribute named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Wire representation of [`Attr`]: `[identifier, [classes], [[key, value]]]`.
#[derive(Clone, Serialize, Deserialize)]
struct AttrRepr(String, Vec<String>, Vec<(String, String)>);

impl From<AttrRepr> for Attr {
    fn from(AttrRepr(identifier, classes, attributes): AttrRepr) -> Self {
        Self {
            identifier,
            classes,
            attributes,
        }
    }
}

impl From<Attr> for AttrRepr {
    fn from(attr: Attr) -> Self {
        Self(attr.identifier, attr.classes, attr.attributes)
    }
}

/// Link or image target: `(url, title)`.
pub type Target = (String, String);
/// Ordered list start number, style and delimiter.
pub type ListAttributes = (i64, Value, Value);
/// Optional short caption and the full caption blocks.
pub type Caption = (Option<Vec<Inline>>, Vec<Block>);
/// Column alignment and width.
pub type ColSpec = (Value, Value);
/// Table row: attributes and cells.
pub type Row = (Attr, Vec<Cell>);
/// Table cell: attributes, alignment, row span, column span, content.
pub type Cell = (Attr, Value, i64, i64, Vec<Block>);
/// Table head rows.
pub type TableHead = (Attr, Vec<Row>);
/// Table body: attributes, row-head column count, intermediate head rows, body rows.
pub type TableBody = (Attr, i64, Vec<Row>, Vec<Row>);
/// Table foot rows.
pub type TableFoot = (Attr, Vec<Row>);

/// Block-level node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Block {
    Plain(Vec<Inline>),
    Para(Vec<Inline>),
    LineBlock(Vec<Vec<Inline>>),
    CodeBlock(Attr, String),
    RawBlock(Format, String),
    BlockQuote(Vec<Block>),
    OrderedList(ListAttributes, Vec<Vec<Block>>),
    BulletList(Vec<Vec<Block>>),
    DefinitionList(Vec<(Vec<Inline>, Vec<Vec<Block>>)>),
    Header(i64, Attr, Vec<Inline>),
    HorizontalRule,
    Table(Attr, Caption, Vec<ColSpec>, TableHead, Vec<TableBody>, TableFoot),
    Figure(Attr, Caption, Vec<Block>),
    Div(Attr, Vec<Block>),
}

/// Inline node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Inline {
    Str(String),
    Emph(Vec<Inline>),
    Underline(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikeout(Vec<Inline>),
    Superscript(Vec<Inline>),
    Subscript(Vec<Inline>),
    SmallCaps(Vec<Inline>),
    Quoted(Value, Vec<Inline>),
    Cite(Vec<Value>, Vec<Inline>),
    Code(Attr, String),
    Space,
    SoftBreak,
    LineBreak,
    Math(Value, String),
    RawInline(Format, String),
    Link(Attr, Vec<Inline>, Target),
    Image(Attr, Vec<Inline>, Target),
    Note(Vec<Block>),
    Span(Attr, Vec<Inline>),
}

impl Inline {
    /// Raw inline in the given format.
    #[must_use]
    pub fn raw(format: &str, text: impl Into<String>) -> Self {
        Self::RawInline(Format::new(format), text.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_attr_wire_shape() {
        let attr = Attr {
            identifier: "fig".to_owned(),
            classes: vec!["tikz".to_owned()],
            attributes: vec![("caption".to_owned(), "Hi".to_owned())],
        };

        let value = serde_json::to_value(&attr).unwrap();

        assert_eq!(value, json!(["fig", ["tikz"], [["caption", "Hi"]]]));
        assert_eq!(serde_json::from_value::<Attr>(value).unwrap(), attr);
    }

    #[test]
    fn test_attr_lookup() {
        let attr = Attr {
            identifier: String::new(),
            classes: vec!["tikz".to_owned()],
            attributes: vec![("tikzlibrary".to_owned(), "arrows".to_owned())],
        };

        assert!(attr.has_class("tikz"));
        assert!(!attr.has_class("python"));
        assert_eq!(attr.get("tikzlibrary"), Some("arrows"));
        assert_eq!(attr.get("caption"), None);
    }

    #[test]
    fn test_unit_inline_shape() {
        assert_eq!(serde_json::to_value(Inline::Space).unwrap(), json!({"t": "Space"}));
        assert_eq!(
            serde_json::from_value::<Inline>(json!({"t": "SoftBreak"})).unwrap(),
            Inline::SoftBreak
        );
    }

    #[test]
    fn test_raw_inline_shape() {
        let raw = Inline::raw("latex", "\\hl{");

        assert_eq!(
            serde_json::to_value(&raw).unwrap(),
            json!({"t": "RawInline", "c": ["latex", "\\hl{"]})
        );
    }

    #[test]
    fn test_table_round_trip() {
        let value = json!({"t": "Table", "c": [
            ["", [], []],
            [null, []],
            [[{"t": "AlignDefault"}, {"t": "ColWidthDefault"}]],
            [["", [], []], []],
            [[["", [], []], 0, [], [
                [["", [], []], [
                    [["", [], []], {"t": "AlignDefault"}, 1, 1, [
                        {"t": "Plain", "c": [{"t": "Str", "c": "cell"}]}
                    ]]
                ]]
            ]]],
            [["", [], []], []]
        ]});

        let block: Block = serde_json::from_value(value.clone()).unwrap();

        assert!(matches!(block, Block::Table(..)));
        assert_eq!(serde_json::to_value(&block).unwrap(), value);
    }

    #[test]
    fn test_format_is_case_insensitive() {
        assert!(Format::new("HTML").is("html"));
        assert!(!Format::new("latex").is("html"));
    }
}
