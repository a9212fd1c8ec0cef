//! Tag catalog.
//!
//! Annotation tags are written as raw HTML in the source document. Block tags
//! stand alone as raw blocks (`<!comment>` on its own line); inline tags appear
//! inside paragraphs (`<comment>`). Keywords are matched case-insensitively.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static DIRECTIVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^<(i|l|r|rp)\s+(.+?)\s*>$").unwrap());

/// Whether a tag opens or closes an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Open,
    Close,
}

/// Annotations spanning whole blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCategory {
    Comment,
    Box,
    Center,
    Speaker,
}

/// Annotations spanning text within a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineCategory {
    Comment,
    Highlight,
    Margin,
    FixMe,
}

/// A category of annotation with its wire spellings.
pub trait Category: Copy + Eq + fmt::Debug + 'static {
    /// Every `(wire text, category, marker)` combination.
    const CATALOG: &'static [(&'static str, Self, Marker)];

    /// Color the typeset backend switches to inside the annotation.
    fn color(self) -> Option<&'static str>;

    /// Whether the annotation keeps the surrounding color instead of switching.
    fn keeps_color(self) -> bool {
        false
    }
}

impl Category for BlockCategory {
    const CATALOG: &'static [(&'static str, Self, Marker)] = &[
        ("<!comment>", Self::Comment, Marker::Open),
        ("</!comment>", Self::Comment, Marker::Close),
        ("<!box>", Self::Box, Marker::Open),
        ("</!box>", Self::Box, Marker::Close),
        ("<center>", Self::Center, Marker::Open),
        ("</center>", Self::Center, Marker::Close),
        ("<!speaker>", Self::Speaker, Marker::Open),
        ("</!speaker>", Self::Speaker, Marker::Close),
    ];

    fn color(self) -> Option<&'static str> {
        match self {
            Self::Comment | Self::Speaker => Some("red"),
            Self::Box | Self::Center => None,
        }
    }
}

impl Category for InlineCategory {
    const CATALOG: &'static [(&'static str, Self, Marker)] = &[
        ("<comment>", Self::Comment, Marker::Open),
        ("</comment>", Self::Comment, Marker::Close),
        ("<highlight>", Self::Highlight, Marker::Open),
        ("</highlight>", Self::Highlight, Marker::Close),
        ("<margin>", Self::Margin, Marker::Open),
        ("</margin>", Self::Margin, Marker::Close),
        ("<fixme>", Self::FixMe, Marker::Open),
        ("</fixme>", Self::FixMe, Marker::Close),
    ];

    fn color(self) -> Option<&'static str> {
        match self {
            Self::Comment | Self::Margin => Some("red"),
            Self::Highlight => Some("yellow"),
            Self::FixMe => Some("cyan"),
        }
    }

    fn keeps_color(self) -> bool {
        self == Self::Highlight
    }
}

impl InlineCategory {
    /// Whether non-draft output hides the annotated text, not just the markers.
    #[must_use]
    pub fn hides_content(self) -> bool {
        matches!(self, Self::Comment | Self::Margin)
    }
}

/// An open or close annotation marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<C> {
    pub category: C,
    pub marker: Marker,
}

/// Marker of a block annotation.
pub type BlockTag = Tag<BlockCategory>;

/// Marker of an inline annotation.
pub type InlineTag = Tag<InlineCategory>;

impl<C: Category> Tag<C> {
    /// Create an opening marker.
    #[must_use]
    pub fn open(category: C) -> Self {
        Self {
            category,
            marker: Marker::Open,
        }
    }

    /// Create a closing marker.
    #[must_use]
    pub fn close(category: C) -> Self {
        Self {
            category,
            marker: Marker::Close,
        }
    }

    /// Look up raw HTML text in the catalog.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        C::CATALOG
            .iter()
            .find(|(wire, _, _)| wire.eq_ignore_ascii_case(text))
            .map(|&(_, category, marker)| Self { category, marker })
    }

    /// Wire spelling of the tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        C::CATALOG
            .iter()
            .find(|&&(_, category, marker)| category == self.category && marker == self.marker)
            .map_or("", |&(wire, _, _)| wire)
    }

    /// Whether this is the given category's marker of the given kind.
    #[must_use]
    pub fn is(self, category: C, marker: Marker) -> bool {
        self.category == category && self.marker == marker
    }
}

impl<C: Category> fmt::Display for Tag<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless inline instruction carrying an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineDirective {
    /// `<i TEXT>`: index entry.
    IndexMark(String),
    /// `<l LABEL>`: cross-reference target.
    Label(String),
    /// `<r LABEL>`: reference to a label.
    Reference(String),
    /// `<rp LABEL>`: page reference to a label.
    PageReference(String),
}

impl InlineDirective {
    /// Parse a directive. The keyword is case-insensitive; the argument keeps its case.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let caps = DIRECTIVE_PATTERN.captures(text.trim())?;
        let argument = caps[2].to_owned();
        match caps[1].to_ascii_lowercase().as_str() {
            "i" => Some(Self::IndexMark(argument)),
            "l" => Some(Self::Label(argument)),
            "r" => Some(Self::Reference(argument)),
            "rp" => Some(Self::PageReference(argument)),
            _ => None,
        }
    }
}

/// Anything recognized in a raw inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineInstruction {
    Annotation(InlineTag),
    Directive(InlineDirective),
}

impl InlineInstruction {
    /// Recognize an inline annotation marker or directive.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        InlineTag::parse(text)
            .map(Self::Annotation)
            .or_else(|| InlineDirective::parse(text).map(Self::Directive))
    }
}
