//! Annotation filtering for pandoc documents.
//!
//! Authors mark up drafts with raw HTML tags that pandoc passes through
//! untouched:
//!
//! ```markdown
//! Some text <comment>a note to self</comment> and <highlight>this</highlight>.
//!
//! <!comment>
//! A whole paragraph that only appears in drafts.
//! </!comment>
//! ```
//!
//! This crate rewrites those tags for the target writer. In draft mode
//! (`draft: true` in the metadata) comments and margin notes are shown in
//! color; otherwise they disappear together with their content. Highlights and
//! fix-me notes always keep their content.
//!
//! # Architecture
//!
//! - [`tag`]: the tag catalog
//! - [`RenderBackend`]: per-format fragment tables ([`TypesetBackend`],
//!   [`MarkupBackend`], [`SlideBackend`], [`PlainBackend`])
//! - [`AnnotationMachine`]: nesting and visibility state machine
//! - [`Annotator`]: walks a [`marginalia_ast::Document`] and applies the machine,
//!   rendering `tikz` code blocks through a [`marginalia_figures::FigureResolver`]

mod annotator;
mod backend;
mod caption;
mod error;
mod figure;
mod format;
mod machine;
mod markup;
mod meta;
mod pass;
mod plain;
mod state;
pub mod tag;
mod typeset;

pub use annotator::Annotator;
pub use backend::{MarkerContext, RenderBackend};
pub use caption::{CaptionError, CaptionFormatter, PlainCaptions};
pub use error::FilterError;
pub use figure::is_figure;
pub use format::OutputFormat;
pub use machine::AnnotationMachine;
pub use markup::{MarkupBackend, SlideBackend};
pub use meta::DocumentMeta;
pub use plain::PlainBackend;
pub use state::{BASE_COLOR, PassContext, RegionId};
pub use typeset::TypesetBackend;
