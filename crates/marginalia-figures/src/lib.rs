//! TikZ figure rendering for marginalia.
//!
//! This crate turns diagram source embedded in a document into an image file
//! on disk, computing it only when no file for the same content exists yet:
//! - [`FigureKey`] hashes diagram code and font into a cache key
//! - [`FigureCache`] resolves a [`FigureRequest`] to a file path, rendering on a miss
//! - [`Toolchain`] abstracts the external programs; [`LatexToolchain`] runs
//!   `pdflatex` and `convert`
//! - [`command`] runs subprocesses with a timeout
//!
//! # Example
//!
//! ```ignore
//! use marginalia_figures::{FigureCache, FigureFormat, FigureRequest, LatexToolchain};
//!
//! let cache = FigureCache::new(".marginalia/figures", LatexToolchain::default());
//! let path = cache.resolve(&FigureRequest {
//!     code: r"\begin{tikzpicture}\draw (0,0) -- (1,1);\end{tikzpicture}",
//!     font: "garamondx",
//!     libraries: "",
//!     format: FigureFormat::Png,
//! })?;
//! ```

pub mod command;
mod consts;
mod format;
mod key;
mod resolver;
mod source;
mod toolchain;

pub use command::CommandError;
pub use consts::{DEFAULT_DENSITY, DEFAULT_FONT, DEFAULT_TIMEOUT};
pub use format::FigureFormat;
pub use key::FigureKey;
pub use resolver::{FigureCache, FigureRequest, FigureResolver};
pub use source::standalone_document;
pub use toolchain::{LatexToolchain, Toolchain};

use std::path::PathBuf;

/// Error producing a figure.
#[derive(Debug, thiserror::Error)]
pub enum FigureError {
    /// An external program failed or timed out.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// The toolchain finished but the expected image is missing.
    #[error("figure toolchain produced no output file at {}", .0.display())]
    MissingOutput(PathBuf),
    /// Filesystem error while preparing or storing a figure.
    #[error("figure I/O error: {0}")]
    Io(#[from] std::io::Error),
}
