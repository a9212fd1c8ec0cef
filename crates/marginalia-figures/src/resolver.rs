//! Figure resolution against the on-disk cache.
//!
//! A figure is rendered at most once: its file name is derived from the
//! content hash, so an existing file is always the right one.

use std::fs;
use std::path::{Path, PathBuf};

use crate::FigureError;
use crate::format::FigureFormat;
use crate::key::FigureKey;
use crate::source::standalone_document;
use crate::toolchain::Toolchain;

/// A figure to resolve.
#[derive(Debug, Clone, Copy)]
pub struct FigureRequest<'a> {
    /// Diagram code from the document.
    pub code: &'a str,
    /// Font package to typeset with.
    pub font: &'a str,
    /// Comma-separated `TikZ` libraries, possibly empty.
    pub libraries: &'a str,
    /// File type to produce.
    pub format: FigureFormat,
}

/// Maps figure requests to image files.
pub trait FigureResolver {
    /// Return the path of the image for `request`, producing it if needed.
    fn resolve(&self, request: &FigureRequest<'_>) -> Result<PathBuf, FigureError>;
}

/// Content-addressed figure store in a directory.
///
/// Files are named `<sha256(code + font)>.<ext>`. A render is written to a
/// temporary file in the same directory and renamed into place, so a failed
/// or interrupted render never leaves a file that would later count as a hit.
#[derive(Debug)]
pub struct FigureCache<T> {
    dir: PathBuf,
    toolchain: T,
}

impl<T: Toolchain> FigureCache<T> {
    /// Create a cache in `dir` backed by `toolchain`.
    ///
    /// The directory is created on first render.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, toolchain: T) -> Self {
        Self {
            dir: dir.into(),
            toolchain,
        }
    }

    /// Cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn render(&self, request: &FigureRequest<'_>, path: &Path) -> Result<(), FigureError> {
        fs::create_dir_all(&self.dir)?;

        let source = standalone_document(request.code, request.font, request.libraries);
        let staging = tempfile::Builder::new()
            .prefix(".render-")
            .suffix(&format!(".{}", request.format.extension()))
            .tempfile_in(&self.dir)?;

        self.toolchain
            .render(&source, request.format, staging.path())?;
        staging.persist(path).map_err(|e| FigureError::Io(e.error))?;
        Ok(())
    }
}

impl<T: Toolchain> FigureResolver for FigureCache<T> {
    fn resolve(&self, request: &FigureRequest<'_>) -> Result<PathBuf, FigureError> {
        let key = FigureKey {
            code: request.code,
            font: request.font,
        };
        let path = key.file_path(&self.dir, request.format);

        if path.is_file() {
            tracing::debug!(path = %path.display(), "Figure cache hit");
            return Ok(path);
        }

        tracing::debug!(path = %path.display(), "Figure cache miss, rendering");
        self.render(request, &path)?;
        tracing::info!(path = %path.display(), "Created figure");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Toolchain that records each source and writes it as the "image".
    #[derive(Default)]
    struct RecordingToolchain {
        sources: RefCell<Vec<String>>,
        fail: bool,
    }

    impl Toolchain for RecordingToolchain {
        fn render(
            &self,
            source: &str,
            _format: FigureFormat,
            output: &Path,
        ) -> Result<(), FigureError> {
            self.sources.borrow_mut().push(source.to_owned());
            if self.fail {
                return Err(FigureError::MissingOutput(output.to_path_buf()));
            }
            fs::write(output, source)?;
            Ok(())
        }
    }

    fn request(code: &str) -> FigureRequest<'_> {
        FigureRequest {
            code,
            font: "garamondx",
            libraries: "",
            format: FigureFormat::Png,
        }
    }

    #[test]
    fn test_resolve_renders_once() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FigureCache::new(dir.path().join("figures"), RecordingToolchain::default());

        let first = cache.resolve(&request(r"\draw (0,0);")).unwrap();
        let second = cache.resolve(&request(r"\draw (0,0);")).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.toolchain.sources.borrow().len(), 1);
        assert!(first.is_file());
        assert_eq!(first.extension().unwrap(), "png");
        assert_eq!(first.parent().unwrap(), cache.dir());
    }

    #[test]
    fn test_resolve_passes_standalone_source() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FigureCache::new(dir.path(), RecordingToolchain::default());
        let req = FigureRequest {
            libraries: "arrows",
            ..request("CODE")
        };

        let path = cache.resolve(&req).unwrap();

        let written = fs::read_to_string(path).unwrap();
        assert_eq!(written, standalone_document("CODE", "garamondx", "arrows"));
    }

    #[test]
    fn test_existing_file_is_hit() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FigureCache::new(dir.path(), RecordingToolchain::default());
        let key = FigureKey {
            code: "CODE",
            font: "garamondx",
        };
        let existing = key.file_path(dir.path(), FigureFormat::Png);
        fs::write(&existing, "old").unwrap();

        let path = cache.resolve(&request("CODE")).unwrap();

        assert_eq!(path, existing);
        assert!(cache.toolchain.sources.borrow().is_empty());
        assert_eq!(fs::read_to_string(path).unwrap(), "old");
    }

    #[test]
    fn test_failed_render_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FigureCache::new(
            dir.path(),
            RecordingToolchain {
                fail: true,
                ..RecordingToolchain::default()
            },
        );

        assert!(cache.resolve(&request("CODE")).is_err());

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_formats_are_cached_separately() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FigureCache::new(dir.path(), RecordingToolchain::default());
        let pdf = FigureRequest {
            format: FigureFormat::Pdf,
            ..request("CODE")
        };

        let png_path = cache.resolve(&request("CODE")).unwrap();
        let pdf_path = cache.resolve(&pdf).unwrap();

        assert_ne!(png_path, pdf_path);
        assert_eq!(cache.toolchain.sources.borrow().len(), 2);
    }
}
