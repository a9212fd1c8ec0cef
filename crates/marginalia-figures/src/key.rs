//! Figure cache key computation.
//!
//! Provides [`FigureKey`] for computing the content hash that names a figure file.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::format::FigureFormat;

/// Figure parameters that determine the rendered image.
#[derive(Debug, Clone, Copy)]
pub struct FigureKey<'a> {
    /// Diagram code exactly as written in the document.
    pub code: &'a str,
    /// Font package the figure is typeset with.
    pub font: &'a str,
}

impl FigureKey<'_> {
    /// Compute a content hash for this figure.
    ///
    /// # Hash Format
    ///
    /// Hex-encoded SHA-256 of `"{code}{font}"`.
    #[must_use]
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.code.as_bytes());
        hasher.update(self.font.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Path of the figure file inside `cache_dir`.
    #[must_use]
    pub fn file_path(&self, cache_dir: &Path, format: FigureFormat) -> PathBuf {
        cache_dir.join(format!("{}.{}", self.compute_hash(), format.extension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_figure_key_hash() {
        let key1 = FigureKey {
            code: r"\draw (0,0) -- (1,1);",
            font: "garamondx",
        };
        let key2 = key1;
        let key3 = FigureKey {
            code: r"\draw (0,0) -- (2,2);",
            ..key1
        };

        assert_eq!(key1.compute_hash(), key2.compute_hash());
        assert_ne!(key1.compute_hash(), key3.compute_hash());
        assert_eq!(key1.compute_hash().len(), 64);
    }

    #[test]
    fn test_figure_key_font_matters() {
        let garamond = FigureKey {
            code: "x",
            font: "garamondx",
        };
        let libertine = FigureKey {
            font: "libertine",
            ..garamond
        };

        assert_ne!(garamond.compute_hash(), libertine.compute_hash());
    }

    #[test]
    fn test_figure_key_known_digest() {
        // sha256("abc")
        let key = FigureKey { code: "ab", font: "c" };

        assert_eq!(
            key.compute_hash(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_file_path() {
        let key = FigureKey { code: "ab", font: "c" };

        let path = key.file_path(Path::new("/cache"), FigureFormat::Png);

        assert_eq!(
            path,
            Path::new(
                "/cache/ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad.png"
            )
        );
    }
}
