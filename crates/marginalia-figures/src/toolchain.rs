//! External programs that turn LaTeX source into an image.

use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use crate::FigureError;
use crate::command;
use crate::consts::{DEFAULT_DENSITY, DEFAULT_TIMEOUT};
use crate::format::FigureFormat;

/// Base name of the intermediate files inside the scratch directory.
const JOB_NAME: &str = "figure";

/// Renders a complete standalone LaTeX document to an image file.
pub trait Toolchain {
    /// Render `source` and write the result to `output`.
    ///
    /// `output` already carries the extension of `format`.
    fn render(&self, source: &str, format: FigureFormat, output: &Path) -> Result<(), FigureError>;
}

/// Toolchain backed by `pdflatex` and `ImageMagick`'s `convert`.
///
/// Each render runs in a fresh scratch directory that is removed afterwards.
#[derive(Debug, Clone)]
pub struct LatexToolchain {
    latex: String,
    convert: String,
    density: u32,
    timeout: Duration,
}

impl Default for LatexToolchain {
    fn default() -> Self {
        Self::new("pdflatex", "convert")
    }
}

impl LatexToolchain {
    /// Create a toolchain using the given program names or paths.
    #[must_use]
    pub fn new(latex: impl Into<String>, convert: impl Into<String>) -> Self {
        Self {
            latex: latex.into(),
            convert: convert.into(),
            density: DEFAULT_DENSITY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the rasterization density for PNG output (default: 300).
    #[must_use]
    pub fn density(mut self, density: u32) -> Self {
        self.density = density;
        self
    }

    /// Set the time limit for each program invocation (default: 60 seconds).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn typeset(&self, source: &str, workdir: &Path) -> Result<(), FigureError> {
        fs::write(workdir.join(format!("{JOB_NAME}.tex")), source)?;
        command::run(
            Command::new(&self.latex)
                .arg("-interaction=nonstopmode")
                .arg("-halt-on-error")
                .arg(format!("{JOB_NAME}.tex"))
                .current_dir(workdir),
            None,
            self.timeout,
        )?;
        Ok(())
    }

    fn rasterize(&self, pdf: &Path, output: &Path) -> Result<(), FigureError> {
        command::run(
            Command::new(&self.convert)
                .arg("-density")
                .arg(self.density.to_string())
                .arg(pdf)
                .arg("-quality")
                .arg("100")
                .arg(output),
            None,
            self.timeout,
        )?;
        Ok(())
    }
}

impl Toolchain for LatexToolchain {
    fn render(&self, source: &str, format: FigureFormat, output: &Path) -> Result<(), FigureError> {
        let workdir = tempfile::tempdir()?;
        self.typeset(source, workdir.path())?;

        let pdf = workdir.path().join(format!("{JOB_NAME}.pdf"));
        if !pdf.is_file() {
            return Err(FigureError::MissingOutput(pdf));
        }

        match format {
            FigureFormat::Pdf => {
                fs::copy(&pdf, output)?;
            }
            FigureFormat::Png => self.rasterize(&pdf, output)?,
        }

        if !output.is_file() {
            return Err(FigureError::MissingOutput(output.to_path_buf()));
        }
        Ok(())
    }
}
