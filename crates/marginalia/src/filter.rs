//! Filter a pandoc JSON document from stdin to stdout.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use marginalia_ast::Document;
use marginalia_config::{CliSettings, Config};
use marginalia_figures::{FigureCache, LatexToolchain};
use marginalia_filter::{Annotator, OutputFormat};

use crate::captions::PandocCaptions;
use crate::error::CliError;

/// Arguments for a filter run.
#[derive(Args)]
pub(crate) struct FilterArgs {
    /// Target writer name passed by pandoc (latex, beamer, html5, revealjs, ...).
    format: String,

    /// Path to configuration file (default: auto-discover marginalia.toml).
    #[arg(short, long, env = "MARGINALIA_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for rendered figures (overrides config).
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Font for figures when the document sets no fontfamily (overrides config).
    #[arg(long)]
    font: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl FilterArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            cache_dir: self.cache_dir,
            default_font: self.font,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let figures = &config.figures_resolved;
        let toolchain = LatexToolchain::new(&figures.latex, &figures.convert)
            .density(figures.density)
            .timeout(figures.timeout);
        let cache = FigureCache::new(figures.cache_dir.clone(), toolchain);
        let captions = PandocCaptions::new(&config.captions.pandoc, config.captions.timeout());
        let annotator = Annotator::new()
            .default_font(&figures.default_font)
            .figures(&cache)
            .captions(&captions);

        let mut document = Document::from_reader(io::stdin().lock())?;

        let format = OutputFormat::from_writer(&self.format);
        tracing::info!(writer = %self.format, ?format, "Filtering document");
        annotator.run(&mut document, format)?;

        // Written only after the whole pass succeeded.
        let mut stdout = io::stdout().lock();
        document.to_writer(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }
}
